//! API error codes
//!
//! Serialized as numbers via serde_repr. Banded by the thousand:
//! - 0: success
//! - 1000-1099: generic
//! - 3000-3099: link errors
//! - 4000-4099: export errors

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::LinkcutError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ApiCode {
    Success = 0,

    BadRequest = 1000,
    NotFound = 1004,
    InternalServerError = 1005,
    ServiceUnavailable = 1030,

    LinkNotFound = 3000,
    LinkAlreadyExists = 3001,
    LinkInvalidInput = 3002,

    ExportFailed = 4001,
}

impl From<&LinkcutError> for ApiCode {
    fn from(err: &LinkcutError) -> Self {
        match err {
            LinkcutError::Validation(_) => ApiCode::LinkInvalidInput,
            LinkcutError::DuplicateCode(_) => ApiCode::LinkAlreadyExists,
            LinkcutError::NotFound(_) => ApiCode::LinkNotFound,
            LinkcutError::DatabaseConnection(_) | LinkcutError::DatabaseOperation(_) => {
                ApiCode::ServiceUnavailable
            }
            LinkcutError::DatabaseConfig(_) | LinkcutError::Serialization(_) => {
                ApiCode::InternalServerError
            }
        }
    }
}
