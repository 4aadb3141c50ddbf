use actix_web::http::StatusCode;
use std::fmt;

#[derive(Debug, Clone)]
pub enum LinkcutError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    Validation(String),
    DuplicateCode(String),
    NotFound(String),
    Serialization(String),
}

impl LinkcutError {
    /// Stable error code, used in logs
    pub fn code(&self) -> &'static str {
        match self {
            LinkcutError::DatabaseConfig(_) => "E001",
            LinkcutError::DatabaseConnection(_) => "E002",
            LinkcutError::DatabaseOperation(_) => "E003",
            LinkcutError::Validation(_) => "E004",
            LinkcutError::DuplicateCode(_) => "E005",
            LinkcutError::NotFound(_) => "E006",
            LinkcutError::Serialization(_) => "E007",
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            LinkcutError::DatabaseConfig(_) => "Database Configuration Error",
            LinkcutError::DatabaseConnection(_) => "Database Connection Error",
            LinkcutError::DatabaseOperation(_) => "Database Operation Error",
            LinkcutError::Validation(_) => "Validation Error",
            LinkcutError::DuplicateCode(_) => "Duplicate Short Code",
            LinkcutError::NotFound(_) => "Resource Not Found",
            LinkcutError::Serialization(_) => "Serialization Error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            LinkcutError::DatabaseConfig(msg) => msg,
            LinkcutError::DatabaseConnection(msg) => msg,
            LinkcutError::DatabaseOperation(msg) => msg,
            LinkcutError::Validation(msg) => msg,
            LinkcutError::DuplicateCode(msg) => msg,
            LinkcutError::NotFound(msg) => msg,
            LinkcutError::Serialization(msg) => msg,
        }
    }

    /// HTTP status the API layer maps this error to.
    ///
    /// Store unavailability is 503: the request may succeed on retry,
    /// nothing was wrong with the input.
    pub fn http_status(&self) -> StatusCode {
        match self {
            LinkcutError::Validation(_) => StatusCode::BAD_REQUEST,
            LinkcutError::DuplicateCode(_) => StatusCode::CONFLICT,
            LinkcutError::NotFound(_) => StatusCode::NOT_FOUND,
            LinkcutError::DatabaseConnection(_) | LinkcutError::DatabaseOperation(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            LinkcutError::DatabaseConfig(_) | LinkcutError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl fmt::Display for LinkcutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type(), self.message())
    }
}

impl std::error::Error for LinkcutError {}

impl LinkcutError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        LinkcutError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        LinkcutError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        LinkcutError::DatabaseOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        LinkcutError::Validation(msg.into())
    }

    pub fn duplicate_code<T: Into<String>>(msg: T) -> Self {
        LinkcutError::DuplicateCode(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        LinkcutError::NotFound(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        LinkcutError::Serialization(msg.into())
    }
}

impl From<sea_orm::DbErr> for LinkcutError {
    fn from(err: sea_orm::DbErr) -> Self {
        LinkcutError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for LinkcutError {
    fn from(err: std::io::Error) -> Self {
        LinkcutError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for LinkcutError {
    fn from(err: serde_json::Error) -> Self {
        LinkcutError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for LinkcutError {
    fn from(err: csv::Error) -> Self {
        LinkcutError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LinkcutError>;
