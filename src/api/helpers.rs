//! API response helpers

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

use crate::api::error_code::ApiCode;
use crate::api::types::ApiResponse;
use crate::errors::LinkcutError;

pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ApiCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ApiCode::Success, "OK", Some(data))
}

pub fn created_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::CREATED, ApiCode::Success, "Created", Some(data))
}

pub fn error_response(status: StatusCode, code: ApiCode, message: &str) -> HttpResponse {
    json_response::<()>(status, code, message, None)
}

/// Build an error response from a LinkcutError, mapping HTTP status and code.
pub fn error_from_app(err: &LinkcutError) -> HttpResponse {
    error_response(err.http_status(), ApiCode::from(err), err.message())
}
