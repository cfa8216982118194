//! Common response builders for API handlers.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::{Value, json};
use tracing::error;

use crate::errors::AppError;

/// Body returned for every 5xx so internal detail never reaches clients.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(error_body(message))
}

#[must_use]
pub fn error_body(message: &str) -> Value {
    json!({ "error": message })
}

/// Liveness payload for `GET /`.
#[must_use]
pub fn status_running() -> Value {
    json!({ "status": "running", "message": "Lead intake API" })
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Csv(_) | AppError::Provider(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Config(_) | AppError::Storage(_) | AppError::HttpError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        match self {
            AppError::Validation(msg) | AppError::Provider(msg) => err_response(status, msg),
            AppError::Csv(msg) => err_response(status, &format!("Error processing CSV: {msg}")),
            _ => {
                error!(error = %self, "Request failed");
                err_response(status, INTERNAL_ERROR_MESSAGE)
            }
        }
    }
}
