pub mod dispatch;
pub mod health;
pub mod reminders;

use axum::{http::StatusCode, Json};
use serde::Serialize;

use remind_store::StoreError;

/// Structured error body: every CRUD/dispatch failure answers
/// `{"error": "..."}` with the matching status code.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorBody>);

pub fn bad_request(msg: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody { error: msg.into() }),
    )
}

pub fn internal(msg: impl std::fmt::Display) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: msg.to_string(),
        }),
    )
}

/// Validation failures are the client's fault; anything touching SQLite is a
/// server fault.
pub fn store_error(err: StoreError) -> ApiError {
    match err {
        StoreError::Validation(msg) => bad_request(msg),
        StoreError::Database(e) => internal(e),
    }
}
