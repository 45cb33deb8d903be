//! Error handling module for the guestbook backend.
//!
//! Provides centralized error types with mapping to HTTP status codes and response envelopes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const STORE_UNAVAILABLE: &str = "STORE_UNAVAILABLE";
    pub const STORE_WRITE_ERROR: &str = "STORE_WRITE_ERROR";
    pub const STORE_READ_ERROR: &str = "STORE_READ_ERROR";
    pub const MALFORMED_ASSERTION: &str = "MALFORMED_ASSERTION";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
}

/// SQLite primary result codes that mean the database could not be reached.
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;
const SQLITE_CANTOPEN: i32 = 14;

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Backing store could not be reached
    StoreUnavailable(String),
    /// Backend rejected a write
    StoreWrite(String),
    /// Backend failed a read
    StoreRead(String),
    /// Identity assertion could not be decoded
    MalformedAssertion(String),
    /// Caller supplied an unusable argument
    Validation(String),
}

impl AppError {
    /// Map a backend error raised while writing.
    pub fn from_store_write(err: sqlx::Error) -> Self {
        if is_unavailable(&err) {
            tracing::error!("Store unavailable during write: {:?}", err);
            return AppError::StoreUnavailable(format!("Store unavailable: {}", err));
        }
        tracing::error!("Store write error: {:?}", err);
        AppError::StoreWrite(format!("Store write error: {}", err))
    }

    /// Map a backend error raised while reading.
    pub fn from_store_read(err: sqlx::Error) -> Self {
        if is_unavailable(&err) {
            tracing::error!("Store unavailable during read: {:?}", err);
            return AppError::StoreUnavailable(format!("Store unavailable: {}", err));
        }
        tracing::error!("Store read error: {:?}", err);
        AppError::StoreRead(format!("Store read error: {}", err))
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::StoreWrite(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::StoreRead(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::MalformedAssertion(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::StoreUnavailable(_) => codes::STORE_UNAVAILABLE,
            AppError::StoreWrite(_) => codes::STORE_WRITE_ERROR,
            AppError::StoreRead(_) => codes::STORE_READ_ERROR,
            AppError::MalformedAssertion(_) => codes::MALFORMED_ASSERTION,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::StoreUnavailable(msg)
            | AppError::StoreWrite(msg)
            | AppError::StoreRead(msg)
            | AppError::MalformedAssertion(msg)
            | AppError::Validation(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

/// Whether a backend error means the store itself was out of reach.
fn is_unavailable(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => true,
        sqlx::Error::Database(db_err) => db_err
            .code()
            .and_then(|code| code.parse::<i32>().ok())
            .map(|code| matches!(code & 0xff, SQLITE_BUSY | SQLITE_LOCKED | SQLITE_CANTOPEN))
            .unwrap_or(false),
        _ => false,
    }
}

/// Error details in the response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
}

impl ErrorResponse {
    pub fn new(error: &AppError) -> Self {
        Self {
            success: false,
            error: ErrorDetails {
                code: error.error_code().to_string(),
                message: error.message(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::new(&self);
        (status, Json(body)).into_response()
    }
}
