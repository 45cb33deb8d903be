//! Warmup endpoint hit by the platform before routing traffic.

use axum::http::StatusCode;

/// GET /_warmup - Always succeeds.
pub async fn warmup() -> StatusCode {
    StatusCode::OK
}
