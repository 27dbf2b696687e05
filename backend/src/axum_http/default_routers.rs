use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::info;

use super::{envelope, error_responses::AppError};

pub async fn not_found() -> AppError {
    info!("router: not_found handler invoked");
    AppError::NotFound
}

pub async fn method_not_allowed() -> AppError {
    info!("router: method_not_allowed handler invoked");
    AppError::MethodNotAllowed
}

pub async fn health_check() -> Result<Response, AppError> {
    info!("router: health_check handler invoked");
    envelope::send_success("OK", StatusCode::OK).map_err(AppError::Encode)
}

/// Bounds the whole request, body read included, and answers an enveloped 408
/// once `timeout` elapses.
pub async fn request_timeout(
    State(timeout): State<Duration>,
    request: Request,
    next: Next,
) -> Response {
    match tokio::time::timeout(timeout, next.run(request)).await {
        Ok(response) => response,
        Err(elapsed) => AppError::Timeout(elapsed).into_response(),
    }
}
