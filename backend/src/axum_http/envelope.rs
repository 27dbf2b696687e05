use std::fmt::Display;

use axum::{
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{error, info, warn};

const JSON_CONTENT_TYPE: &str = "application/json";
const PLAIN_TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
const ENCODING_FALLBACK: &str = "Error: something went wrong with encoding json";

#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse<'a> {
    pub error: &'a str,
}

/// Wraps `payload` as `{"data": payload}`.
pub fn send_success<T>(payload: T, status: StatusCode) -> Result<Response, serde_json::Error>
where
    T: Serialize,
{
    let body = serde_json::to_string(&DataResponse { data: payload })?;

    info!(status = status.as_u16(), response = %body, "Send response");
    Ok((status, [(CONTENT_TYPE, JSON_CONTENT_TYPE)], body).into_response())
}

/// Answers `{"error": message}`. Never fails: if the envelope cannot be
/// encoded the client gets a plain-text body with the same status.
pub fn send_error(message: &str, status: StatusCode, cause: &dyn Display) -> Response {
    let body = match serde_json::to_string(&ErrorResponse { error: message }) {
        Ok(body) => body,
        Err(encode_error) => {
            error!(
                status = status.as_u16(),
                %cause,
                %encode_error,
                "{ENCODING_FALLBACK}"
            );
            return (status, [(CONTENT_TYPE, PLAIN_TEXT_CONTENT_TYPE)], ENCODING_FALLBACK)
                .into_response();
        }
    };

    if status.is_server_error() {
        error!(status = status.as_u16(), %cause, "{message}");
    } else {
        warn!(status = status.as_u16(), %cause, "{message}");
    }

    (status, [(CONTENT_TYPE, JSON_CONTENT_TYPE)], body).into_response()
}
