use std::{error::Error as _, num::ParseIntError};

use axum::{
    extract::rejection::{BytesRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tokio::time::error::Elapsed;

use super::envelope;

/// Every way a request can fail. The display text becomes the `error` field
/// of the envelope, prefixed with `Error: `.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("could not parse url query")]
    InvalidQuery(#[source] QueryRejection),

    #[error("could not parse url query")]
    InvalidUserId(#[source] uuid::Error),

    #[error("could not parse path value")]
    InvalidPath(#[source] PathRejection),

    #[error("could not parse path value")]
    InvalidPathId(#[source] ParseIntError),

    #[error("could not read request body")]
    UnreadableBody(#[source] BytesRejection),

    #[error("something went wrong on decoding json")]
    InvalidBody(#[source] serde_json::Error),

    #[error("query param `user_id` is not provided")]
    MissingUserId,

    #[error("something went wrong on sql query")]
    Query(#[source] anyhow::Error),

    #[error("something went wrong on encoding json")]
    Encode(#[source] serde_json::Error),

    #[error("route not found")]
    NotFound,

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("request timed out")]
    Timeout(#[source] Elapsed),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingUserId => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
            // 413 for an oversized body, 400 for one that failed mid-read.
            AppError::UnreadableBody(rejection) => rejection.status(),
            // Malformed client input keeps the 500 existing clients rely on.
            AppError::InvalidQuery(_)
            | AppError::InvalidUserId(_)
            | AppError::InvalidPath(_)
            | AppError::InvalidPathId(_)
            | AppError::InvalidBody(_)
            | AppError::Query(_)
            | AppError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = format!("Error: {self}");
        let cause = match self.source() {
            Some(source) => source.to_string(),
            None => self.to_string(),
        };

        envelope::send_error(&message, self.status_code(), &cause)
    }
}
