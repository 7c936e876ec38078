//! Error types for the HTTP service.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Errors raised while configuring or starting the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to read config file {path}: {source}")]
    ReadConfig {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ParseConfig(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("server i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors returned to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request could not be decoded or its parameters were rejected.
    #[error("{0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Fizzbuzz(#[from] fizzbuzz::FizzbuzzError),
}

#[derive(Serialize)]
struct ErrorBody {
    status: &'static str,
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            status: "Invalid request.",
            error: self.to_string(),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}
