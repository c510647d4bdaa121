//! Top-level error type and HTTP status mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::honeypot::error::HoneypotError;
use crate::infra::error::InfraError;
use crate::runtime::RuntimeError;

/// Error composed at the HTTP boundary from every component's own error type.
#[derive(Error, Debug)]
pub enum DaemonError {
    #[error(transparent)]
    Honeypot(#[from] HoneypotError),

    #[error(transparent)]
    Infra(#[from] InfraError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for DaemonError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            DaemonError::Honeypot(e) => e.status_and_message(),
            DaemonError::Infra(e) => e.status_and_message(),
            DaemonError::Runtime(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            DaemonError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            DaemonError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "detail": message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, DaemonError>;
