//! Honeypot control-plane error taxonomy (spec §7).

use axum::http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HoneypotError {
    #[error("A honeypot using port {port} already exists. Please use a different port.")]
    AlreadyExists { port: u16 },

    #[error("Honeypot type '{0}' not found. Please use one of the available types from /types.")]
    UnknownType(String),

    #[error("Honeypot '{0}' not found")]
    NotFound(String),

    #[error("Could not create the honeypot image. System resources might be insufficient: {0}")]
    ImageFailure(String),

    #[error("Failed to manage the honeypot container: {0}")]
    ContainerFailure(String),

    #[error(
        "Cannot use privileged port {port}. Please use a port number >= 1024 or configure your \
         system to allow rootless containers to use privileged ports."
    )]
    PrivilegedPort { port: u16 },

    #[error("Port {port} already in use")]
    PortInUse { port: u16 },

    #[error("Honeypot '{name}' has active connections on port {port}")]
    ActiveConnections { name: String, port: u16 },

    #[error("Honeypot '{0}' is still running; stop it before deleting")]
    ContainerBusy(String),

    #[error("Honeypot '{0}' is already running")]
    AlreadyRunning(String),

    #[error("Honeypot '{0}' is not running; start it before restarting")]
    NotRunning(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Insufficient permissions to perform this operation")]
    PermissionDenied,
}

impl HoneypotError {
    pub fn status_and_message(&self) -> (StatusCode, String) {
        let status = match self {
            HoneypotError::AlreadyExists { .. } | HoneypotError::PortInUse { .. } => {
                StatusCode::CONFLICT
            }
            HoneypotError::UnknownType(_) | HoneypotError::NotFound(_) => StatusCode::NOT_FOUND,
            HoneypotError::PrivilegedPort { .. } | HoneypotError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            HoneypotError::ActiveConnections { .. } => StatusCode::LOCKED,
            HoneypotError::ImageFailure(_) | HoneypotError::ContainerFailure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            HoneypotError::ContainerBusy(_) => StatusCode::CONFLICT,
            HoneypotError::AlreadyRunning(_) | HoneypotError::NotRunning(_) => StatusCode::CONFLICT,
            HoneypotError::PermissionDenied => StatusCode::FORBIDDEN,
        };
        (status, self.to_string())
    }
}

pub type HoneypotResult<T> = Result<T, HoneypotError>;
