//! Log infrastructure orchestrator error taxonomy (spec §7).

use axum::http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InfraError {
    #[error("Cannot create services. One or more containers already exist: {0}. Please delete existing services first.")]
    AlreadyExists(String),

    #[error("One or more required containers are missing: {0}. Create services first.")]
    Missing(String),

    #[error("Cannot delete services while running: {0}. Stop them first.")]
    StillRunning(String),

    #[error("Service bootstrap timed out waiting for {0} to become ready")]
    BootstrapTimeout(String),

    #[error("Service operation failed: {0}")]
    RuntimeFailure(String),

    #[error("Insufficient host resources: {0}")]
    HostResourceFailure(String),
}

impl InfraError {
    pub fn status_and_message(&self) -> (StatusCode, String) {
        let status = match self {
            InfraError::AlreadyExists(_) | InfraError::Missing(_) | InfraError::StillRunning(_) => {
                StatusCode::BAD_REQUEST
            }
            InfraError::BootstrapTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            InfraError::RuntimeFailure(_) | InfraError::HostResourceFailure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.to_string())
    }
}

pub type InfraResult<T> = Result<T, InfraError>;
