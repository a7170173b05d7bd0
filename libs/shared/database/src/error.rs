use thiserror::Error;

use shared_models::error::AppError;

/// Failures talking to the coordination service, classified by what the
/// caller can do about them.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Coordination service error ({status}): {message}")]
    Remote { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid header value for {0}")]
    InvalidHeader(&'static str),
}

impl ServiceError {
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => ServiceError::Unauthorized(message),
            404 => ServiceError::NotFound(message),
            409 => ServiceError::Conflict(message),
            400..=499 => ServiceError::Rejected { status, message },
            _ => ServiceError::Remote { status, message },
        }
    }

    /// Transport failures and 5xx answers may succeed on a second try.
    pub fn is_retryable(&self) -> bool {
        match self {
            ServiceError::Transport(_) => true,
            ServiceError::Remote { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unauthorized(msg) => AppError::Auth(msg),
            ServiceError::NotFound(msg) => AppError::NotFound(msg),
            ServiceError::Conflict(msg) => AppError::Conflict(msg),
            ServiceError::Rejected { message, .. } => AppError::BadRequest(message),
            other => AppError::ExternalService(other.to_string()),
        }
    }
}
