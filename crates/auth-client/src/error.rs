//! Auth client errors.

use thiserror::Error;
use user_registration::ValidationError;

/// Failure of a single request to the proxy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// Non-2xx answer; `message` comes from the body when it has one.
    #[error("{message}")]
    Status { status_code: u16, message: String },

    #[error("network request failed: {0}")]
    Network(String),

    #[error("failed to parse response data")]
    Parse,
}

impl RequestError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            RequestError::Status { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("connection test failed: {0}")]
    ConnectionTest(#[source] RequestError),

    #[error("{message}")]
    Registration {
        status_code: Option<u16>,
        message: String,
    },
}
