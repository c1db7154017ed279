//! Error types for the auth proxy.

use crate::api::Envelope;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;
use thiserror::Error;

/// Proxy error types.
///
/// Every variant renders as an [`Envelope`] so no request ends without a JSON body.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("path not found")]
    NotFound,

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("malformed request data: {0}")]
    MalformedBody(String),

    /// Body could not be read, e.g. over the size limit.
    #[error("malformed request data: {reason}")]
    BodyRejected { status: u16, reason: String },

    #[error("missing required user info")]
    MissingUserInfo,

    #[error("invalid email format")]
    InvalidEmail,

    #[error("connection error: {0}")]
    Transport(String),

    /// Non-2xx answer from upstream, passed through with its status.
    #[error("{message}")]
    Upstream {
        status: u16,
        message: String,
        details: Value,
    },
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::NotFound => StatusCode::NOT_FOUND,
            ProxyError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::MalformedBody(_)
            | ProxyError::MissingUserInfo
            | ProxyError::InvalidEmail => StatusCode::BAD_REQUEST,
            ProxyError::BodyRejected { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST)
            }
            ProxyError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        let body = match self {
            ProxyError::Upstream { details, .. } => Envelope::failure(message).with_details(details),
            _ => Envelope::failure(message),
        };

        (status, Json(body)).into_response()
    }
}

impl From<reqwest::Error> for ProxyError {
    fn from(e: reqwest::Error) -> Self {
        ProxyError::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for ProxyError {
    fn from(e: serde_json::Error) -> Self {
        ProxyError::MalformedBody(e.to_string())
    }
}
