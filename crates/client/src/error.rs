//! Errors surfaced by the MediBuddy client

use thiserror::Error;

/// Failure of an API call or of client setup
///
/// [`ApiClient::request`](crate::ApiClient::request) only returns
/// [`Request`](Self::Request); status variants come from
/// [`ApiClient::request_json`](crate::ApiClient::request_json).
#[derive(Debug, Error)]
pub enum ClientError {
    /// The call never produced a response
    #[error("Transport error: {0}")]
    Request(#[from] reqwest::Error),

    /// Any other non-2xx answer
    #[error("Backend error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// 401 that survived session recovery
    #[error("Session rejected: {0}")]
    AuthenticationFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 403 that survived session recovery
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Request or response body is not the expected JSON
    #[error("Invalid JSON body: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid client configuration: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Map a non-2xx status and its message
    pub fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        match status.as_u16() {
            400 => Self::BadRequest(message),
            401 => Self::AuthenticationFailed(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            _ => Self::ServerError {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Whether the backend rejected the session (401 or 403)
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self, Self::AuthenticationFailed(_) | Self::Forbidden(_))
    }
}

impl From<medibuddy_core::CoreError> for ClientError {
    fn from(error: medibuddy_core::CoreError) -> Self {
        Self::Configuration(error.to_string())
    }
}
