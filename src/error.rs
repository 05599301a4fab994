// Error handling module
// Defines the error type shared by the transport and API modules

use thiserror::Error;

/// Errors that can occur while talking to the news service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Session could not be established or renewed
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Non-success status returned by the API, passed through uninterpreted
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Connection, timeout or body decoding failure
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Internal client error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// HTTP status of an API error response, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this error is an authorization failure from the API
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ApiError>;
