//! Error handling for the LifeHub client

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Unified error type for the LifeHub client.
///
/// The error is `Clone` so one failed read can be handed to every caller
/// that was waiting on it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The request never got a response
    #[error("Network error: {0}")]
    Network(String),

    /// The request exceeded the client timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The server answered with a non-success status
    #[error("Request failed with status {status}: {detail}")]
    Request { status: u16, detail: String },

    /// The server rejected the session token; stored credentials are gone
    #[error("Session expired: {0}")]
    AuthExpired(String),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Credential storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Input rejected before anything was sent
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Create a new request error
    pub fn request<T: fmt::Display>(status: u16, detail: T) -> Self {
        Error::Request {
            status,
            detail: detail.to_string(),
        }
    }

    /// Create a new credential storage error
    pub fn storage<T: fmt::Display>(msg: T) -> Self {
        Error::Storage(msg.to_string())
    }

    /// Create a new invalid input error
    pub fn invalid_input<T: fmt::Display>(msg: T) -> Self {
        Error::InvalidInput(msg.to_string())
    }

    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }

    /// HTTP status carried by the error, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Request { status, .. } => Some(*status),
            Error::AuthExpired(_) => Some(401),
            _ => None,
        }
    }

    /// Whether the server refused the caller's credentials
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Server-supplied detail message, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            Error::Request { detail, .. } | Error::AuthExpired(detail) => Some(detail),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Storage(err.to_string())
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
