//! Error types for the HomieFixie client.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Message shown whenever a request never reached the backend.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

/// Errors that can occur while driving a HomieFixie flow.
#[derive(Error, Debug)]
pub enum Error {
    /// Rejected locally before any request was made
    #[error("Validation error: {0}")]
    Validation(String),

    /// Request never completed (connection refused, timeout, ...)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Backend answered 2xx but the body was not understood
    #[error("Decode error: {0}")]
    Decode(String),

    /// Local file error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Text to show the user for this error.
    ///
    /// Validation and API messages are shown verbatim; anything that looks like
    /// a transport problem collapses to a generic retry hint.
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation(message) => message.clone(),
            Error::Api { message, .. } => message.clone(),
            Error::Network(_) | Error::Decode(_) => NETWORK_ERROR_MESSAGE.to_string(),
            Error::Io(e) => format!("Could not read file: {}", e),
            Error::Config(message) => message.clone(),
            Error::Serialization(_) => NETWORK_ERROR_MESSAGE.to_string(),
        }
    }

    /// HTTP status code for backend errors, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the error was caught before touching the network.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}
