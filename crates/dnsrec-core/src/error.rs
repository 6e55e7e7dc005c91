//! Error types for the reconciliation core
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for reconciliation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Zone or record not found (provider status 404)
    ///
    /// Not fatal by itself: the reconciler branches on it.
    #[error("error code 404 - {0} not found")]
    NotFound(String),

    /// Any other non-2xx provider response, surfaced verbatim
    #[error("error code {code} - {message}")]
    Provider {
        /// HTTP-like status code reported by the provider
        code: u16,
        /// Provider error message
        message: String,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Provider returned a record the reconciler cannot address
    ///
    /// Raised after a provider call, so never a configuration error.
    #[error("Malformed provider record: {0}")]
    MalformedRecord(String),

    /// HTTP transport errors (request never produced a status)
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors (reading a record spec)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a provider error carrying a status code
    pub fn provider(code: u16, message: impl Into<String>) -> Self {
        Self::Provider {
            code,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a malformed provider record error
    pub fn malformed_record(msg: impl Into<String>) -> Self {
        Self::MalformedRecord(msg.into())
    }

    /// Create an HTTP transport error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Whether this error is a provider "not found"
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether this error comes from runner settings or spec validation
    ///
    /// Only these are raised before any provider call.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::InvalidInput(_))
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

/// Explicit branching on "not found" results
///
/// Provider lookups return `Err(Error::NotFound)` for missing resources.
/// `found()` folds exactly that case into `Ok(None)` and leaves every
/// other error untouched.
pub trait OptionalExt<T> {
    /// Map `NotFound` to `Ok(None)`, `Ok(v)` to `Ok(Some(v))`
    fn found(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for Result<T> {
    fn found(self) -> Result<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(Error::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
