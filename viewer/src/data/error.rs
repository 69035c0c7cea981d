//! Unified error type for trace providers
//!
//! Every provider (HTTP API, JSON files, in-memory) reports failures through
//! this type while keeping track of which backend produced them.

use thiserror::Error;

/// Unified error type for trace data fetches
#[derive(Error, Debug)]
pub enum DataError {
    /// Transport-level HTTP failure (connect, TLS, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("{backend} returned HTTP {status}: {message}")]
    Status {
        backend: &'static str,
        status: u16,
        message: String,
    },

    /// Payload could not be decoded
    #[error("Failed to decode {what}: {error}")]
    Decode { what: String, error: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request timeout
    #[error("Request timeout after {timeout_secs}s on {backend}")]
    Timeout {
        backend: &'static str,
        timeout_secs: u64,
    },
}

impl DataError {
    /// Create a status error
    pub fn status(backend: &'static str, status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            backend,
            status,
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(what: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self::Decode {
            what: what.into(),
            error: error.to_string(),
        }
    }

    /// Create a timeout error
    pub fn timeout(backend: &'static str, timeout_secs: u64) -> Self {
        Self::Timeout {
            backend,
            timeout_secs,
        }
    }

    /// Check if this error might succeed on retry
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Decode { .. } | Self::Io(_) | Self::Config(_) => false,
        }
    }
}
