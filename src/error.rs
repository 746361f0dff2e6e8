//! Error types for the webhook process.
//!
//! Validation outcomes are not errors; they are reported as
//! [`crate::validation::ErrorList`]. These variants cover failures to start
//! or run the servers.

use thiserror::Error;

/// Error type for webhook operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// TLS configuration error
    #[error("TLS configuration error: {0}")]
    TlsConfig(String),

    /// Server error
    #[error("Webhook server error: {0}")]
    Server(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for webhook operations
pub type Result<T> = std::result::Result<T, Error>;
