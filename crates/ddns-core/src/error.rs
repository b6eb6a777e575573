//! Error types for the DDNS system
//!
//! Every failure of a run maps onto one of three kinds: configuration,
//! address resolution (`Network`, `Protocol`, `BadResponse`, `NotFound`),
//! or the provider call.

use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS system
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network-related errors
    #[error("Network error: {0}")]
    Network(#[from] std::io::Error),

    /// A DNS message could not be encoded or decoded
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The resolver answered with a failure code or a mismatched message
    #[error("Bad response: {0}")]
    BadResponse(String),

    /// The resolver answered successfully but without a usable record
    #[error("Not found: {0}")]
    NotFound(String),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a protocol error
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Create a "bad response" error
    pub fn bad_response(msg: impl Into<String>) -> Self {
        Self::BadResponse(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Whether this error came from discovering the public address
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Protocol(_) | Self::BadResponse(_) | Self::NotFound(_)
        )
    }
}
