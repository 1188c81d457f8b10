//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use cloud_dns_exporter_provider::{CredentialValidationError, ProviderError};

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Configuration could not be read or is invalid (fatal at startup)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Account attribute map failed validation (structured, field level)
    #[error("{0}")]
    CredentialValidation(CredentialValidationError),

    /// No adapter for the configured provider id
    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    /// Key missing or expired
    #[error("Cache miss: {0}")]
    CacheMiss(String),

    /// Value exceeds the store's entry size limit
    #[error("Cache entry '{key}' is {size} bytes, limit is {limit}")]
    EntryTooLarge {
        key: String,
        size: usize,
        limit: usize,
    },

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// TCP connect, TLS handshake or certificate parsing failed
    #[error("Certificate check failed for {host}: {detail}")]
    CertCheck { host: String, detail: String },

    /// Provider error (converting from library)
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl CoreError {
    /// Whether it is expected behavior (missing data, unreachable host, bad input), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added. **
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::CacheMiss(_)
            | Self::ProviderNotFound(_)
            | Self::ValidationError(_)
            | Self::CredentialValidation(_)
            | Self::CertCheck { .. } => true,
            Self::Provider(e) => e.is_expected(),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::SerializationError(e.to_string())
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
