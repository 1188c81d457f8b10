use serde::{Deserialize, Serialize};

/// Unified error type for every provider call made during collection.
///
/// Each variant carries a `provider` field naming the vendor that produced it.
/// All variants serialize with a `code` tag so they can be logged as structured data.
///
/// # Retryable Errors
///
/// - [`NetworkError`](Self::NetworkError)
/// - [`Timeout`](Self::Timeout)
/// - [`RateLimited`](Self::RateLimited)
///
/// The HTTP layer retries these with exponential backoff before surfacing them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// A network-level failure (DNS resolution, connection refused, HTTP 502-504).
    NetworkError {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The static or delegated credentials were rejected.
    InvalidCredentials {
        /// Provider that produced the error.
        provider: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// Exchanging the static secret for a delegated credential failed.
    CredentialExchange {
        /// Provider that produced the error.
        provider: String,
        /// Role identifier that was being assumed.
        role: String,
        /// Error details.
        detail: String,
    },

    /// The API rate limit has been exceeded (HTTP 429 or a throttling code).
    RateLimited {
        /// Provider that produced the error.
        provider: String,
        /// Suggested wait time in seconds before retrying, if provided by the API.
        retry_after: Option<u64>,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The HTTP request timed out.
    Timeout {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The requested domain or zone does not exist.
    DomainNotFound {
        /// Provider that produced the error.
        provider: String,
        /// Domain name or zone id that was not found.
        domain: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The zone exists but has no records.
    ///
    /// Some vendors report an empty listing as an error; adapters turn it back into an empty page.
    NoRecords {
        /// Provider that produced the error.
        provider: String,
        /// Domain name or zone id that was queried.
        domain: String,
    },

    /// The credential lacks permission for the requested listing.
    PermissionDenied {
        /// Provider that produced the error.
        provider: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// Failed to parse the provider's API response.
    ParseError {
        /// Provider that produced the error.
        provider: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize request parameters.
    SerializationError {
        /// Provider that produced the error.
        provider: String,
        /// Details about the serialization failure.
        detail: String,
    },

    /// Every attempted visibility class (public / private) failed.
    CollectionFailed {
        /// Provider that produced the error.
        provider: String,
        /// What was being listed ("domains" or "records").
        listing: String,
        /// Message of the last failure.
        detail: String,
    },

    /// An unrecognized error from the provider API.
    Unknown {
        /// Provider that produced the error.
        provider: String,
        /// Raw error code from the API, if available.
        raw_code: Option<String>,
        /// Raw error message from the API.
        raw_message: String,
    },
}

impl ProviderError {
    /// Whether the error is an expected condition (bad credentials, missing zone, ...).
    ///
    /// Callers log expected errors at `warn` and everything else at `error`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::CredentialExchange { .. }
                | Self::DomainNotFound { .. }
                | Self::NoRecords { .. }
                | Self::PermissionDenied { .. }
        )
    }

    /// Name of the provider that produced this error.
    pub fn provider(&self) -> &str {
        match self {
            Self::NetworkError { provider, .. }
            | Self::InvalidCredentials { provider, .. }
            | Self::CredentialExchange { provider, .. }
            | Self::RateLimited { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::DomainNotFound { provider, .. }
            | Self::NoRecords { provider, .. }
            | Self::PermissionDenied { provider, .. }
            | Self::ParseError { provider, .. }
            | Self::SerializationError { provider, .. }
            | Self::CollectionFailed { provider, .. }
            | Self::Unknown { provider, .. } => provider,
        }
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { provider, detail } => {
                write!(f, "[{provider}] Network error: {detail}")
            }
            Self::InvalidCredentials {
                provider,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{provider}] Invalid credentials: {msg}")
                } else {
                    write!(f, "[{provider}] Invalid credentials")
                }
            }
            Self::CredentialExchange {
                provider,
                role,
                detail,
            } => {
                write!(f, "[{provider}] Failed to assume role '{role}': {detail}")
            }
            Self::RateLimited {
                provider,
                retry_after,
                ..
            } => {
                if let Some(secs) = retry_after {
                    write!(f, "[{provider}] Rate limited (retry after {secs}s)")
                } else {
                    write!(f, "[{provider}] Rate limited")
                }
            }
            Self::Timeout { provider, detail } => {
                write!(f, "[{provider}] Request timeout: {detail}")
            }
            Self::DomainNotFound {
                provider,
                domain,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{provider}] Domain '{domain}' not found: {msg}")
                } else {
                    write!(f, "[{provider}] Domain '{domain}' not found")
                }
            }
            Self::NoRecords { provider, domain } => {
                write!(f, "[{provider}] Domain '{domain}' has no records")
            }
            Self::PermissionDenied {
                provider,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{provider}] Permission denied: {msg}")
                } else {
                    write!(f, "[{provider}] Permission denied")
                }
            }
            Self::ParseError { provider, detail } => {
                write!(f, "[{provider}] Parse error: {detail}")
            }
            Self::SerializationError { provider, detail } => {
                write!(f, "[{provider}] Serialization error: {detail}")
            }
            Self::CollectionFailed {
                provider,
                listing,
                detail,
            } => {
                write!(f, "[{provider}] Listing {listing} failed: {detail}")
            }
            Self::Unknown {
                provider,
                raw_message,
                ..
            } => {
                write!(f, "[{provider}] {raw_message}")
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// Convenience type alias for `Result<T, ProviderError>`.
pub type Result<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_network_error() {
        let e = ProviderError::NetworkError {
            provider: "tencent".to_string(),
            detail: "connection refused".to_string(),
        };
        assert_eq!(e.to_string(), "[tencent] Network error: connection refused");
    }

    #[test]
    fn display_invalid_credentials_variants() {
        let with_msg = ProviderError::InvalidCredentials {
            provider: "aliyun".to_string(),
            raw_message: Some("bad key".to_string()),
        };
        let without_msg = ProviderError::InvalidCredentials {
            provider: "aliyun".to_string(),
            raw_message: None,
        };
        assert_eq!(with_msg.to_string(), "[aliyun] Invalid credentials: bad key");
        assert_eq!(without_msg.to_string(), "[aliyun] Invalid credentials");
    }

    #[test]
    fn display_credential_exchange() {
        let e = ProviderError::CredentialExchange {
            provider: "aliyun".to_string(),
            role: "acs:ram::1:role/dns".to_string(),
            detail: "NoPermission".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "[aliyun] Failed to assume role 'acs:ram::1:role/dns': NoPermission"
        );
    }

    #[test]
    fn display_rate_limited_with_retry_after() {
        let e = ProviderError::RateLimited {
            provider: "tencent".to_string(),
            retry_after: Some(3),
            raw_message: None,
        };
        assert_eq!(e.to_string(), "[tencent] Rate limited (retry after 3s)");
    }

    #[test]
    fn display_collection_failed() {
        let e = ProviderError::CollectionFailed {
            provider: "aliyun".to_string(),
            listing: "records".to_string(),
            detail: "timeout".to_string(),
        };
        assert_eq!(e.to_string(), "[aliyun] Listing records failed: timeout");
    }

    #[test]
    fn expected_errors_classified() {
        let expected = ProviderError::PermissionDenied {
            provider: "aliyun".to_string(),
            raw_message: None,
        };
        let unexpected = ProviderError::ParseError {
            provider: "aliyun".to_string(),
            detail: "eof".to_string(),
        };
        assert!(expected.is_expected());
        assert!(!unexpected.is_expected());
    }

    #[test]
    fn provider_accessor_returns_tag() {
        let e = ProviderError::NoRecords {
            provider: "tencent".to_string(),
            domain: "example.com".to_string(),
        };
        assert_eq!(e.provider(), "tencent");
    }

    #[test]
    fn serializes_with_code_tag() {
        let e = ProviderError::Timeout {
            provider: "aliyun".to_string(),
            detail: "30s".to_string(),
        };
        let json = serde_json::to_value(&e).unwrap_or_default();
        assert_eq!(json["code"], "Timeout");
        assert_eq!(json["provider"], "aliyun");
    }
}
