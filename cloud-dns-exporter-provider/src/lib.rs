//! # cloud-dns-exporter-provider
//!
//! Read-only DNS inventory adapters for cloud platforms, normalized into one
//! [`Domain`] / [`Record`] model.
//!
//! ## Supported Providers
//!
//! | Provider | Feature Flag | Public DNS | Private DNS | Auth Method |
//! |----------|-------------|------------|-------------|-------------|
//! | [Aliyun](https://www.aliyun.com/product/dns) | `aliyun` | Alidns | PrivateZone | ACS3-HMAC-SHA256 |
//! | [Tencent Cloud](https://cloud.tencent.com/product/cns) | `tencent` | `DNSPod` | PrivateDNS | TC3-HMAC-SHA256 |
//!
//! ## Feature Flags
//!
//! - **`all-providers`** *(default)*: Enable all providers listed above.
//! - **`aliyun`** / **`tencent`**: Enable a single provider.
//! - **`native-tls`** *(default)* / **`rustls`**: TLS backend of the HTTP client.
//!
//! ## Credentials
//!
//! Every adapter signs through a [`CredentialManager`]. Accounts configured with a
//! `roleArn` exchange their static secret for a short-lived delegated credential via
//! the vendor STS; the manager refreshes it five minutes before expiry and lets
//! concurrent callers share one refresh.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::collections::HashMap;
//! use std::sync::Arc;
//! use cloud_dns_exporter_provider::{
//!     create_credential_manager, create_provider, Account, ProviderType,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let fields = HashMap::from([
//!         ("name".to_string(), "prod".to_string()),
//!         ("secretId".to_string(), "AKID...".to_string()),
//!         ("secretKey".to_string(), "...".to_string()),
//!         ("enablePrivateDNS".to_string(), "true".to_string()),
//!     ]);
//!     let account = Account::from_map(ProviderType::Tencent, &fields)?;
//!     let credentials = Arc::new(create_credential_manager(&account)?);
//!     let provider = create_provider(&account, credentials)?;
//!
//!     for record in provider.list_records().await? {
//!         println!("{} {} -> {}", record.full_record, record.record_type, record.record_value);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ProviderError>`](ProviderError). Listings
//! tolerate partial failure: a failing zone or visibility class is logged and
//! skipped, and `Err` is returned only when nothing could be collected.
//! Transient errors (`NetworkError`, `Timeout`, `RateLimited`) are retried with
//! exponential backoff.

mod credentials;
mod error;
mod factory;
mod http_client;
mod pagination;
mod providers;
mod traits;
mod types;
mod utils;

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export factory functions
pub use factory::{create_credential_manager, create_provider};

pub use traits::DnsProvider;

pub use credentials::{
    AccessCredential, CredentialManager, DelegatedCredential, ROLE_SESSION_DURATION_SECS,
    ROLE_SESSION_NAME, RoleAssumer, refresh_lookahead,
};

pub use pagination::{MAX_PAGES, collect_pages, page_offset};

pub use types::{
    Account, CredentialValidationError, Domain, DomainType, ProviderType, Record, RecordStatus,
};

// Re-export utils module
pub use utils::datetime;
pub use utils::log_sanitizer::{mask_secret, truncate_for_log};

pub use providers::common::full_record_name;

#[cfg(feature = "aliyun")]
pub use providers::{AliyunProvider, AliyunProviderBuilder, AliyunRoleAssumer};

#[cfg(feature = "tencent")]
pub use providers::{TencentProvider, TencentProviderBuilder, TencentRoleAssumer};
