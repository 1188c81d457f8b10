//! Cloud DNS Exporter Core Library
//!
//! Collection engine behind the exporter:
//! - DNS pass: concurrent per-account listing of domains and records into a
//!   short-TTL cache (`domain_list_*`, `record_list_*`)
//! - Certificate pass: TLS expiry of every enabled web-facing record, deduplicated
//!   against the previous run, into a long-TTL cache (`record_cert_info_*`)
//! - Cron scheduling of both passes
//!
//! Storage, adapter creation and certificate probing sit behind traits so that the
//! passes can run against in-memory fakes.

pub mod cache;
pub mod config;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;

// Re-export common types
pub use cache::{CacheStore, MemoryCache};
pub use config::{AccountSpec, CollectorSettings, Configuration};
pub use error::{CoreError, CoreResult};
pub use services::{CertCollector, CollectionTargets, DnsCollector, Scheduler, ServiceContext};
pub use traits::{CertChecker, DefaultProviderFactory, IdGenerator, ProviderFactory, UuidGenerator};
pub use types::{CertInfo, CertStatus, LeafCertificate, PassSummary};
