//! 采集服务层

mod cert;
mod collector;
mod scheduler;

pub use cert::{candidate_records, custom_record, partition_candidates, CertCollector};
#[cfg(feature = "rustls")]
pub use cert::TlsCertChecker;
pub use collector::DnsCollector;
pub use scheduler::{next_fire, parse_schedule, Scheduler};

use std::sync::Arc;

use serde::Serialize;

use crate::cache::CacheStore;
use crate::config::{AccountSpec, CollectorSettings, Configuration};
use crate::error::{CoreError, CoreResult};
use crate::traits::{CertChecker, IdGenerator, ProviderFactory};

/// What a pass iterates over.
#[derive(Debug, Clone, Default)]
pub struct CollectionTargets {
    pub accounts: Vec<AccountSpec>,
    /// Hostnames declared in the configuration.
    pub custom_records: Vec<String>,
}

impl CollectionTargets {
    pub fn from_config(config: &Configuration) -> CoreResult<Self> {
        Ok(Self {
            accounts: config.account_specs()?,
            custom_records: config.custom_records.clone(),
        })
    }
}

/// 服务上下文 - 持有所有依赖
///
/// Built once at startup and shared by every pass; nothing here is global.
pub struct ServiceContext {
    pub settings: CollectorSettings,
    pub targets: CollectionTargets,
    /// Adapter factory (owns the credential registry)
    pub provider_factory: Arc<dyn ProviderFactory>,
    /// Short-TTL cache: `domain_list_*`, `record_list_*`
    pub record_cache: Arc<dyn CacheStore>,
    /// Long-TTL cache: `record_cert_info_*`
    pub cert_cache: Arc<dyn CacheStore>,
    pub cert_checker: Arc<dyn CertChecker>,
    pub id_generator: Arc<dyn IdGenerator>,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(
        settings: CollectorSettings,
        targets: CollectionTargets,
        provider_factory: Arc<dyn ProviderFactory>,
        record_cache: Arc<dyn CacheStore>,
        cert_cache: Arc<dyn CacheStore>,
        cert_checker: Arc<dyn CertChecker>,
        id_generator: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            settings,
            targets,
            provider_factory,
            record_cache,
            cert_cache,
            cert_checker,
            id_generator,
        }
    }

    /// Read and decode a JSON list from `cache`.
    pub(crate) async fn read_list<T: serde::de::DeserializeOwned>(
        cache: &dyn CacheStore,
        key: &str,
    ) -> CoreResult<Vec<T>> {
        let bytes = cache.get(key).await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| CoreError::SerializationError(format!("{key}: {e}")))
    }

    /// Encode `items` as JSON and store them under `key` with the cache's default TTL.
    pub(crate) async fn write_list<T: Serialize + Sync>(
        cache: &dyn CacheStore,
        key: &str,
        items: &[T],
    ) -> CoreResult<()> {
        let bytes = serde_json::to_vec(items)
            .map_err(|e| CoreError::SerializationError(format!("{key}: {e}")))?;
        cache.set(key, bytes, None).await
    }
}

/// Log `err` at `warn` when expected and `error` otherwise.
pub(crate) fn log_core_error(context: &str, err: &CoreError) {
    if err.is_expected() {
        log::warn!("{context}: {err}");
    } else {
        log::error!("{context}: {err}");
    }
}
