//! Application bootstrap for cloud-dns-exporter.
//!
//! Provides `AppState` (context + scheduler) and `AppStateBuilder`, which wires the
//! default adapters around a loaded [`Configuration`] and lets tests swap any of them.

use std::path::Path;
use std::sync::Arc;

use cloud_dns_exporter_core::error::{CoreError, CoreResult};
use cloud_dns_exporter_core::services::{CollectionTargets, Scheduler, ServiceContext};
use cloud_dns_exporter_core::traits::{
    CertChecker, DefaultProviderFactory, IdGenerator, ProviderFactory, UuidGenerator,
};
use cloud_dns_exporter_core::{CacheStore, Configuration, MemoryCache};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "CLOUD_DNS_EXPORTER_CONFIG";
/// Configuration file used when neither an argument nor [`CONFIG_ENV`] is given.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Pick the configuration path: first CLI argument, then [`CONFIG_ENV`], then the default.
pub fn resolve_config_path(arg: Option<String>, env: Option<String>) -> String {
    let non_blank = |p: &String| !p.trim().is_empty();
    arg.filter(non_blank)
        .or_else(|| env.filter(non_blank))
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
}

/// Everything the daemon needs at runtime.
pub struct AppState {
    /// Shared collection context (settings, targets, caches, adapters)
    pub ctx: Arc<ServiceContext>,
    /// Startup sequence and cron loops
    pub scheduler: Scheduler,
}

impl AppState {
    /// Load `path` and build the state with default adapters.
    pub fn from_config_file(path: &Path) -> CoreResult<Self> {
        let config = Configuration::load(path)?;
        AppStateBuilder::new().configuration(config).build()
    }

    /// Run the startup sequence, then both schedules until `shutdown` resolves.
    pub async fn run(&self, shutdown: impl std::future::Future<Output = ()>) {
        log::info!(
            "Collecting {} account(s) and {} custom record(s)",
            self.ctx.targets.accounts.len(),
            self.ctx.targets.custom_records.len()
        );
        self.scheduler.run(shutdown).await;
    }
}

/// Builder for `AppState`.
///
/// # Required
/// - `configuration`
///
/// # Optional
/// - `provider_factory`: defaults to `DefaultProviderFactory`
/// - `cert_checker`: defaults to `TlsCertChecker` (requires the `rustls` feature)
/// - `record_cache` / `cert_cache`: default to `MemoryCache` sized from the settings
/// - `id_generator`: defaults to `UuidGenerator`
pub struct AppStateBuilder {
    configuration: Option<Configuration>,
    provider_factory: Option<Arc<dyn ProviderFactory>>,
    cert_checker: Option<Arc<dyn CertChecker>>,
    record_cache: Option<Arc<dyn CacheStore>>,
    cert_cache: Option<Arc<dyn CacheStore>>,
    id_generator: Option<Arc<dyn IdGenerator>>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            configuration: None,
            provider_factory: None,
            cert_checker: None,
            record_cache: None,
            cert_cache: None,
            id_generator: None,
        }
    }

    #[must_use]
    pub fn configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = Some(configuration);
        self
    }

    #[must_use]
    pub fn provider_factory(mut self, factory: Arc<dyn ProviderFactory>) -> Self {
        self.provider_factory = Some(factory);
        self
    }

    #[must_use]
    pub fn cert_checker(mut self, checker: Arc<dyn CertChecker>) -> Self {
        self.cert_checker = Some(checker);
        self
    }

    #[must_use]
    pub fn record_cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.record_cache = Some(cache);
        self
    }

    #[must_use]
    pub fn cert_cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cert_cache = Some(cache);
        self
    }

    #[must_use]
    pub fn id_generator(mut self, generator: Arc<dyn IdGenerator>) -> Self {
        self.id_generator = Some(generator);
        self
    }

    /// Build the `AppState`.
    ///
    /// # Errors
    /// `CoreError::ValidationError` if the configuration is missing, `ConfigError` if an
    /// account entry or schedule is malformed, `CertCheck` if the TLS client cannot be
    /// set up.
    pub fn build(self) -> CoreResult<AppState> {
        let configuration = self.configuration.ok_or_else(|| {
            CoreError::ValidationError("configuration is required".to_string())
        })?;
        let settings = configuration.collector.clone();
        let targets = CollectionTargets::from_config(&configuration)?;

        let provider_factory = self
            .provider_factory
            .unwrap_or_else(|| Arc::new(DefaultProviderFactory::new()));
        let cert_checker = match self.cert_checker {
            Some(checker) => checker,
            None => default_cert_checker(settings.cert_check_timeout())?,
        };
        let record_cache = self.record_cache.unwrap_or_else(|| {
            Arc::new(MemoryCache::new(
                "records",
                settings.record_cache_ttl(),
                settings.cache_max_entry_bytes,
            ))
        });
        let cert_cache = self.cert_cache.unwrap_or_else(|| {
            Arc::new(MemoryCache::new(
                "certs",
                settings.cert_cache_ttl(),
                settings.cache_max_entry_bytes,
            ))
        });
        let id_generator = self.id_generator.unwrap_or_else(|| Arc::new(UuidGenerator));

        let ctx = Arc::new(ServiceContext::new(
            settings,
            targets,
            provider_factory,
            record_cache,
            cert_cache,
            cert_checker,
            id_generator,
        ));
        let scheduler = Scheduler::new(&ctx)?;

        Ok(AppState { ctx, scheduler })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "rustls")]
fn default_cert_checker(timeout: std::time::Duration) -> CoreResult<Arc<dyn CertChecker>> {
    let checker = cloud_dns_exporter_core::services::TlsCertChecker::new(timeout)?;
    Ok(Arc::new(checker))
}

#[cfg(not(feature = "rustls"))]
fn default_cert_checker(_timeout: std::time::Duration) -> CoreResult<Arc<dyn CertChecker>> {
    Err(CoreError::ValidationError(
        "cert_checker is required without the rustls feature".to_string(),
    ))
}
