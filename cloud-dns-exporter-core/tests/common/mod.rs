//! 共享测试工具: mock provider / factory / certificate checker

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use cloud_dns_exporter_core::{
    AccountSpec, CacheStore, CertChecker, CollectionTargets, CollectorSettings, CoreError,
    CoreResult, LeafCertificate, MemoryCache, ProviderFactory, ServiceContext, UuidGenerator,
};
use cloud_dns_exporter_provider::{
    full_record_name, Account, DnsProvider, Domain, DomainType, ProviderError, Record,
    RecordStatus,
};
use tokio::sync::RwLock;

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

pub const RECORD_TTL: Duration = Duration::from_secs(300);
pub const CERT_TTL: Duration = Duration::from_secs(90_000);

// ===== MockProvider =====

/// Serves fixed domains / records; either listing can be switched to fail.
pub struct MockProvider {
    id: &'static str,
    account: String,
    records: RwLock<Vec<Record>>,
    fail_domains: bool,
    fail_records: bool,
}

impl MockProvider {
    pub fn new(id: &'static str, account: &str, records: Vec<Record>) -> Self {
        Self {
            id,
            account: account.to_string(),
            records: RwLock::new(records),
            fail_domains: false,
            fail_records: false,
        }
    }

    #[must_use]
    pub fn failing_domains(mut self) -> Self {
        self.fail_domains = true;
        self
    }

    #[must_use]
    pub fn failing_records(mut self) -> Self {
        self.fail_records = true;
        self
    }

    pub async fn set_record_value(&self, record_id: &str, value: &str) {
        for record in self.records.write().await.iter_mut() {
            if record.record_id == record_id {
                record.record_value = value.to_string();
            }
        }
    }

    fn failure(&self, listing: &str) -> ProviderError {
        ProviderError::CollectionFailed {
            provider: self.id.to_string(),
            listing: listing.to_string(),
            detail: "simulated outage".to_string(),
        }
    }
}

#[async_trait]
impl DnsProvider for MockProvider {
    fn id(&self) -> &'static str {
        self.id
    }

    async fn list_domains(&self) -> cloud_dns_exporter_provider::Result<Vec<Domain>> {
        if self.fail_domains {
            return Err(self.failure("domains"));
        }
        let records = self.records.read().await;
        let names: HashSet<_> = records.iter().map(|r| r.domain_name.clone()).collect();
        Ok(names
            .into_iter()
            .map(|name| Domain {
                cloud_provider: self.id.to_string(),
                cloud_name: self.account.clone(),
                domain_id: DomainType::Public.domain_id(&name),
                domain_name: name,
                domain_type: DomainType::Public,
                domain_remark: String::new(),
                domain_status: "normal".to_string(),
                created_date: String::new(),
                expiry_date: String::new(),
                days_until_expiry: 0,
            })
            .collect())
    }

    async fn list_records(&self) -> cloud_dns_exporter_provider::Result<Vec<Record>> {
        if self.fail_records {
            return Err(self.failure("records"));
        }
        Ok(self.records.read().await.clone())
    }
}

// ===== MockFactory =====

/// Hands out registered providers by account name.
#[derive(Default)]
pub struct MockFactory {
    providers: HashMap<String, Arc<MockProvider>>,
}

impl MockFactory {
    pub fn with(mut self, provider: MockProvider) -> Self {
        self.providers
            .insert(provider.account.clone(), Arc::new(provider));
        self
    }

    pub fn provider(&self, account: &str) -> Option<Arc<MockProvider>> {
        self.providers.get(account).cloned()
    }
}

#[async_trait]
impl ProviderFactory for MockFactory {
    async fn create(&self, account: &Account) -> CoreResult<Arc<dyn DnsProvider>> {
        self.providers
            .get(&account.name)
            .map(|p| Arc::clone(p) as Arc<dyn DnsProvider>)
            .ok_or_else(|| CoreError::ProviderNotFound(account.name.clone()))
    }
}

// ===== CountingCertChecker =====

/// Returns a 90-day certificate for every host; hosts under `down.` are unreachable.
#[derive(Default)]
pub struct CountingCertChecker {
    calls: AtomicUsize,
    hosts: std::sync::Mutex<Vec<String>>,
}

impl CountingCertChecker {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn probed_hosts(&self) -> Vec<String> {
        self.hosts.lock().map(|h| h.clone()).unwrap_or_default()
    }

    pub fn reset(&self) {
        self.calls.store(0, Ordering::SeqCst);
        if let Ok(mut hosts) = self.hosts.lock() {
            hosts.clear();
        }
    }
}

#[async_trait]
impl CertChecker for CountingCertChecker {
    async fn check(&self, host: &str) -> CoreResult<LeafCertificate> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut hosts) = self.hosts.lock() {
            hosts.push(host.to_string());
        }
        if host.starts_with("down.") {
            return Err(CoreError::CertCheck {
                host: host.to_string(),
                detail: "connection refused".to_string(),
            });
        }
        let now = Utc::now();
        Ok(LeafCertificate {
            subject_common_name: host.to_string(),
            issuer: "CN=Mock CA".to_string(),
            not_before: now - chrono::Duration::days(1),
            not_after: now + chrono::Duration::days(89),
        })
    }
}

// ===== Builders =====

pub fn spec(provider: &str, name: &str) -> AccountSpec {
    AccountSpec::new(
        provider,
        HashMap::from([
            ("name".to_string(), name.to_string()),
            ("secretId".to_string(), "id".to_string()),
            ("secretKey".to_string(), "key".to_string()),
        ]),
    )
}

pub fn record(provider: &str, account: &str, id: &str, label: &str, value: &str) -> Record {
    Record {
        cloud_provider: provider.to_string(),
        cloud_name: account.to_string(),
        domain_name: "example.com".to_string(),
        domain_type: DomainType::Public,
        record_id: id.to_string(),
        record_type: "A".to_string(),
        record_name: label.to_string(),
        record_value: value.to_string(),
        record_ttl: 600,
        record_weight: 0,
        record_status: RecordStatus::Enable,
        record_remark: String::new(),
        update_time: String::new(),
        full_record: full_record_name(label, "example.com"),
    }
}

pub struct Harness {
    pub ctx: Arc<ServiceContext>,
    pub record_cache: Arc<MemoryCache>,
    pub cert_cache: Arc<MemoryCache>,
    pub checker: Arc<CountingCertChecker>,
}

impl Harness {
    pub fn new(accounts: Vec<AccountSpec>, custom_records: Vec<String>, factory: Arc<MockFactory>) -> Self {
        let record_cache = Arc::new(MemoryCache::new("records", RECORD_TTL, 1024 * 1024));
        let cert_cache = Arc::new(MemoryCache::new("certs", CERT_TTL, 1024 * 1024));
        let checker = Arc::new(CountingCertChecker::default());

        let ctx = Arc::new(ServiceContext::new(
            CollectorSettings {
                cert_check_concurrency: 4,
                ..CollectorSettings::default()
            },
            CollectionTargets {
                accounts,
                custom_records,
            },
            factory,
            Arc::clone(&record_cache) as Arc<dyn CacheStore>,
            Arc::clone(&cert_cache) as Arc<dyn CacheStore>,
            Arc::clone(&checker) as Arc<dyn CertChecker>,
            Arc::new(UuidGenerator),
        ));

        Self {
            ctx,
            record_cache,
            cert_cache,
            checker,
        }
    }

    pub async fn cached<T: serde::de::DeserializeOwned>(
        cache: &MemoryCache,
        key: &str,
    ) -> Option<Vec<T>> {
        let bytes = cache.get(key).await.ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}
