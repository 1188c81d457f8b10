//! YAML configuration.
//!
//! ```yaml
//! custom_records: [status.example.com]
//! cloud_providers:
//!   aliyun:
//!     accounts:
//!       - name: prod
//!         secretId: ...
//!         secretKey: ...
//!         roleArn: acs:ram::123:role/dns-reader
//!         enablePrivateDNS: "true"
//! collector:
//!   dns_schedule: "0 */5 * * * *"
//!   cert_max_age_secs: 43200
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use cloud_dns_exporter_provider::{Account, ProviderType};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Default DNS collection schedule (every 5 minutes, with seconds field).
pub const DEFAULT_DNS_SCHEDULE: &str = "0 */5 * * * *";
/// Default certificate collection schedule (hourly).
pub const DEFAULT_CERT_SCHEDULE: &str = "0 0 * * * *";

/// Top-level configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Configuration {
    /// Hostnames whose certificates are checked in addition to discovered records.
    #[serde(default)]
    pub custom_records: Vec<String>,
    /// Provider id -> accounts. Ordered so passes log in a stable order.
    #[serde(default)]
    pub cloud_providers: BTreeMap<String, ProviderAccounts>,
    #[serde(default)]
    pub collector: CollectorSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderAccounts {
    /// Raw attribute maps; values may be YAML strings, booleans or numbers.
    #[serde(default)]
    pub accounts: Vec<BTreeMap<String, serde_yaml::Value>>,
}

/// Scheduling, cache and certificate-check tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorSettings {
    pub dns_schedule: String,
    pub cert_schedule: String,
    pub record_cache_ttl_secs: u64,
    pub cert_cache_ttl_secs: u64,
    pub cache_max_entry_bytes: usize,
    pub cert_check_concurrency: usize,
    pub cert_check_timeout_secs: u64,
    /// Re-check unchanged records whose last check is at least this old.
    /// Defaults to `cert_cache_ttl_secs`.
    pub cert_max_age_secs: Option<u64>,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            dns_schedule: DEFAULT_DNS_SCHEDULE.to_string(),
            cert_schedule: DEFAULT_CERT_SCHEDULE.to_string(),
            record_cache_ttl_secs: 300,
            cert_cache_ttl_secs: 25 * 3600,
            cache_max_entry_bytes: 16 * 1024 * 1024,
            cert_check_concurrency: 16,
            cert_check_timeout_secs: 5,
            cert_max_age_secs: None,
        }
    }
}

impl CollectorSettings {
    pub fn record_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.record_cache_ttl_secs)
    }

    pub fn cert_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cert_cache_ttl_secs)
    }

    pub fn cert_check_timeout(&self) -> Duration {
        Duration::from_secs(self.cert_check_timeout_secs)
    }

    pub fn cert_max_age(&self) -> Duration {
        Duration::from_secs(self.cert_max_age_secs.unwrap_or(self.cert_cache_ttl_secs))
    }

    fn validate(&self) -> CoreResult<()> {
        for (field, expr) in [
            ("dns_schedule", &self.dns_schedule),
            ("cert_schedule", &self.cert_schedule),
        ] {
            cron::Schedule::from_str(expr).map_err(|e| {
                CoreError::ConfigError(format!("collector.{field} '{expr}' is not a valid cron expression: {e}"))
            })?;
        }
        for (field, value) in [
            ("record_cache_ttl_secs", self.record_cache_ttl_secs),
            ("cert_cache_ttl_secs", self.cert_cache_ttl_secs),
            ("cert_check_timeout_secs", self.cert_check_timeout_secs),
            ("cert_max_age_secs", self.cert_max_age_secs.unwrap_or(1)),
        ] {
            if value == 0 {
                return Err(CoreError::ConfigError(format!("collector.{field} must be positive")));
            }
        }
        if self.cert_check_concurrency == 0 || self.cache_max_entry_bytes == 0 {
            return Err(CoreError::ConfigError(
                "collector.cert_check_concurrency and collector.cache_max_entry_bytes must be positive"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// One configured account before validation.
///
/// Validation is deferred to collection time so that a bad entry only fails its own
/// task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSpec {
    /// Provider id as written in the configuration.
    pub provider_id: String,
    pub fields: HashMap<String, String>,
}

impl AccountSpec {
    pub fn new(provider_id: impl Into<String>, fields: HashMap<String, String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            fields,
        }
    }

    /// Label for log lines: `<provider>/<name>`, or `<provider>/#?` when unnamed.
    pub fn label(&self) -> String {
        let name = self
            .fields
            .get("name")
            .map_or("#?", String::as_str);
        format!("{}/{name}", self.provider_id)
    }

    /// Resolve the provider id and validate the attribute map.
    pub fn to_account(&self) -> CoreResult<Account> {
        let provider = ProviderType::from_str(&self.provider_id)
            .map_err(|_| CoreError::ProviderNotFound(self.provider_id.clone()))?;
        Account::from_map(provider, &self.fields).map_err(CoreError::CredentialValidation)
    }
}

impl Configuration {
    pub fn from_yaml_str(raw: &str) -> CoreResult<Self> {
        let config: Self = serde_yaml::from_str(raw)
            .map_err(|e| CoreError::ConfigError(format!("invalid YAML: {e}")))?;
        config.collector.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> CoreResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CoreError::ConfigError(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&raw)
    }

    /// Every configured account, in provider order then file order.
    pub fn account_specs(&self) -> CoreResult<Vec<AccountSpec>> {
        let mut specs = Vec::new();
        for (provider_id, group) in &self.cloud_providers {
            for (index, raw) in group.accounts.iter().enumerate() {
                let mut fields = HashMap::with_capacity(raw.len());
                for (key, value) in raw {
                    let value = scalar_to_string(value).ok_or_else(|| {
                        CoreError::ConfigError(format!(
                            "cloud_providers.{provider_id}.accounts[{index}].{key} must be a scalar"
                        ))
                    })?;
                    fields.insert(key.clone(), value);
                }
                specs.push(AccountSpec::new(provider_id.clone(), fields));
            }
        }
        Ok(specs)
    }
}

fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Null => Some(String::new()),
        _ => None,
    }
}
