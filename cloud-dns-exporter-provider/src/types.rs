use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ============ Provider Types ============

/// Identifies which vendor adapter serves an account.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// Alibaba Cloud (Alidns + PrivateZone).
    Aliyun,
    /// Tencent Cloud (`DNSPod` + PrivateDNS).
    Tencent,
}

impl ProviderType {
    /// Provider id as used in configuration files and cache keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Aliyun => "aliyun",
            Self::Tencent => "tencent",
        }
    }
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderType {
    type Err = CredentialValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aliyun" => Ok(Self::Aliyun),
            "tencent" => Ok(Self::Tencent),
            _ => Err(CredentialValidationError::InvalidFormat {
                provider: s.to_string(),
                field: "cloud_provider".to_string(),
                label: "Provider".to_string(),
                reason: format!("Provider '{s}' is not supported"),
            }),
        }
    }
}

// ============ Domain / Record ============

/// Visibility class of a zone.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DomainType {
    /// Publicly resolvable authoritative zone.
    Public,
    /// VPC-scoped private zone.
    Private,
}

impl DomainType {
    /// Builds the account-unique domain id, prefixed with the visibility class.
    ///
    /// `public_<domain name>` or `private_<vendor zone id>`.
    pub fn domain_id(self, raw: &str) -> String {
        format!("{}_{raw}", self.as_str())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

/// Normalized record status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Enable,
    Disable,
}

impl RecordStatus {
    /// `enable` / `enabled` in any case map to [`RecordStatus::Enable`], anything else disables.
    pub fn from_vendor(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("enable") || raw.eq_ignore_ascii_case("enabled") {
            Self::Enable
        } else {
            Self::Disable
        }
    }
}

/// A zone owned by an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub cloud_provider: String,
    pub cloud_name: String,
    /// `public_<name>` or `private_<zoneId>`; unique per `(provider, account)`.
    pub domain_id: String,
    pub domain_name: String,
    pub domain_type: DomainType,
    pub domain_remark: String,
    pub domain_status: String,
    /// `YYYY-MM-DD HH:MM:SS`, empty when the vendor value could not be parsed.
    pub created_date: String,
    /// Reserved; vendors used here do not report registration expiry.
    pub expiry_date: String,
    /// Reserved; always 0.
    pub days_until_expiry: i64,
}

/// A resource record inside a zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub cloud_provider: String,
    pub cloud_name: String,
    pub domain_name: String,
    pub domain_type: DomainType,
    pub record_id: String,
    pub record_type: String,
    /// Host label relative to the zone (`@`, `www`, `*.api`, ...).
    pub record_name: String,
    pub record_value: String,
    pub record_ttl: u32,
    pub record_weight: u32,
    pub record_status: RecordStatus,
    pub record_remark: String,
    /// `YYYY-MM-DD HH:MM:SS`, empty when the vendor does not report it.
    pub update_time: String,
    pub full_record: String,
}

// ============ Account ============

/// Structured error for invalid account attribute maps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CredentialValidationError {
    /// A required field is missing entirely.
    MissingField {
        provider: String,
        field: String,
        label: String,
    },
    /// A field is present but empty or whitespace-only.
    EmptyField {
        provider: String,
        field: String,
        label: String,
    },
    /// A field has an invalid format.
    InvalidFormat {
        provider: String,
        field: String,
        label: String,
        reason: String,
    },
}

impl std::fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField {
                provider, label, ..
            } => write!(f, "[{provider}] Missing required field: {label}"),
            Self::EmptyField {
                provider, label, ..
            } => write!(f, "[{provider}] Field must not be empty: {label}"),
            Self::InvalidFormat {
                provider,
                label,
                reason,
                ..
            } => write!(f, "[{provider}] {label}: {reason}"),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// One configured cloud account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub provider: ProviderType,
    /// Account name, used in cache keys and as `cloud_name` on collected data.
    pub name: String,
    pub secret_id: String,
    pub secret_key: String,
    /// Role to assume through the vendor STS; `None` means the static secret is used directly.
    pub role_arn: Option<String>,
    pub enable_private_dns: bool,
    pub region: Option<String>,
}

impl Account {
    /// Builds an account from a configuration attribute map.
    ///
    /// Recognised keys: `name`, `secretId`, `secretKey` (required), `roleArn`,
    /// `enablePrivateDNS`, `region` (optional).
    ///
    /// # Errors
    /// Returns [`CredentialValidationError`] if a required field is missing or blank,
    /// or if `enablePrivateDNS` is not a boolean.
    pub fn from_map(
        provider: ProviderType,
        map: &HashMap<String, String>,
    ) -> Result<Self, CredentialValidationError> {
        let enable_private_dns = match optional_field(map, "enablePrivateDNS") {
            None => false,
            Some(raw) => parse_bool(&raw).ok_or_else(|| CredentialValidationError::InvalidFormat {
                provider: provider.to_string(),
                field: "enablePrivateDNS".to_string(),
                label: "Enable Private DNS".to_string(),
                reason: format!("expected true/false, got '{raw}'"),
            })?,
        };

        Ok(Self {
            provider,
            name: get_required_field(provider, map, "name", "Account Name")?,
            secret_id: get_required_field(provider, map, "secretId", "Secret ID")?,
            secret_key: get_required_field(provider, map, "secretKey", "Secret Key")?,
            role_arn: optional_field(map, "roleArn"),
            enable_private_dns,
            region: optional_field(map, "region"),
        })
    }

    /// Whether this account collects through a delegated (assumed-role) credential.
    pub fn uses_delegation(&self) -> bool {
        self.role_arn.is_some()
    }
}

fn get_required_field(
    provider: ProviderType,
    map: &HashMap<String, String>,
    key: &str,
    label: &str,
) -> Result<String, CredentialValidationError> {
    match map.get(key) {
        None => Err(CredentialValidationError::MissingField {
            provider: provider.to_string(),
            field: key.to_string(),
            label: label.to_string(),
        }),
        Some(v) if v.trim().is_empty() => Err(CredentialValidationError::EmptyField {
            provider: provider.to_string(),
            field: key.to_string(),
            label: label.to_string(),
        }),
        Some(v) => Ok(v.trim().to_string()),
    }
}

fn optional_field(map: &HashMap<String, String>, key: &str) -> Option<String> {
    map.get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
