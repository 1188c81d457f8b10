//! Core data types

use chrono::{DateTime, Utc};
use cloud_dns_exporter_provider::{DomainType, Record};
use serde::{Deserialize, Serialize};

/// Outcome of one certificate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CertStatus {
    Valid,
    Expired,
    /// Connect or handshake failed; no certificate data.
    Unreachable,
}

/// Fields of a leaf certificate used for expiry reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafCertificate {
    pub subject_common_name: String,
    pub issuer: String,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
}

/// Certificate state of one record, cached under `record_cert_info_<provider>_<account>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertInfo {
    pub cloud_provider: String,
    pub cloud_name: String,
    pub domain_name: String,
    pub domain_type: DomainType,
    pub record_id: String,
    pub record_value: String,
    /// Host probed (record FQDN), also the SNI name.
    pub full_record: String,
    pub subject_common_name: String,
    pub issuer: String,
    pub not_before: Option<DateTime<Utc>>,
    pub not_after: Option<DateTime<Utc>>,
    pub days_until_expiry: i64,
    pub status: CertStatus,
    pub error: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl CertInfo {
    /// Entry for a successfully read certificate.
    pub fn from_certificate(record: &Record, cert: LeafCertificate, now: DateTime<Utc>) -> Self {
        let mut info = Self::base(record, now);
        info.subject_common_name = cert.subject_common_name;
        info.issuer = cert.issuer;
        info.not_before = Some(cert.not_before);
        info.not_after = Some(cert.not_after);
        info.refresh_expiry(now);
        info
    }

    /// Degraded entry for a host that could not be checked.
    pub fn unreachable(record: &Record, error: String, now: DateTime<Utc>) -> Self {
        let mut info = Self::base(record, now);
        info.error = Some(error);
        info
    }

    fn base(record: &Record, now: DateTime<Utc>) -> Self {
        Self {
            cloud_provider: record.cloud_provider.clone(),
            cloud_name: record.cloud_name.clone(),
            domain_name: record.domain_name.clone(),
            domain_type: record.domain_type,
            record_id: record.record_id.clone(),
            record_value: record.record_value.clone(),
            full_record: record.full_record.clone(),
            subject_common_name: String::new(),
            issuer: String::new(),
            not_before: None,
            not_after: None,
            days_until_expiry: 0,
            status: CertStatus::Unreachable,
            error: None,
            checked_at: now,
        }
    }

    /// Recompute `days_until_expiry` and `status` from the stored expiry.
    ///
    /// Unreachable entries have no expiry and are left untouched.
    pub fn refresh_expiry(&mut self, now: DateTime<Utc>) {
        let Some(not_after) = self.not_after else {
            return;
        };
        self.days_until_expiry = (not_after - now).num_days();
        self.status = if not_after <= now {
            CertStatus::Expired
        } else {
            CertStatus::Valid
        };
    }

    /// Whether this entry describes the same record, value and host as `record`.
    pub fn matches(&self, record: &Record) -> bool {
        self.cloud_provider == record.cloud_provider
            && self.cloud_name == record.cloud_name
            && self.record_id == record.record_id
            && self.record_value == record.record_value
            && self.full_record == record.full_record
    }
}

/// Per-pass account counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// Accounts skipped without error (e.g. no cached records).
    pub skipped: usize,
}

impl PassSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed + self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use cloud_dns_exporter_provider::RecordStatus;

    fn record() -> Record {
        Record {
            cloud_provider: "aliyun".to_string(),
            cloud_name: "prod".to_string(),
            domain_name: "example.com".to_string(),
            domain_type: DomainType::Public,
            record_id: "1".to_string(),
            record_type: "A".to_string(),
            record_name: "www".to_string(),
            record_value: "192.0.2.1".to_string(),
            record_ttl: 600,
            record_weight: 0,
            record_status: RecordStatus::Enable,
            record_remark: String::new(),
            update_time: String::new(),
            full_record: "www.example.com".to_string(),
        }
    }

    fn leaf(not_after: DateTime<Utc>) -> LeafCertificate {
        LeafCertificate {
            subject_common_name: "www.example.com".to_string(),
            issuer: "CN=Test CA".to_string(),
            not_before: not_after - Duration::days(90),
            not_after,
        }
    }

    #[test]
    fn valid_and_expired() {
        let now = Utc::now();
        let valid = CertInfo::from_certificate(&record(), leaf(now + Duration::days(30) + Duration::hours(1)), now);
        assert_eq!(valid.status, CertStatus::Valid);
        assert_eq!(valid.days_until_expiry, 30);

        let expired = CertInfo::from_certificate(&record(), leaf(now - Duration::days(2)), now);
        assert_eq!(expired.status, CertStatus::Expired);
        assert_eq!(expired.days_until_expiry, -2);
    }

    #[test]
    fn refresh_moves_days_forward() {
        let now = Utc::now();
        let mut info = CertInfo::from_certificate(&record(), leaf(now + Duration::days(10) + Duration::hours(1)), now);
        info.refresh_expiry(now + Duration::days(3));
        assert_eq!(info.days_until_expiry, 7);
        info.refresh_expiry(now + Duration::days(11));
        assert_eq!(info.status, CertStatus::Expired);
    }

    #[test]
    fn unreachable_has_no_expiry() {
        let mut info = CertInfo::unreachable(&record(), "connection refused".to_string(), Utc::now());
        info.refresh_expiry(Utc::now());
        assert_eq!(info.status, CertStatus::Unreachable);
        assert_eq!(info.days_until_expiry, 0);
        assert!(info.matches(&record()));
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&CertStatus::Unreachable).unwrap_or_default();
        assert_eq!(json, "\"unreachable\"");
    }
}
