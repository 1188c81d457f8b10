//! Cache key grammar: `<metric>_<provider>_<account>`.

use std::fmt;

/// Provider and account name used for hostnames declared in the configuration.
pub const CUSTOM_RECORDS: &str = "custom_records";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    DomainList,
    RecordList,
    RecordCertInfo,
}

impl MetricName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DomainList => "domain_list",
            Self::RecordList => "record_list",
            Self::RecordCertInfo => "record_cert_info",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn cache_key(metric: MetricName, provider: &str, account: &str) -> String {
    format!("{metric}_{provider}_{account}")
}

/// `record_cert_info_custom_records`
pub fn custom_records_key() -> String {
    format!("{}_{CUSTOM_RECORDS}", MetricName::RecordCertInfo)
}
