//! Synthetic records for hostnames declared under `custom_records`.

use cloud_dns_exporter_provider::{DomainType, Record, RecordStatus};

use crate::cache::CUSTOM_RECORDS;
use crate::traits::IdGenerator;
use crate::types::CertInfo;

/// Build the record checked for `host`.
///
/// The record id is taken from a previous entry for the same host when there is one,
/// so unchanged hosts are carried over instead of re-probed.
pub fn custom_record(host: &str, previous: &[CertInfo], ids: &dyn IdGenerator) -> Record {
    let host = host.trim().trim_end_matches('.').to_ascii_lowercase();

    let domain_name = psl::domain_str(&host).map_or_else(
        || {
            log::warn!("[{CUSTOM_RECORDS}] No registrable domain for '{host}'");
            String::new()
        },
        str::to_string,
    );

    let record_id = previous
        .iter()
        .find(|c| c.full_record == host)
        .map_or_else(|| ids.next_id(), |c| c.record_id.clone());

    Record {
        cloud_provider: CUSTOM_RECORDS.to_string(),
        cloud_name: CUSTOM_RECORDS.to_string(),
        domain_name,
        domain_type: DomainType::Public,
        record_id,
        record_type: "CNAME".to_string(),
        record_name: host.clone(),
        record_value: host.clone(),
        record_ttl: 0,
        record_weight: 0,
        record_status: RecordStatus::Enable,
        record_remark: String::new(),
        update_time: String::new(),
        full_record: host,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::UuidGenerator;
    use chrono::Utc;

    #[test]
    fn status_host_becomes_enabled_cname() {
        let record = custom_record("status.example.com", &[], &UuidGenerator);
        assert_eq!(record.record_type, "CNAME");
        assert_eq!(record.record_status, RecordStatus::Enable);
        assert_eq!(record.full_record, "status.example.com");
        assert_eq!(record.record_value, "status.example.com");
        assert_eq!(record.domain_name, "example.com");
        assert_eq!(record.domain_type, DomainType::Public);
        assert_eq!(record.cloud_provider, "custom_records");
        assert_eq!(record.cloud_name, "custom_records");
        assert!(!record.record_id.is_empty());
    }

    #[test]
    fn multi_label_suffix() {
        let record = custom_record("api.shop.example.co.uk.", &[], &UuidGenerator);
        assert_eq!(record.full_record, "api.shop.example.co.uk");
        assert_eq!(record.domain_name, "example.co.uk");
    }

    #[test]
    fn record_id_reused_from_previous_entry() {
        let first = custom_record("status.example.com", &[], &UuidGenerator);
        let previous = vec![CertInfo::unreachable(&first, "refused".to_string(), Utc::now())];

        let second = custom_record("status.example.com", &previous, &UuidGenerator);
        assert_eq!(second.record_id, first.record_id);

        let other = custom_record("www.example.com", &previous, &UuidGenerator);
        assert_ne!(other.record_id, first.record_id);
    }
}
