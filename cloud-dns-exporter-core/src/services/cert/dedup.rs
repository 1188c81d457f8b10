//! Candidate selection and change detection.
//!
//! A record is probed again only if nothing trustworthy is known about it: a previous
//! entry with the same identity, value and FQDN that is still valid and younger than
//! the maximum age is carried over instead.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use cloud_dns_exporter_provider::{Record, RecordStatus};

use crate::types::{CertInfo, CertStatus};

/// Record types that can front an HTTPS endpoint.
const CERT_RECORD_TYPES: [&str; 3] = ["A", "AAAA", "CNAME"];

fn is_candidate(record: &Record) -> bool {
    record.record_status == RecordStatus::Enable
        && CERT_RECORD_TYPES
            .iter()
            .any(|t| record.record_type.eq_ignore_ascii_case(t))
        && !record.record_name.contains('*')
        && !record.full_record.contains('*')
}

/// Numeric ids compare by value, anything else lexically.
fn record_id_order(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}

/// Enabled `A` / `AAAA` / `CNAME` records with a concrete host, one per FQDN.
///
/// When several records share an FQDN the one with the lowest record id is kept, so
/// the choice does not depend on the order the vendor lists them in.
pub fn candidate_records(records: Vec<Record>) -> Vec<Record> {
    let mut kept: Vec<Record> = Vec::new();
    let mut by_fqdn: HashMap<String, usize> = HashMap::new();

    for record in records.into_iter().filter(is_candidate) {
        let fqdn = record.full_record.to_ascii_lowercase();
        match by_fqdn.get(&fqdn).and_then(|&i| kept.get_mut(i)) {
            Some(slot) => {
                if record_id_order(&record.record_id, &slot.record_id).is_lt() {
                    *slot = record;
                }
            }
            None => {
                by_fqdn.insert(fqdn, kept.len());
                kept.push(record);
            }
        }
    }
    kept
}

/// Split of one account's candidates.
#[derive(Debug, Default)]
pub struct Partition {
    /// Previous entries reused as-is, with `days_until_expiry` recomputed.
    pub carried: Vec<CertInfo>,
    pub to_probe: Vec<Record>,
}

/// Carry over what is still trustworthy, probe the rest.
///
/// An unchanged record is checked again when its previous entry is unreachable, has
/// expired by `now`, or was checked `max_age` or longer ago.
pub fn partition_candidates(
    candidates: Vec<Record>,
    previous: &[CertInfo],
    now: DateTime<Utc>,
    max_age: Duration,
) -> Partition {
    let known: HashMap<(&str, &str, &str), &CertInfo> = previous
        .iter()
        .filter(|c| c.status != CertStatus::Unreachable)
        .map(|c| {
            (
                (
                    c.cloud_provider.as_str(),
                    c.cloud_name.as_str(),
                    c.record_id.as_str(),
                ),
                c,
            )
        })
        .collect();

    let mut partition = Partition::default();
    for record in candidates {
        let identity = (
            record.cloud_provider.as_str(),
            record.cloud_name.as_str(),
            record.record_id.as_str(),
        );
        let reusable = known
            .get(&identity)
            .filter(|prev| prev.matches(&record))
            .map(|prev| {
                let mut carried = (*prev).clone();
                carried.refresh_expiry(now);
                carried
            })
            .filter(|carried| {
                let stale = (now - carried.checked_at)
                    .to_std()
                    .is_ok_and(|age| age >= max_age);
                carried.status == CertStatus::Valid && !stale
            });

        match reusable {
            Some(carried) => partition.carried.push(carried),
            None => partition.to_probe.push(record),
        }
    }
    partition
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LeafCertificate;
    use chrono::Duration;
    use cloud_dns_exporter_provider::DomainType;

    fn record(id: &str, name: &str, record_type: &str, value: &str) -> Record {
        Record {
            cloud_provider: "aliyun".to_string(),
            cloud_name: "prod".to_string(),
            domain_name: "example.com".to_string(),
            domain_type: DomainType::Public,
            record_id: id.to_string(),
            record_type: record_type.to_string(),
            record_name: name.to_string(),
            record_value: value.to_string(),
            record_ttl: 600,
            record_weight: 0,
            record_status: RecordStatus::Enable,
            record_remark: String::new(),
            update_time: String::new(),
            full_record: cloud_dns_exporter_provider::full_record_name(name, "example.com"),
        }
    }

    const MAX_AGE: std::time::Duration = std::time::Duration::from_secs(7 * 24 * 3600);

    fn checked(record: &Record, now: DateTime<Utc>) -> CertInfo {
        CertInfo::from_certificate(
            record,
            LeafCertificate {
                subject_common_name: record.full_record.clone(),
                issuer: "CN=Test CA".to_string(),
                not_before: now - Duration::days(60),
                not_after: now + Duration::days(30),
            },
            now,
        )
    }

    #[test]
    fn selects_enabled_web_records_once_per_fqdn() {
        let mut disabled = record("4", "old", "A", "192.0.2.9");
        disabled.record_status = RecordStatus::Disable;
        let records = vec![
            record("1", "www", "A", "192.0.2.1"),
            record("2", "www", "AAAA", "2001:db8::1"),
            record("3", "mail", "MX", "mx.example.com"),
            disabled,
            record("5", "*", "A", "192.0.2.2"),
            record("6", "*.dev", "CNAME", "dev.example.net"),
            record("7", "@", "cname", "lb.example.net"),
        ];

        let fqdns: Vec<_> = candidate_records(records)
            .into_iter()
            .map(|r| r.full_record)
            .collect();
        assert_eq!(fqdns, vec!["www.example.com", "example.com"]);
    }

    #[test]
    fn unchanged_record_is_carried() {
        let now = Utc::now();
        let www = record("1", "www", "A", "192.0.2.1");
        let previous = vec![checked(&www, now - Duration::days(2))];

        let partition = partition_candidates(vec![www], &previous, now, MAX_AGE);
        assert!(partition.to_probe.is_empty());
        assert_eq!(partition.carried.len(), 1);
        assert_eq!(partition.carried[0].days_until_expiry, 28);
    }

    #[test]
    fn changed_value_or_unreachable_is_probed() {
        let now = Utc::now();
        let www = record("1", "www", "A", "192.0.2.1");
        let api = record("2", "api", "A", "192.0.2.5");
        let previous = vec![
            checked(&record("1", "www", "A", "192.0.2.100"), now),
            CertInfo::unreachable(&api, "timed out".to_string(), now),
        ];

        let partition = partition_candidates(vec![www, api], &previous, now, MAX_AGE);
        assert!(partition.carried.is_empty());
        assert_eq!(partition.to_probe.len(), 2);
    }

    #[test]
    fn identity_includes_account() {
        let now = Utc::now();
        let www = record("1", "www", "A", "192.0.2.1");
        let mut other_account = checked(&www, now);
        other_account.cloud_name = "staging".to_string();

        let partition = partition_candidates(vec![www], &[other_account], now, MAX_AGE);
        assert_eq!(partition.to_probe.len(), 1);
    }

    #[test]
    fn lowest_record_id_wins_regardless_of_listing_order() {
        let listed = vec![
            record("12", "www", "AAAA", "2001:db8::1"),
            record("9", "www", "A", "192.0.2.1"),
            record("10", "www", "A", "192.0.2.2"),
        ];
        let mut reversed = listed.clone();
        reversed.reverse();

        let first = candidate_records(listed);
        let second = candidate_records(reversed);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].record_id, "9");
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].record_id, "9");
    }

    #[test]
    fn expired_entry_is_checked_again() {
        let now = Utc::now();
        let www = record("1", "www", "A", "192.0.2.1");
        let mut previous = checked(&www, now - Duration::days(1));
        previous.not_after = Some(now - Duration::hours(1));

        let partition = partition_candidates(vec![www], &[previous], now, MAX_AGE);
        assert!(partition.carried.is_empty());
        assert_eq!(partition.to_probe.len(), 1);
    }

    #[test]
    fn entry_older_than_max_age_is_checked_again() {
        let now = Utc::now();
        let www = record("1", "www", "A", "192.0.2.1");
        let api = record("2", "api", "A", "192.0.2.2");
        // Certificate still valid for a year, but last looked at long ago.
        let mut old = checked(&www, now - Duration::days(120));
        old.not_after = Some(now + Duration::days(365));
        let fresh = checked(&api, now - Duration::hours(1));

        let partition = partition_candidates(vec![www, api], &[old, fresh], now, MAX_AGE);
        assert_eq!(partition.to_probe.len(), 1);
        assert_eq!(partition.to_probe[0].record_id, "1");
        assert_eq!(partition.carried.len(), 1);
        assert_eq!(partition.carried[0].record_id, "2");
    }
}
