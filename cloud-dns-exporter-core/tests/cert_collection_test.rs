//! Certificate pass: dedup across runs, custom hostnames, staleness of record snapshots

mod common;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use cloud_dns_exporter_core::cache::{cache_key, custom_records_key, MetricName};
use cloud_dns_exporter_core::{
    CacheStore, CertCollector, CertInfo, CertStatus, DnsCollector, LeafCertificate,
};
use common::{record, spec, Harness, MockFactory, MockProvider, RECORD_TTL};

fn two_record_factory() -> Arc<MockFactory> {
    Arc::new(MockFactory::default().with(MockProvider::new(
        "aliyun",
        "prod",
        vec![
            record("aliyun", "prod", "1", "www", "192.0.2.1"),
            record("aliyun", "prod", "2", "api", "192.0.2.2"),
        ],
    )))
}

async fn cert_entries(harness: &Harness, key: &str) -> Vec<CertInfo> {
    Harness::cached(harness.cert_cache.as_ref(), key)
        .await
        .unwrap_or_default()
}

#[tokio::test]
async fn unchanged_records_are_not_probed_again() {
    let harness = Harness::new(vec![spec("aliyun", "prod")], Vec::new(), two_record_factory());
    let dns = DnsCollector::new(Arc::clone(&harness.ctx));
    let certs = CertCollector::new(Arc::clone(&harness.ctx));

    dns.run().await;
    let first = certs.run().await;
    assert_eq!(first.succeeded, 1);
    assert_eq!(harness.checker.calls(), 2);

    harness.checker.reset();
    dns.run().await;
    certs.run().await;
    assert_eq!(harness.checker.calls(), 0);

    let key = cache_key(MetricName::RecordCertInfo, "aliyun", "prod");
    let entries = cert_entries(&harness, &key).await;
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.status == CertStatus::Valid));
}

#[tokio::test]
async fn changed_record_value_triggers_single_probe() {
    let factory = two_record_factory();
    let harness = Harness::new(vec![spec("aliyun", "prod")], Vec::new(), Arc::clone(&factory));
    let dns = DnsCollector::new(Arc::clone(&harness.ctx));
    let certs = CertCollector::new(Arc::clone(&harness.ctx));

    dns.run().await;
    certs.run().await;
    harness.checker.reset();

    let provider = factory.provider("prod");
    assert!(provider.is_some());
    let Some(provider) = provider else { return };
    provider.set_record_value("2", "198.51.100.7").await;

    dns.run().await;
    certs.run().await;
    assert_eq!(harness.checker.calls(), 1);
    assert_eq!(harness.checker.probed_hosts(), vec!["api.example.com"]);

    let key = cache_key(MetricName::RecordCertInfo, "aliyun", "prod");
    let api = cert_entries(&harness, &key)
        .await
        .into_iter()
        .find(|e| e.record_id == "2");
    assert!(matches!(api, Some(ref e) if e.record_value == "198.51.100.7"));
}

#[tokio::test]
async fn unreachable_hosts_are_retried_next_run() {
    let factory = Arc::new(MockFactory::default().with(MockProvider::new(
        "tencent",
        "staging",
        vec![
            record("tencent", "staging", "1", "www", "192.0.2.1"),
            record("tencent", "staging", "2", "down", "192.0.2.9"),
        ],
    )));
    let harness = Harness::new(vec![spec("tencent", "staging")], Vec::new(), factory);
    let dns = DnsCollector::new(Arc::clone(&harness.ctx));
    let certs = CertCollector::new(Arc::clone(&harness.ctx));

    dns.run().await;
    certs.run().await;
    let key = cache_key(MetricName::RecordCertInfo, "tencent", "staging");
    let down = cert_entries(&harness, &key)
        .await
        .into_iter()
        .find(|e| e.full_record == "down.example.com");
    assert!(matches!(down, Some(ref e) if e.status == CertStatus::Unreachable));

    harness.checker.reset();
    certs.run().await;
    assert_eq!(harness.checker.probed_hosts(), vec!["down.example.com"]);
}

#[tokio::test]
async fn custom_record_is_checked_and_deduplicated() {
    let harness = Harness::new(
        Vec::new(),
        vec!["status.example.com".to_string()],
        Arc::new(MockFactory::default()),
    );
    let certs = CertCollector::new(Arc::clone(&harness.ctx));

    let cached = require_ok!(certs.run_custom().await);
    assert_eq!(cached, 1);
    assert_eq!(harness.checker.probed_hosts(), vec!["status.example.com"]);

    let entries = cert_entries(&harness, &custom_records_key()).await;
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.full_record, "status.example.com");
    assert_eq!(entry.record_value, "status.example.com");
    assert_eq!(entry.domain_name, "example.com");
    assert_eq!(entry.cloud_provider, "custom_records");
    assert_eq!(entry.status, CertStatus::Valid);
    let first_id = entry.record_id.clone();

    harness.checker.reset();
    require_ok!(certs.run_custom().await);
    assert_eq!(harness.checker.calls(), 0);
    let entries = cert_entries(&harness, &custom_records_key()).await;
    assert_eq!(entries.first().map(|e| e.record_id.clone()), Some(first_id));
}

#[tokio::test(start_paused = true)]
async fn expired_record_snapshot_skips_account() {
    let harness = Harness::new(vec![spec("aliyun", "prod")], Vec::new(), two_record_factory());
    DnsCollector::new(Arc::clone(&harness.ctx)).run().await;

    tokio::time::advance(RECORD_TTL + Duration::from_secs(1)).await;

    let summary = CertCollector::new(Arc::clone(&harness.ctx)).run().await;
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.succeeded, 0);
    assert_eq!(harness.checker.calls(), 0);

    let key = cache_key(MetricName::RecordCertInfo, "aliyun", "prod");
    assert!(cert_entries(&harness, &key).await.is_empty());
}

#[tokio::test]
async fn account_without_snapshot_is_skipped() {
    let harness = Harness::new(vec![spec("aliyun", "prod")], Vec::new(), two_record_factory());

    let summary = CertCollector::new(Arc::clone(&harness.ctx)).run().await;
    assert_eq!(summary.skipped, 1);
    assert_eq!(harness.checker.calls(), 0);
}

fn certificate(host: &str, checked_at: chrono::DateTime<Utc>, days_left: i64) -> LeafCertificate {
    LeafCertificate {
        subject_common_name: host.to_string(),
        issuer: "CN=Mock CA".to_string(),
        not_before: checked_at - chrono::Duration::days(1),
        not_after: Utc::now() + chrono::Duration::days(days_left),
    }
}

#[tokio::test]
async fn stale_and_expired_entries_are_checked_again() {
    let harness = Harness::new(vec![spec("aliyun", "prod")], Vec::new(), two_record_factory());
    DnsCollector::new(Arc::clone(&harness.ctx)).run().await;

    let now = Utc::now();
    let long_ago = now - chrono::Duration::days(120);
    let www = record("aliyun", "prod", "1", "www", "192.0.2.1");
    let api = record("aliyun", "prod", "2", "api", "192.0.2.2");
    // www: valid for a year but last checked 120 days ago; api: checked recently, now expired.
    let seeded = vec![
        CertInfo::from_certificate(&www, certificate("www.example.com", long_ago, 365), long_ago),
        CertInfo::from_certificate(&api, certificate("api.example.com", now, -1), now),
    ];
    let key = cache_key(MetricName::RecordCertInfo, "aliyun", "prod");
    let bytes = require_ok!(serde_json::to_vec(&seeded));
    require_ok!(harness.cert_cache.set(&key, bytes, None).await);

    CertCollector::new(Arc::clone(&harness.ctx)).run().await;

    let mut probed = harness.checker.probed_hosts();
    probed.sort();
    assert_eq!(probed, vec!["api.example.com", "www.example.com"]);
    let entries = cert_entries(&harness, &key).await;
    assert!(entries.iter().all(|e| e.status == CertStatus::Valid));
    assert!(entries.iter().all(|e| e.checked_at >= now));
}
