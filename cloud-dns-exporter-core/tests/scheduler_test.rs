//! Startup sequence ordering

mod common;

use std::sync::Arc;

use cloud_dns_exporter_core::cache::{cache_key, custom_records_key, MetricName};
use cloud_dns_exporter_core::{CertInfo, Scheduler};
use common::{record, spec, Harness, MockFactory, MockProvider};

#[tokio::test]
async fn startup_runs_dns_then_certificates_then_custom_records() {
    let factory = Arc::new(MockFactory::default().with(MockProvider::new(
        "aliyun",
        "prod",
        vec![record("aliyun", "prod", "1", "www", "192.0.2.1")],
    )));
    let harness = Harness::new(
        vec![spec("aliyun", "prod")],
        vec!["status.example.com".to_string()],
        factory,
    );

    let scheduler = require_ok!(Scheduler::new(&harness.ctx));
    scheduler.run_startup().await;

    // The certificate pass saw the records written by the DNS pass of the same startup.
    let account: Option<Vec<CertInfo>> = Harness::cached(
        harness.cert_cache.as_ref(),
        &cache_key(MetricName::RecordCertInfo, "aliyun", "prod"),
    )
    .await;
    let custom: Option<Vec<CertInfo>> =
        Harness::cached(harness.cert_cache.as_ref(), &custom_records_key()).await;
    assert_eq!(account.map(|e| e.len()), Some(1));
    assert_eq!(custom.map(|e| e.len()), Some(1));
    assert_eq!(
        harness.checker.probed_hosts(),
        vec!["www.example.com", "status.example.com"]
    );
}

#[tokio::test]
async fn run_stops_on_shutdown() {
    let harness = Harness::new(Vec::new(), Vec::new(), Arc::new(MockFactory::default()));
    let scheduler = require_ok!(Scheduler::new(&harness.ctx));

    let finished = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        scheduler.run(async {}),
    )
    .await;
    assert!(finished.is_ok(), "scheduler did not stop on shutdown");
}
