//! Certificate pass: TLS expiry for discovered and declared hostnames.

mod custom;
mod dedup;
#[cfg(feature = "rustls")]
mod tls;

pub use custom::custom_record;
pub use dedup::{candidate_records, partition_candidates, Partition};
#[cfg(feature = "rustls")]
pub use tls::TlsCertChecker;

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use cloud_dns_exporter_provider::Record;
use futures::future::join_all;
use futures::stream::{self, StreamExt};
use tokio::sync::Mutex;

use crate::cache::{cache_key, custom_records_key, MetricName, CUSTOM_RECORDS};
use crate::config::AccountSpec;
use crate::error::CoreResult;
use crate::services::{log_core_error, ServiceContext};
use crate::traits::CertChecker;
use crate::types::{CertInfo, PassSummary};

/// Result of one account in the certificate pass.
enum AccountOutcome {
    Cached,
    /// No usable record snapshot.
    Skipped,
}

/// Derives `record_cert_info_*` entries from the cached record lists.
///
/// Reads only from the short-TTL record cache: an account whose snapshot has expired
/// is skipped until the next DNS pass refreshes it.
pub struct CertCollector {
    ctx: Arc<ServiceContext>,
    write_lock: Mutex<()>,
}

impl CertCollector {
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            ctx,
            write_lock: Mutex::new(()),
        }
    }

    /// Certificate pass over every configured account.
    pub async fn run(&self) -> PassSummary {
        let started = Instant::now();
        let accounts = &self.ctx.targets.accounts;

        let results = join_all(accounts.iter().map(|spec| async move {
            let result = self.check_account(spec).await;
            if let Err(e) = &result {
                log_core_error(&format!("[{}] Certificate collection failed", spec.label()), e);
            }
            result
        }))
        .await;

        let mut summary = PassSummary::default();
        for result in results {
            match result {
                Ok(AccountOutcome::Cached) => summary.succeeded += 1,
                Ok(AccountOutcome::Skipped) => summary.skipped += 1,
                Err(_) => summary.failed += 1,
            }
        }
        log::info!(
            "Certificate pass finished: {} cached, {} skipped, {} failed in {:?}",
            summary.succeeded,
            summary.skipped,
            summary.failed,
            started.elapsed()
        );
        summary
    }

    /// Certificate check of the hostnames under `custom_records`.
    ///
    /// Returns the number of entries cached.
    pub async fn run_custom(&self) -> CoreResult<usize> {
        let hosts = &self.ctx.targets.custom_records;
        if hosts.is_empty() {
            return Ok(0);
        }

        let key = custom_records_key();
        let previous = self.previous_entries(&key).await;
        let records: Vec<Record> = hosts
            .iter()
            .map(|host| custom_record(host, &previous, self.ctx.id_generator.as_ref()))
            .collect();

        let entries = self.check_records(CUSTOM_RECORDS, records, &previous).await;
        self.store(&key, &entries).await?;
        Ok(entries.len())
    }

    async fn check_account(&self, spec: &AccountSpec) -> CoreResult<AccountOutcome> {
        let account = spec.to_account()?;
        let provider = account.provider.as_str();
        let record_key = cache_key(MetricName::RecordList, provider, &account.name);

        let records: Vec<Record> =
            match ServiceContext::read_list(self.ctx.record_cache.as_ref(), &record_key).await {
                Ok(records) => records,
                Err(e) => {
                    log::warn!("[{record_key}] No usable record snapshot, skipping: {e}");
                    return Ok(AccountOutcome::Skipped);
                }
            };
        if records.is_empty() {
            log::info!("[{record_key}] No records cached, skipping");
            return Ok(AccountOutcome::Skipped);
        }

        let cert_key = cache_key(MetricName::RecordCertInfo, provider, &account.name);
        let previous = self.previous_entries(&cert_key).await;
        let entries = self.check_records(&cert_key, records, &previous).await;
        self.store(&cert_key, &entries).await?;
        Ok(AccountOutcome::Cached)
    }

    /// Current entries under `key`; a miss or undecodable value means nothing is known.
    async fn previous_entries(&self, key: &str) -> Vec<CertInfo> {
        ServiceContext::read_list(self.ctx.cert_cache.as_ref(), key)
            .await
            .unwrap_or_else(|e| {
                log::debug!("[{key}] No previous certificate entries: {e}");
                Vec::new()
            })
    }

    async fn check_records(
        &self,
        label: &str,
        records: Vec<Record>,
        previous: &[CertInfo],
    ) -> Vec<CertInfo> {
        let candidates = candidate_records(records);
        let Partition {
            mut carried,
            to_probe,
        } = partition_candidates(
            candidates,
            previous,
            Utc::now(),
            self.ctx.settings.cert_max_age(),
        );
        log::info!(
            "[{label}] {} certificate(s) unchanged, {} to probe",
            carried.len(),
            to_probe.len()
        );

        let probed = probe_all(
            self.ctx.cert_checker.as_ref(),
            to_probe,
            self.ctx.settings.cert_check_concurrency,
        )
        .await;
        carried.extend(probed);
        carried.sort_by(|a, b| a.full_record.cmp(&b.full_record));
        carried
    }

    async fn store(&self, key: &str, entries: &[CertInfo]) -> CoreResult<()> {
        let _guard = self.write_lock.lock().await;
        ServiceContext::write_list(self.ctx.cert_cache.as_ref(), key, entries).await?;
        log::info!("[{key}] Cached {} certificate entr(ies)", entries.len());
        Ok(())
    }
}

/// Probe `records` through a pool of at most `concurrency` in-flight checks.
///
/// A failed probe yields an `unreachable` entry rather than an error.
pub(crate) async fn probe_all(
    checker: &dyn CertChecker,
    records: Vec<Record>,
    concurrency: usize,
) -> Vec<CertInfo> {
    stream::iter(records)
        .map(|record| async move {
            let result = checker.check(&record.full_record).await;
            let now = Utc::now();
            match result {
                Ok(cert) => CertInfo::from_certificate(&record, cert, now),
                Err(e) => {
                    log::debug!("[cert] {} unreachable: {e}", record.full_record);
                    CertInfo::unreachable(&record, e.to_string(), now)
                }
            }
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await
}
