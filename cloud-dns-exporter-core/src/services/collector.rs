//! DNS collection pass: domains and records of every account into the short-TTL cache.

use std::sync::Arc;
use std::time::Instant;

use cloud_dns_exporter_provider::Account;
use futures::future::join_all;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::cache::{cache_key, MetricName};
use crate::config::AccountSpec;
use crate::error::CoreResult;
use crate::services::{log_core_error, ServiceContext};
use crate::types::PassSummary;

/// Runs one task per configured account and waits for all of them.
///
/// A failing account is logged and only loses its own remaining steps; the previous
/// cache entries of that account stay until they expire.
pub struct DnsCollector {
    ctx: Arc<ServiceContext>,
    /// Guards serialize + cache write only; listing runs unlocked.
    write_lock: Mutex<()>,
}

impl DnsCollector {
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            ctx,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn run(&self) -> PassSummary {
        let started = Instant::now();
        let accounts = &self.ctx.targets.accounts;
        log::info!("DNS pass started for {} account(s)", accounts.len());

        let results = join_all(accounts.iter().map(|spec| async move {
            let result = self.collect_account(spec).await;
            if let Err(e) = &result {
                log_core_error(&format!("[{}] DNS collection failed", spec.label()), e);
            }
            result
        }))
        .await;

        let mut summary = PassSummary::default();
        for result in results {
            if result.is_ok() {
                summary.succeeded += 1;
            } else {
                summary.failed += 1;
            }
        }
        log::info!(
            "DNS pass finished: {} succeeded, {} failed in {:?}",
            summary.succeeded,
            summary.failed,
            started.elapsed()
        );
        summary
    }

    async fn collect_account(&self, spec: &AccountSpec) -> CoreResult<()> {
        let account = spec.to_account()?;
        let provider = self.ctx.provider_factory.create(&account).await?;

        let domains = provider.list_domains().await?;
        // A failed domain write does not stop the record listing.
        let domains_written = self
            .store(MetricName::DomainList, &account, &domains)
            .await;

        let records = provider.list_records().await?;
        self.store(MetricName::RecordList, &account, &records)
            .await?;

        domains_written
    }

    async fn store<T: Serialize + Sync>(
        &self,
        metric: MetricName,
        account: &Account,
        items: &[T],
    ) -> CoreResult<()> {
        let key = cache_key(metric, account.provider.as_str(), &account.name);
        let _guard = self.write_lock.lock().await;
        let result = ServiceContext::write_list(self.ctx.record_cache.as_ref(), &key, items).await;
        match &result {
            Ok(()) => log::info!("[{key}] Cached {} item(s)", items.len()),
            Err(e) => log_core_error(&format!("[{key}] Cache write failed"), e),
        }
        result
    }
}
