//! Cron-driven pass scheduling.

use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use cron::Schedule;

use crate::error::{CoreError, CoreResult};
use crate::services::{log_core_error, CertCollector, DnsCollector, ServiceContext};

/// Parse a six-field (seconds first) cron expression.
pub fn parse_schedule(expr: &str) -> CoreResult<Schedule> {
    Schedule::from_str(expr)
        .map_err(|e| CoreError::ConfigError(format!("invalid cron expression '{expr}': {e}")))
}

/// First fire time of `schedule` strictly after `after`.
pub fn next_fire(schedule: &Schedule, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
    schedule.after(&after).next()
}

/// Runs the startup sequence, then both schedules until shutdown.
pub struct Scheduler {
    dns: DnsCollector,
    certs: CertCollector,
    dns_schedule: Schedule,
    cert_schedule: Schedule,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("dns_schedule", &self.dns_schedule)
            .field("cert_schedule", &self.cert_schedule)
            .finish_non_exhaustive()
    }
}

impl Scheduler {
    pub fn new(ctx: &Arc<ServiceContext>) -> CoreResult<Self> {
        Ok(Self {
            dns_schedule: parse_schedule(&ctx.settings.dns_schedule)?,
            cert_schedule: parse_schedule(&ctx.settings.cert_schedule)?,
            dns: DnsCollector::new(Arc::clone(ctx)),
            certs: CertCollector::new(Arc::clone(ctx)),
        })
    }

    pub fn dns(&self) -> &DnsCollector {
        &self.dns
    }

    pub fn certs(&self) -> &CertCollector {
        &self.certs
    }

    /// DNS pass, then certificate pass, then custom hostnames; strictly in order.
    pub async fn run_startup(&self) {
        log::info!("Initial collection started");
        self.dns.run().await;
        log::info!("DNS data collected, starting certificate collection");
        self.run_cert_passes().await;
        log::info!("Initial collection finished");
    }

    async fn run_cert_passes(&self) {
        self.certs.run().await;
        if let Err(e) = self.certs.run_custom().await {
            log_core_error("Custom record certificate collection failed", &e);
        }
    }

    /// Startup sequence followed by both schedules, until `shutdown` resolves.
    ///
    /// A pass that overruns its interval delays the next fire of the same schedule;
    /// the two schedules run independently of each other.
    pub async fn run(&self, shutdown: impl Future<Output = ()>) {
        self.run_startup().await;

        let dns_loop = Self::run_on(&self.dns_schedule, "dns", || async {
            self.dns.run().await;
        });
        let cert_loop = Self::run_on(&self.cert_schedule, "cert", || self.run_cert_passes());

        tokio::select! {
            () = dns_loop => {}
            () = cert_loop => {}
            () = shutdown => log::info!("Shutdown requested, stopping schedules"),
        }
    }

    async fn run_on<F, Fut>(schedule: &Schedule, name: &str, mut pass: F)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ()>,
    {
        loop {
            let now = Utc::now();
            let Some(next) = next_fire(schedule, now) else {
                log::warn!("[{name}] Schedule has no upcoming fire time, stopping");
                return;
            };
            let wait = (next - now).to_std().unwrap_or_default();
            log::debug!("[{name}] Next pass at {next}");
            tokio::time::sleep(wait).await;
            pass().await;
        }
    }
}
