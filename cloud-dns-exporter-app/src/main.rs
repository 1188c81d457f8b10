//! cloud-dns-exporter daemon.
//!
//! Loads the YAML configuration, runs the initial collection and then keeps both
//! schedules running until Ctrl-C.
//!
//! ```text
//! cloud-dns-exporter [config.yaml]
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use cloud_dns_exporter_app::{resolve_config_path, AppState, CONFIG_ENV};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let path = PathBuf::from(resolve_config_path(
        std::env::args().nth(1),
        std::env::var(CONFIG_ENV).ok(),
    ));
    tracing::info!("Starting cloud-dns-exporter with {}", path.display());

    let state = AppState::from_config_file(&path)
        .with_context(|| format!("failed to initialize from {}", path.display()))?;

    state
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl-C: {e}");
                std::future::pending::<()>().await;
            }
        })
        .await;

    tracing::info!("cloud-dns-exporter stopped");
    Ok(())
}
