//! Log collector command — the process a `Dockerfile.subscriber` image built
//! from this same repository runs as its entrypoint.
//!
//! Reads its configuration from the environment (spec §6.5), not the
//! daemon's TOML file: the collector's own container image only ever
//! carries the four env vars `infra::collector_proc::LogCollector` sets at
//! create-time.

use anyhow::Result;
use tracing::info;

use hive_daemon::config::CollectorConfiguration;

pub async fn run(_config_path: &str) -> Result<()> {
    let config = CollectorConfiguration::from_env()?;
    info!(nats_url = %config.nats_url, "starting log collector");
    hive_daemon::collector::run(&config).await?;
    Ok(())
}
