//! Main daemon command — starts both HTTP control surfaces.

use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use hive_daemon::config::Configuration;
use hive_daemon::honeypot::{HoneypotCatalog, HoneypotManager};
use hive_daemon::http::{honeypot_routes, infra_routes};
use hive_daemon::infra::bus::MessageBus;
use hive_daemon::infra::collector_proc::LogCollector;
use hive_daemon::infra::search::SearchNode;
use hive_daemon::infra::LogInfraOrchestrator;
use hive_daemon::runtime::PodmanRunner;

/// Run the main daemon: bring up the Honeypot Manager and the Log
/// Infrastructure Orchestrator behind their own HTTP surfaces, concurrently.
pub async fn run(config_path: &str) -> Result<()> {
    info!(path = config_path, "loading configuration");
    let config = Configuration::load(config_path)?;

    let runner = PodmanRunner::new(&config.runtime.binary, config.runtime.command_timeout_secs);

    let catalog = Arc::new(HoneypotCatalog::load(&config.honeypot.catalog_path));
    let honeypot_manager = Arc::new(HoneypotManager::new(
        runner.clone(),
        catalog,
        config.runtime.network_name.clone(),
        config.honeypot.owner_label.clone(),
        config.honeypot.volume_root.clone(),
        config.honeypot.build_context_root.clone(),
    ));

    let search = SearchNode::new(
        runner.clone(),
        config.runtime.network_name.clone(),
        config.infra.search_image.clone(),
        config.infra.dashboard_image.clone(),
    );
    let bus = MessageBus::new(runner.clone(), config.runtime.network_name.clone(), config.infra.bus_image.clone());
    let collector = LogCollector::new(
        runner.clone(),
        config.runtime.network_name.clone(),
        config.infra.collector_image.clone(),
        config.infra.collector_build_context.clone(),
        config.collector.opensearch_url.clone(),
        config.collector.opensearch_user.clone().unwrap_or_default(),
        config.collector.opensearch_password.clone().unwrap_or_default(),
        config.collector.nats_url.clone(),
    );
    let orchestrator = Arc::new(LogInfraOrchestrator::new(
        search,
        Box::new(bus),
        Box::new(collector),
        config.runtime.network_name.clone(),
    ));

    let honeypot_app = honeypot_routes::router(honeypot_manager);
    let infra_app = infra_routes::router(orchestrator);

    let honeypot_addr = config.honeypot_api.socket_addr()?;
    let infra_addr = config.infra_api.socket_addr()?;

    info!(%honeypot_addr, "honeypot API listening");
    info!(%infra_addr, "log-infra API listening");

    let honeypot_listener = TcpListener::bind(honeypot_addr).await?;
    let infra_listener = TcpListener::bind(infra_addr).await?;

    // One cancellation token shared by both servers: a single Ctrl-C trips
    // it once, and each server's graceful-shutdown future (and, transitively,
    // any in-flight handler awaiting a subprocess) observes the same signal
    // rather than racing two independent signal-handler registrations.
    let shutdown = CancellationToken::new();

    let honeypot_server =
        axum::serve(honeypot_listener, honeypot_app).with_graceful_shutdown(shutdown.clone().cancelled_owned());
    let infra_server =
        axum::serve(infra_listener, infra_app).with_graceful_shutdown(shutdown.clone().cancelled_owned());

    tokio::try_join!(
        async { honeypot_server.await.map_err(anyhow::Error::from) },
        async { infra_server.await.map_err(anyhow::Error::from) },
        async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::warn!("received shutdown signal, stopping servers...");
            shutdown.cancel();
            Ok::<(), anyhow::Error>(())
        },
    )?;

    info!("daemon stopped");
    Ok(())
}
