//! The decode → enrich → index → ack loop (spec §4.6).
//!
//! The one deliberate correction over the original: a message is acked
//! **only** once it has been durably indexed. Decode failures, and
//! connection/authorization/mapping failures while indexing, all leave the
//! message unacked so JetStream redelivers it — the original acked
//! unconditionally in its outer `except`, silently dropping records on any
//! transient indexing failure.

use std::time::Duration;

use backoff::{future::retry, ExponentialBackoffBuilder};
use tokio_stream::StreamExt;
use tracing::{error, info, warn};

use crate::config::CollectorConfiguration;

use super::enrich::{enrich, RawEvent};
use super::error::{CollectorError, CollectorResult};
use super::geo::GeoLookup;
use super::index::IndexClient;
use super::bus;

/// Boot-time retry budget for the two "connect to a dependency that might
/// not be fully up yet" steps: the orchestrator's `start_all` only waits for
/// search/bus to report `running`, not for them to finish their own internal
/// startup, so the collector's first connect attempts are allowed to retry
/// rather than failing the whole process on a cold-start race.
fn boot_backoff() -> backoff::ExponentialBackoff {
    ExponentialBackoffBuilder::new()
        .with_initial_interval(Duration::from_millis(500))
        .with_max_interval(Duration::from_secs(5))
        .with_max_elapsed_time(Some(Duration::from_secs(60)))
        .build()
}

pub async fn run(config: &CollectorConfiguration) -> CollectorResult<()> {
    let geo = GeoLookup::open(&config.geoip_database_path)?;

    let index = IndexClient::new(
        config.opensearch_url.clone(),
        config.index_name.clone(),
        config.opensearch_user.clone(),
        config.opensearch_password.clone(),
    );
    retry(boot_backoff(), || async {
        index.bootstrap().await.map_err(|e| match e {
            CollectorError::Authorization(_) | CollectorError::Mapping(_) => backoff::Error::permanent(e),
            transient => backoff::Error::transient(transient),
        })
    })
    .await?;

    let mut messages = retry(boot_backoff(), || async {
        bus::connect(&config.nats_url, &config.stream_name, &config.stream_subject)
            .await
            .map_err(backoff::Error::transient)
    })
    .await?;

    info!("subscribed and listening for log messages");

    while let Some(message) = messages.next().await {
        let message = match message {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "pull consumer error");
                continue;
            }
        };

        let raw: RawEvent = match serde_json::from_slice(&message.payload) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "failed to decode message, leaving unacked for redelivery");
                continue;
            }
        };

        let enriched = enrich(raw, &geo);

        match index.index_document(&enriched).await {
            Ok(()) => {
                if let Err(e) = message.ack().await {
                    error!(error = %e, "failed to ack after successful index");
                }
            }
            Err(e @ (CollectorError::SearchConnection(_) | CollectorError::Authorization(_) | CollectorError::Mapping(_))) => {
                error!(error = %e, "failed to index document, leaving unacked for redelivery");
            }
            Err(e) => {
                error!(error = %e, "unexpected enrichment pipeline error, leaving unacked");
            }
        }
    }

    Ok(())
}
