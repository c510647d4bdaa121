//! JetStream stream/consumer bootstrap (spec §4.6 step 3).
//!
//! Grounded on `Logger_Subscriber.py::main()`: idempotently create a
//! work-queue, file-backed stream bounded to a short max age, then attach a
//! durable, explicit-ack pull consumer with `max_ack_pending = 500`.

use std::time::Duration;

use async_nats::jetstream::{
    self,
    consumer::{pull, AckPolicy, DeliverPolicy, ReplayPolicy},
    stream::{self, RetentionPolicy, StorageType},
};

use super::error::{CollectorError, CollectorResult};

const DURABLE_CONSUMER_NAME: &str = "log-collector";
const MAX_STREAM_AGE: Duration = Duration::from_secs(24 * 60 * 60);
const MAX_ACK_PENDING: i64 = 500;

pub async fn connect(
    nats_url: &str,
    stream_name: &str,
    stream_subject: &str,
) -> CollectorResult<pull::Stream> {
    let client = async_nats::connect(nats_url)
        .await
        .map_err(|e| CollectorError::BusConnection(e.to_string()))?;
    let js = jetstream::new(client);

    let stream = js
        .get_or_create_stream(stream::Config {
            name: stream_name.to_string(),
            subjects: vec![stream_subject.to_string()],
            retention: RetentionPolicy::WorkQueue,
            storage: StorageType::File,
            max_age: MAX_STREAM_AGE,
            ..Default::default()
        })
        .await
        .map_err(|e| CollectorError::BusConnection(e.to_string()))?;

    let consumer = stream
        .get_or_create_consumer(
            DURABLE_CONSUMER_NAME,
            pull::Config {
                durable_name: Some(DURABLE_CONSUMER_NAME.to_string()),
                ack_policy: AckPolicy::Explicit,
                max_ack_pending: MAX_ACK_PENDING,
                replay_policy: ReplayPolicy::Instant,
                deliver_policy: DeliverPolicy::All,
                ..Default::default()
            },
        )
        .await
        .map_err(|e| CollectorError::BusConnection(e.to_string()))?;

    consumer
        .messages()
        .await
        .map_err(|e| CollectorError::BusConnection(e.to_string()))
}
