//! Collector error taxonomy. Distinguishes failures the pipeline should
//! retry (never ack) from the ones it can't do anything about.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("failed to decode message body as JSON: {0}")]
    Decode(String),

    #[error("failed to connect to the message bus: {0}")]
    BusConnection(String),

    #[error("failed to connect to the search engine: {0}")]
    SearchConnection(String),

    #[error("search engine rejected credentials: {0}")]
    Authorization(String),

    #[error("search engine rejected the document mapping: {0}")]
    Mapping(String),

    #[error("failed to open geolocation database at {path}: {source}")]
    GeoDatabase {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type CollectorResult<T> = Result<T, CollectorError>;
