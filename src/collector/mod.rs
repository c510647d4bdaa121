//! Log Collector enrichment pipeline (spec §4.6): consumes honeypot events
//! off the message bus, enriches them with geolocation and attack duration,
//! and indexes them into the search engine with corrected ack semantics —
//! only acknowledging a message once it is durably indexed.

pub mod bus;
pub mod enrich;
pub mod error;
pub mod geo;
pub mod index;
pub mod pipeline;

pub use error::{CollectorError, CollectorResult};
pub use pipeline::run;
