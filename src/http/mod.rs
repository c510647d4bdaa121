//! HTTP Control Surface (spec §4.7, §6): two independent axum services, one
//! fronting the Honeypot Manager and one fronting the Log Infrastructure
//! Orchestrator. Kept separate because the original exposes them as two
//! FastAPI apps on two ports; nothing in the domain couples them.

pub mod honeypot_routes;
pub mod infra_routes;
pub mod state;

pub use state::{HoneypotApiState, InfraApiState};
