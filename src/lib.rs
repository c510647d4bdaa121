//! Project H.I.V.E daemon library.
//!
//! Drives a fleet of honeypot containers and the log infrastructure that
//! collects, enriches, and indexes what they observe, all on top of a
//! rootless Podman runtime.

pub mod collector;
pub mod config;
pub mod container;
pub mod error;
pub mod honeypot;
pub mod http;
pub mod infra;
pub mod runtime;

pub use config::Configuration;
pub use error::{DaemonError, Result};
