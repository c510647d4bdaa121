//! Log Infrastructure Orchestrator (spec §4.5): the three managed
//! infrastructure containers (search node + dashboard sidecar, message
//! bus, log collector) plus batched create/start/stop/delete/status.

pub mod bus;
pub mod collector_proc;
pub mod error;
pub mod orchestrator;
pub mod search;

pub use error::{InfraError, InfraResult};
pub use orchestrator::LogInfraOrchestrator;

use async_trait::async_trait;

/// The uniform surface `LogInfraOrchestrator` drives each infra component
/// through. Generalizes the three concrete Python managers
/// (`OpenSearchManager`, `NatsServerManager`, `LogCollectorManager`) that
/// `ServiceOrchestrator` held behind identical method names.
#[async_trait]
pub trait InfraComponent: Send + Sync {
    /// Name reported in status maps, e.g. `"hive-opensearch"`.
    fn name(&self) -> &str;

    async fn exists(&self) -> bool;
    async fn create(&self) -> InfraResult<()>;
    async fn start(&self) -> InfraResult<()>;
    async fn stop(&self) -> InfraResult<()>;
    async fn delete(&self) -> InfraResult<()>;
    async fn status(&self) -> String;

    async fn is_running(&self) -> bool {
        self.status().await == "running"
    }
}
