//! Batched operations across the three infrastructure components (spec §4.5).
//!
//! Grounded on `orchestrator.py::ServiceOrchestrator`, with two corrections
//! the spec calls for over the original: the "already exists" pre-check on
//! `create_all` — left commented out in `log_manager.py` — is made real
//! here, and `delete_all` refuses outright if anything is still running
//! instead of deleting unconditionally.

use std::collections::BTreeMap;

use tracing::info;

use super::{InfraComponent, InfraError, InfraResult};
use crate::infra::search::SearchNode;

/// Bootstrap interval given to the search node and bus before the collector
/// attempts its first connect.
const BOOTSTRAP_WAIT: std::time::Duration = std::time::Duration::from_secs(5);

pub struct LogInfraOrchestrator {
    pub search: SearchNode,
    pub bus: Box<dyn InfraComponent>,
    pub collector: Box<dyn InfraComponent>,
    network_name: String,
}

impl LogInfraOrchestrator {
    pub fn new(
        search: SearchNode,
        bus: Box<dyn InfraComponent>,
        collector: Box<dyn InfraComponent>,
        network_name: String,
    ) -> Self {
        Self {
            search,
            bus,
            collector,
            network_name,
        }
    }

    fn components(&self) -> Vec<&dyn InfraComponent> {
        vec![&self.search, self.bus.as_ref(), self.collector.as_ref()]
    }

    async fn exists_map(&self) -> BTreeMap<String, bool> {
        let mut map = BTreeMap::new();
        for c in self.components() {
            map.insert(c.name().to_string(), c.exists().await);
        }
        map
    }

    async fn running_map(&self) -> BTreeMap<String, bool> {
        let mut map = BTreeMap::new();
        for c in self.components() {
            map.insert(c.name().to_string(), c.is_running().await);
        }
        map
    }

    pub async fn any_exists(&self) -> bool {
        self.exists_map().await.values().any(|v| *v)
    }

    pub async fn any_running(&self) -> bool {
        self.running_map().await.values().any(|v| *v)
    }

    pub async fn missing(&self) -> Vec<String> {
        self.exists_map()
            .await
            .into_iter()
            .filter(|(_, ok)| !ok)
            .map(|(name, _)| name)
            .collect()
    }

    pub async fn not_running(&self) -> Vec<String> {
        self.running_map()
            .await
            .into_iter()
            .filter(|(_, running)| !running)
            .map(|(name, _)| name)
            .collect()
    }

    /// Create the search node, then the bus, then the collector.
    ///
    /// `admin_password` is the one-time OpenSearch admission credential
    /// supplied with the `POST /create` request (spec §6.2) — it is never
    /// read from a boot-time config value.
    ///
    /// The network is created implicitly by each component's own
    /// `pre_create`/prerequisite step, so no separate network-first pass is
    /// needed here beyond naming it in the dependency order below.
    pub async fn create_all(&self, admin_password: &str) -> InfraResult<()> {
        let existing: Vec<String> = self
            .exists_map()
            .await
            .into_iter()
            .filter(|(_, ok)| *ok)
            .map(|(name, _)| name)
            .collect();
        if !existing.is_empty() {
            return Err(InfraError::AlreadyExists(existing.join(", ")));
        }

        info!(network = self.network_name, "creating log infrastructure");
        self.search.create_with_password(admin_password).await?;
        self.bus.create().await?;
        self.collector.create().await?;
        Ok(())
    }

    pub async fn start_all(&self) -> InfraResult<()> {
        if !self.search.is_running().await {
            self.search.start().await?;
        }
        if !self.bus.is_running().await {
            self.bus.start().await?;
        }

        // Give search and bus a bootstrap window to come up before the
        // collector's first connect attempt; bail out with a 504-mapped
        // error rather than starting the collector against a half-up stack.
        let deadline = tokio::time::Instant::now() + BOOTSTRAP_WAIT;
        loop {
            if self.search.is_running().await && self.bus.is_running().await {
                break;
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(InfraError::BootstrapTimeout(
                    "search node / message bus".to_string(),
                ));
            }
            tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        }

        if !self.collector.is_running().await {
            self.collector.start().await?;
        }
        Ok(())
    }

    pub async fn stop_all(&self) -> InfraResult<()> {
        if self.collector.is_running().await {
            self.collector.stop().await?;
        }
        if self.bus.is_running().await {
            self.bus.stop().await?;
        }
        if self.search.is_running().await {
            self.search.stop().await?;
        }
        Ok(())
    }

    pub async fn delete_all(&self) -> InfraResult<()> {
        let running: Vec<String> = self
            .running_map()
            .await
            .into_iter()
            .filter(|(_, running)| *running)
            .map(|(name, _)| name)
            .collect();
        if !running.is_empty() {
            return Err(InfraError::StillRunning(running.join(", ")));
        }

        self.collector.delete().await?;
        self.bus.delete().await?;
        self.search.delete().await?;
        Ok(())
    }

    pub async fn restart_all(&self) -> InfraResult<()> {
        self.stop_all().await?;
        tokio::time::sleep(std::time::Duration::from_secs(2)).await;
        self.start_all().await
    }

    pub async fn status_report(&self) -> BTreeMap<String, String> {
        let mut report = BTreeMap::new();
        for c in self.components() {
            report.insert(c.name().to_string(), c.status().await);
        }
        report.insert(
            self.search.dashboard_name().to_string(),
            self.search.dashboard_status().await,
        );
        report
    }
}
