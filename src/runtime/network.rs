//! Ensures the shared Hive network exists and wires containers into it.

use tracing::info;

use super::{PodmanRunner, RuntimeResult};

#[derive(Debug, Clone)]
pub struct NetworkManager {
    runner: PodmanRunner,
}

impl NetworkManager {
    pub fn new(runner: PodmanRunner) -> Self {
        Self { runner }
    }

    pub async fn ensure_exists(&self, name: &str) -> RuntimeResult<()> {
        if self.runner.succeeds(&["network", "exists", name]).await {
            return Ok(());
        }
        self.runner.run(&["network", "create", name]).await?;
        info!(network = name, "created network");
        Ok(())
    }

    pub async fn connect(&self, container: &str, name: &str, alias: Option<&str>) -> RuntimeResult<()> {
        let mut args = vec!["network", "connect"];
        if let Some(alias) = alias {
            args.push("--alias");
            args.push(alias);
        }
        args.push(name);
        args.push(container);
        self.runner.run(&args).await?;
        info!(container, network = name, "connected container to network");
        Ok(())
    }
}
