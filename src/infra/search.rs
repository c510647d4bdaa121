//! Search node (OpenSearch) plus its dashboard sidecar.
//!
//! Grounded on `OpenSearch_Manager.py`: unlike the message bus and log
//! collector, this isn't a single container — it's a pod hosting two
//! containers that share a loopback, a named data volume, and a disk-space
//! precondition checked before either container is created or started. That
//! shape doesn't fit the single-container `ContainerManager` trait, so this
//! implements `InfraComponent` directly against the pod.

use async_trait::async_trait;
use tracing::info;

use crate::runtime::{NetworkManager, PodmanRunner, RuntimeResult};

use super::{InfraComponent, InfraError, InfraResult};

const POD_NAME: &str = "hive-opensearch-pod";
const VOLUME_NAME: &str = "hive-opensearch-data";
const SEARCH_CONTAINER: &str = "hive-opensearch-node";
const DASHBOARD_CONTAINER: &str = "hive-opensearch-dash";

/// Minimum free disk space required to stand up the search node, in GiB.
const MIN_DISK_SPACE_GIB: u64 = 8;

/// Paths checked for free space; the first one that exists wins, mirroring
/// the original's "default to the podman volumes dir, fall back to cwd".
const DISK_CHECK_PATHS: &[&str] = &["/var/lib/containers/storage/volumes", "."];

pub struct SearchNode {
    runner: PodmanRunner,
    network: NetworkManager,
    network_name: String,
    search_image: String,
    dashboard_image: String,
    /// Supplied at create-time via `POST /create`'s one-time password
    /// (spec §6.2), never a boot-time config value. `None` until the first
    /// `create_with_password` call.
    admin_password: parking_lot::Mutex<Option<String>>,
}

impl SearchNode {
    pub fn new(runner: PodmanRunner, network_name: String, search_image: String, dashboard_image: String) -> Self {
        Self {
            network: NetworkManager::new(runner.clone()),
            runner,
            network_name,
            search_image,
            dashboard_image,
            admin_password: parking_lot::Mutex::new(None),
        }
    }

    /// Create the pod and both containers, supplying `admin_password` as the
    /// OpenSearch admission credential. This is the only path that should be
    /// used to create the search node; the bare `InfraComponent::create`
    /// requires a password to already have been recorded by a prior call.
    pub async fn create_with_password(&self, admin_password: &str) -> InfraResult<()> {
        *self.admin_password.lock() = Some(admin_password.to_string());
        InfraComponent::create(self).await
    }

    /// Satisfied if *any* of `DISK_CHECK_PATHS` that exist on this host has
    /// at least `MIN_DISK_SPACE_GIB` free (spec §4.5: "requires >= 8 GiB
    /// free disk on any of a known list of storage paths").
    fn check_disk_space(&self) -> InfraResult<()> {
        let mut checked = Vec::new();
        for path in DISK_CHECK_PATHS {
            if !std::path::Path::new(path).exists() {
                continue;
            }
            match free_space_gib(path) {
                Ok(free_gib) => {
                    if free_gib >= MIN_DISK_SPACE_GIB as f64 {
                        return Ok(());
                    }
                    checked.push(format!("{path} ({free_gib:.2} GiB)"));
                }
                Err(e) => checked.push(format!("{path} (unreadable: {e})")),
            }
        }

        Err(InfraError::HostResourceFailure(format!(
            "OpenSearch requires at least {MIN_DISK_SPACE_GIB} GiB free on one of the known storage \
             paths, none qualified: {}",
            checked.join(", ")
        )))
    }

    async fn ensure_volume(&self) -> RuntimeResult<()> {
        if self.runner.succeeds(&["volume", "exists", VOLUME_NAME]).await {
            return Ok(());
        }
        self.runner.run(&["volume", "create", VOLUME_NAME]).await?;
        Ok(())
    }

    async fn ensure_pod(&self) -> RuntimeResult<()> {
        if self.runner.succeeds(&["pod", "exists", POD_NAME]).await {
            return Ok(());
        }
        self.network.ensure_exists(&self.network_name).await?;
        self.runner
            .run(&[
                "pod",
                "create",
                "--name",
                POD_NAME,
                "--network",
                &self.network_name,
                "-p",
                "5601:5601",
            ])
            .await?;
        info!(pod = POD_NAME, "created opensearch pod");
        Ok(())
    }

    async fn container_exists(&self, name: &str) -> bool {
        self.runner.succeeds(&["container", "exists", name]).await
    }

    async fn container_status(&self, name: &str) -> String {
        match self.runner.run(&["inspect", "-f", "{{.State.Status}}", name]).await {
            Ok(status) => status,
            Err(_) => "not found".into(),
        }
    }
}

#[async_trait]
impl InfraComponent for SearchNode {
    fn name(&self) -> &str {
        SEARCH_CONTAINER
    }

    async fn exists(&self) -> bool {
        self.container_exists(SEARCH_CONTAINER).await && self.container_exists(DASHBOARD_CONTAINER).await
    }

    async fn create(&self) -> InfraResult<()> {
        self.check_disk_space()?;

        let admin_password = self.admin_password.lock().clone().ok_or_else(|| {
            InfraError::RuntimeFailure(
                "search node create called without an admin password; use create_with_password".into(),
            )
        })?;

        if !self.container_exists(SEARCH_CONTAINER).await {
            self.ensure_pod().await.map_err(runtime_failure)?;
            self.ensure_volume().await.map_err(runtime_failure)?;
            self.runner
                .run(&[
                    "create",
                    "--name",
                    SEARCH_CONTAINER,
                    "--pod",
                    POD_NAME,
                    "--volume",
                    &format!("{VOLUME_NAME}:/usr/share/opensearch/data"),
                    "--env",
                    "discovery.type=single-node",
                    "--env",
                    &format!("OPENSEARCH_INITIAL_ADMIN_PASSWORD={admin_password}"),
                    "--env",
                    "OPENSEARCH_JAVA_OPTS=-Xms1g -Xmx1g",
                    "--memory",
                    "2g",
                    "--cpus",
                    "2",
                    "--security-opt",
                    "no-new-privileges",
                    &self.search_image,
                ])
                .await
                .map_err(runtime_failure)?;
            info!(container = SEARCH_CONTAINER, "created search container");
        }

        if !self.container_exists(DASHBOARD_CONTAINER).await {
            self.ensure_pod().await.map_err(runtime_failure)?;
            self.runner
                .run(&[
                    "create",
                    "--name",
                    DASHBOARD_CONTAINER,
                    "--pod",
                    POD_NAME,
                    "--env",
                    "OPENSEARCH_HOSTS=https://localhost:9200",
                    "--memory",
                    "1g",
                    "--cpus",
                    "1",
                    "--security-opt",
                    "no-new-privileges",
                    &self.dashboard_image,
                ])
                .await
                .map_err(runtime_failure)?;
            info!(container = DASHBOARD_CONTAINER, "created dashboard container");
        }

        Ok(())
    }

    async fn start(&self) -> InfraResult<()> {
        self.check_disk_space()?;
        self.runner
            .run(&["start", SEARCH_CONTAINER])
            .await
            .map_err(runtime_failure)?;
        tokio::time::sleep(std::time::Duration::from_secs(15)).await;
        self.runner
            .run(&["start", DASHBOARD_CONTAINER])
            .await
            .map_err(runtime_failure)?;
        Ok(())
    }

    async fn stop(&self) -> InfraResult<()> {
        if self.container_status(DASHBOARD_CONTAINER).await == "running" {
            self.runner.run(&["stop", DASHBOARD_CONTAINER]).await.map_err(runtime_failure)?;
        }
        if self.container_status(SEARCH_CONTAINER).await == "running" {
            self.runner.run(&["stop", SEARCH_CONTAINER]).await.map_err(runtime_failure)?;
        }
        Ok(())
    }

    async fn delete(&self) -> InfraResult<()> {
        self.runner.run(&["rm", "-f", DASHBOARD_CONTAINER]).await.ok();
        self.runner.run(&["rm", "-f", SEARCH_CONTAINER]).await.ok();
        self.runner.run(&["pod", "rm", "-f", POD_NAME]).await.ok();
        Ok(())
    }

    async fn status(&self) -> String {
        self.container_status(SEARCH_CONTAINER).await
    }

    async fn is_running(&self) -> bool {
        self.container_status(SEARCH_CONTAINER).await == "running"
    }
}

impl SearchNode {
    /// The dashboard sidecar's state, reported alongside the three primary
    /// components by `status_report()`.
    pub async fn dashboard_status(&self) -> String {
        self.container_status(DASHBOARD_CONTAINER).await
    }

    pub fn dashboard_name(&self) -> &str {
        DASHBOARD_CONTAINER
    }
}

fn runtime_failure(e: crate::runtime::RuntimeError) -> InfraError {
    InfraError::RuntimeFailure(e.to_string())
}

/// Free space on the filesystem `path` resides on, found via the mounted
/// disk with the longest matching mount-point prefix — the same approach
/// `df` uses — via `sysinfo::Disks`, the same crate `cmd::diagnostics`
/// already queries for host-resource reporting.
fn free_space_gib(path: &str) -> std::io::Result<f64> {
    let canonical = std::fs::canonicalize(path)?;
    let disks = sysinfo::Disks::new_with_refreshed_list();

    let mut best: Option<(&std::path::Path, u64)> = None;
    for disk in disks.list() {
        let mount = disk.mount_point();
        if !canonical.starts_with(mount) {
            continue;
        }
        if best.map_or(true, |(m, _)| mount.as_os_str().len() > m.as_os_str().len()) {
            best = Some((mount, disk.available_space()));
        }
    }

    let free_bytes = best
        .map(|(_, avail)| avail)
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "no mounted filesystem matches path"))?;
    Ok(free_bytes as f64 / (1024.0 * 1024.0 * 1024.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_space_reports_a_positive_number_for_the_current_directory() {
        let gib = free_space_gib(".").expect("disk lookup should succeed for the cwd");
        assert!(gib > 0.0);
    }
}
