//! `HoneypotManager` — create/start/stop/restart/delete/list/inspect,
//! port policy, and the active-connection guard on top of the shared
//! container lifecycle template.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashSet;
use serde::{Deserialize, Serialize};

use crate::container::ContainerManager;
use crate::runtime::{ImageManager, NetworkManager, PodmanRunner};

use super::catalog::HoneypotCatalog;
use super::error::{HoneypotError, HoneypotResult};
use super::model::{canonical_memory, port_mapping, render_status, AuthDetails, Credential, Honeypot, ResourcePolicy};
use super::port;

/// Request body for `POST /` (spec §6.1).
#[derive(Debug, Deserialize)]
pub struct CreateHoneypotRequest {
    pub honeypot_type: String,
    pub honeypot_port: u16,
    #[serde(default)]
    pub honeypot_cpu_limit: Option<i64>,
    #[serde(default)]
    pub honeypot_cpu_quota: Option<i64>,
    #[serde(default)]
    pub honeypot_memory_limit: Option<String>,
    #[serde(default)]
    pub honeypot_memory_swap_limit: Option<String>,
    #[serde(default)]
    pub authentication: Option<Vec<Credential>>,
    #[serde(default)]
    pub banner: Option<String>,
}

/// Response body for `GET /types/{t}/config` (spec §6.1): the type's
/// declared port/volume shape plus the default resource policy it will be
/// created with if the caller doesn't override any limits.
#[derive(Debug, Serialize)]
pub struct TypeConfigResponse {
    pub ports: Vec<String>,
    pub passive_ports: Option<[u16; 2]>,
    pub volumes: Vec<String>,
    pub resources: ResourcePolicy,
}

/// One concrete honeypot container, adapting the generic lifecycle template
/// in `container::ContainerManager` to this instance's derived args.
struct HoneypotInstance {
    name: String,
    image: String,
    args: Vec<String>,
    runner: PodmanRunner,
    network: NetworkManager,
    network_name: String,
    volume_dirs: Vec<PathBuf>,
}

#[async_trait]
impl ContainerManager for HoneypotInstance {
    fn container_name(&self) -> &str {
        &self.name
    }

    fn image(&self) -> &str {
        &self.image
    }

    fn create_args(&self) -> Vec<String> {
        self.args.clone()
    }

    async fn pre_create(&self) -> crate::runtime::RuntimeResult<()> {
        self.network.ensure_exists(&self.network_name).await?;
        for dir in &self.volume_dirs {
            std::fs::create_dir_all(dir).map_err(crate::runtime::RuntimeError::Io)?;
        }
        Ok(())
    }

    async fn exists(&self) -> bool {
        self.runner.succeeds(&["container", "exists", &self.name]).await
    }

    fn runner(&self) -> &PodmanRunner {
        &self.runner
    }
}

pub struct HoneypotManager {
    runner: PodmanRunner,
    network: NetworkManager,
    images: ImageManager,
    catalog: Arc<HoneypotCatalog>,
    network_name: String,
    owner_label: String,
    volume_root: PathBuf,
    build_context_root: PathBuf,
    /// Names currently mid-`create`, collapsing racing requests for the same
    /// `(type, port)` to exactly one winner (spec §5 ordering guarantee).
    in_flight: DashSet<String>,
}

impl HoneypotManager {
    pub fn new(
        runner: PodmanRunner,
        catalog: Arc<HoneypotCatalog>,
        network_name: String,
        owner_label: String,
        volume_root: PathBuf,
        build_context_root: PathBuf,
    ) -> Self {
        Self {
            images: ImageManager::new(runner.clone()),
            network: NetworkManager::new(runner.clone()),
            runner,
            catalog,
            network_name,
            owner_label,
            volume_root,
            build_context_root,
            in_flight: DashSet::new(),
        }
    }

    pub fn available_types(&self) -> Vec<String> {
        self.catalog.available_types()
    }

    /// Whether the underlying container runtime binary is reachable at all —
    /// used only by `GET /healthz`, not part of the documented contract.
    pub async fn runtime_healthy(&self) -> bool {
        self.runner.succeeds(&["version"]).await
    }

    pub fn type_config(&self, honeypot_type: &str) -> HoneypotResult<TypeConfigResponse> {
        let config = self
            .catalog
            .get(honeypot_type)
            .ok_or_else(|| HoneypotError::UnknownType(honeypot_type.to_string()))?;
        Ok(TypeConfigResponse {
            ports: config.ports.keys().cloned().collect(),
            passive_ports: config.passive_ports,
            volumes: config.volumes,
            resources: ResourcePolicy::default(),
        })
    }

    pub fn auth_details(&self, honeypot_type: &str) -> HoneypotResult<AuthDetails> {
        if !self.catalog.type_exists(honeypot_type) {
            return Err(HoneypotError::UnknownType(honeypot_type.to_string()));
        }
        let config_path = self
            .build_context_root
            .join(honeypot_type)
            .join("config.yaml");
        let details = std::fs::read_to_string(&config_path)
            .ok()
            .and_then(|s| serde_yaml::from_str::<AuthDetails>(&s).ok())
            .unwrap_or_default();
        if details.is_empty() {
            return Err(HoneypotError::NotFound(format!(
                "no auth-details for type '{honeypot_type}'"
            )));
        }
        Ok(details)
    }

    pub async fn check_port(&self, port: u16) -> (bool, String) {
        if port < 1024 && !port::can_bind_privileged() {
            return (
                false,
                format!("port {port} is privileged and requires elevated permissions"),
            );
        }
        if self.find_by_port(port).await.is_some() {
            return (false, format!("port {port} is already claimed by a managed honeypot"));
        }
        if !port::is_bindable(port) {
            return (false, format!("port {port} is already in use"));
        }
        (true, format!("port {port} is available"))
    }

    fn instance(&self, honeypot_type: &str, host_port: u16, extra_args: Vec<String>) -> HoneypotResult<HoneypotInstance> {
        let config = self
            .catalog
            .get(honeypot_type)
            .ok_or_else(|| HoneypotError::UnknownType(honeypot_type.to_string()))?;

        let name = Honeypot::derive_name(honeypot_type, host_port);
        let image = Honeypot::derive_image(honeypot_type);
        let labels = Honeypot::labels(honeypot_type, host_port, &self.owner_label);

        let mut args: Vec<String> = vec![
            "--hostname".into(),
            name.clone(),
            "--network".into(),
            self.network_name.clone(),
            "--network-alias".into(),
            name.clone(),
            "--security-opt".into(),
            "no-new-privileges".into(),
            "--restart".into(),
            "always".into(),
            "-e".into(),
            "NATS_URL=nats://hive-nats:4222".into(),
        ];

        for (k, v) in &labels {
            args.push("--label".into());
            args.push(format!("{k}={v}"));
        }

        for (container_port, host) in port_mapping(&config, host_port) {
            let container_spec = container_port.split('/').next().unwrap_or(&container_port);
            args.push("-p".into());
            args.push(format!("{host}:{container_spec}"));
        }

        let mut volume_dirs = Vec::new();
        let honeypot_dir = self.build_context_root.join(honeypot_type);
        let config_path = honeypot_dir.join("config.yaml");
        args.push("-v".into());
        args.push(format!("{}:/app/config.yaml:ro", config_path.display()));

        for volume_name in &config.volumes {
            let dir = self.volume_root.join(honeypot_type).join(volume_name);
            args.push("-v".into());
            args.push(format!("{}:/app/{}:rw", dir.display(), volume_name));
            volume_dirs.push(dir);
        }

        args.extend(extra_args);

        Ok(HoneypotInstance {
            name,
            image,
            args,
            runner: self.runner.clone(),
            network: self.network.clone(),
            network_name: self.network_name.clone(),
            volume_dirs,
        })
    }

    /// Create a honeypot. Non-recursive: the image is ensured first, then
    /// exactly one `podman create` call is issued (spec §9 Open Question 1).
    pub async fn create(&self, req: CreateHoneypotRequest) -> HoneypotResult<Honeypot> {
        if !self.catalog.type_exists(&req.honeypot_type) {
            return Err(HoneypotError::UnknownType(req.honeypot_type.clone()));
        }
        self.validate_port(req.honeypot_port)?;

        let name = Honeypot::derive_name(&req.honeypot_type, req.honeypot_port);

        if !self.in_flight.insert(name.clone()) {
            return Err(HoneypotError::AlreadyExists { port: req.honeypot_port });
        }
        let _guard = scopeguard(&self.in_flight, &name);

        if self.runner.succeeds(&["container", "exists", &name]).await {
            return Err(HoneypotError::AlreadyExists { port: req.honeypot_port });
        }

        if self.find_by_port(req.honeypot_port).await.is_some() {
            return Err(HoneypotError::PortInUse { port: req.honeypot_port });
        }

        if let Some(auth) = &req.authentication {
            self.write_auth_overlay(&req.honeypot_type, Some(auth), req.banner.as_deref())
                .await?;
        } else if req.banner.is_some() {
            self.write_auth_overlay(&req.honeypot_type, None, req.banner.as_deref())
                .await?;
        }

        let image = Honeypot::derive_image(&req.honeypot_type);
        let build_dir = self.build_context_root.join(&req.honeypot_type);
        self.images
            .ensure_built(&image, &build_dir, "Dockerfile")
            .await
            .map_err(|e| HoneypotError::ImageFailure(e.to_string()))?;

        let default_policy = ResourcePolicy::default();
        let policy = ResourcePolicy {
            cpu_period: req.honeypot_cpu_limit.unwrap_or(default_policy.cpu_period),
            cpu_quota: req.honeypot_cpu_quota.unwrap_or(default_policy.cpu_quota),
            memory_limit: canonical_memory(
                &req.honeypot_memory_limit.clone().unwrap_or(default_policy.memory_limit),
            ),
            memory_swap_limit: canonical_memory(
                &req.honeypot_memory_swap_limit
                    .clone()
                    .unwrap_or(default_policy.memory_swap_limit),
            ),
        };

        let extra_args = vec![
            "--cpu-period".to_string(),
            policy.cpu_period.to_string(),
            "--cpu-quota".to_string(),
            policy.cpu_quota.to_string(),
            "--memory".to_string(),
            policy.memory_limit.clone(),
            "--memory-swap".to_string(),
            policy.memory_swap_limit.clone(),
        ];

        let instance = self.instance(&req.honeypot_type, req.honeypot_port, extra_args)?;
        instance
            .create()
            .await
            .map_err(|e| HoneypotError::ContainerFailure(e.to_string()))?;

        self.inspect(&name)
            .await?
            .ok_or_else(|| HoneypotError::ContainerFailure("created container vanished before inspect".into()))
    }

    async fn write_auth_overlay(
        &self,
        honeypot_type: &str,
        authentication: Option<&[Credential]>,
        banner: Option<&str>,
    ) -> HoneypotResult<()> {
        let path = self.build_context_root.join(honeypot_type).join("config.yaml");
        let mut details: AuthDetails = std::fs::read_to_string(&path)
            .ok()
            .and_then(|s| serde_yaml::from_str(&s).ok())
            .unwrap_or_default();
        if let Some(auth) = authentication {
            details.authentication = Some(auth.to_vec());
        }
        if let Some(banner) = banner {
            details.banner = Some(banner.to_string());
        }
        let serialized = serde_yaml::to_string(&details)
            .map_err(|e| HoneypotError::ContainerFailure(format!("failed to serialize auth overlay: {e}")))?;
        std::fs::write(&path, serialized)
            .map_err(|e| HoneypotError::ContainerFailure(format!("failed to write auth overlay: {e}")))?;
        Ok(())
    }

    fn validate_port(&self, port: u16) -> HoneypotResult<()> {
        if port == 0 {
            return Err(HoneypotError::BadRequest("port must be in [1, 65535]".into()));
        }
        if port < 1024 && !port::can_bind_privileged() {
            return Err(HoneypotError::PrivilegedPort { port });
        }
        Ok(())
    }

    pub async fn start(&self, name: &str) -> HoneypotResult<Honeypot> {
        let hp = self.require(name).await?;
        if hp.honeypot_status == "started" {
            return Err(HoneypotError::AlreadyRunning(hp.honeypot_name));
        }
        self.as_instance(&hp)
            .start()
            .await
            .map_err(|e| self.classify_power_error(hp.honeypot_port, e))?;
        self.require(name).await
    }

    pub async fn restart(&self, name: &str) -> HoneypotResult<Honeypot> {
        let hp = self.require(name).await?;
        if hp.honeypot_status != "started" {
            return Err(HoneypotError::NotRunning(hp.honeypot_name));
        }
        self.runner
            .run(&["restart", name])
            .await
            .map_err(|e| self.classify_power_error(hp.honeypot_port, e))?;
        self.require(name).await
    }

    pub async fn stop(&self, name: &str) -> HoneypotResult<Honeypot> {
        let hp = self.require(name).await?;
        if hp.honeypot_status == "exited" {
            return Ok(hp);
        }
        self.guard_active_connections(&hp)?;
        self.as_instance(&hp)
            .stop()
            .await
            .map_err(|e| HoneypotError::ContainerFailure(e.to_string()))?;
        self.require(name).await
    }

    pub async fn delete(&self, name: &str) -> HoneypotResult<Honeypot> {
        let hp = self.require(name).await?;
        self.guard_active_connections(&hp)?;
        if hp.honeypot_status == "started" {
            return Err(HoneypotError::ContainerBusy(name.to_string()));
        }
        self.as_instance(&hp)
            .delete()
            .await
            .map_err(|e| HoneypotError::ContainerFailure(e.to_string()))?;
        Ok(hp)
    }

    fn guard_active_connections(&self, hp: &Honeypot) -> HoneypotResult<()> {
        if port::has_established_connection(hp.honeypot_port) {
            return Err(HoneypotError::ActiveConnections {
                name: hp.honeypot_name.clone(),
                port: hp.honeypot_port,
            });
        }
        Ok(())
    }

    /// Classifies a runtime failure from `start`/`restart` against §7's
    /// table: a port-bind rejection below 1024 is the already-known
    /// `PrivilegedPort` (400), while any other permission-denied response
    /// from the runtime (e.g. a cgroup or SELinux denial unrelated to port
    /// binding) is the distinct `PermissionDenied` (403).
    fn classify_power_error(&self, port: u16, e: crate::runtime::RuntimeError) -> HoneypotError {
        let msg = e.to_string();
        let lower = msg.to_lowercase();
        if lower.contains("privileged") || (port < 1024 && lower.contains("permission denied")) {
            HoneypotError::PrivilegedPort { port }
        } else if lower.contains("permission denied") {
            HoneypotError::PermissionDenied
        } else {
            HoneypotError::ContainerFailure(msg)
        }
    }

    fn as_instance(&self, hp: &Honeypot) -> HoneypotInstance {
        HoneypotInstance {
            name: hp.honeypot_name.clone(),
            image: hp.image.clone(),
            args: Vec::new(),
            runner: self.runner.clone(),
            network: self.network.clone(),
            network_name: self.network_name.clone(),
            volume_dirs: Vec::new(),
        }
    }

    async fn require(&self, name: &str) -> HoneypotResult<Honeypot> {
        self.inspect(name)
            .await?
            .ok_or_else(|| HoneypotError::NotFound(name.to_string()))
    }

    /// Reconstruct a honeypot record by inspecting the runtime (spec §3.1:
    /// "a record may be reconstructed from the runtime at any time via
    /// discovery"). Returns `None` if no such container exists.
    pub async fn inspect(&self, name: &str) -> HoneypotResult<Option<Honeypot>> {
        let format = "{{.Id}}|{{index .Config.Labels \"hive.type\"}}|{{index .Config.Labels \"hive.port\"}}|{{.Config.Image}}|{{.State.Status}}";
        match self.runner.run(&["inspect", "-f", format, name]).await {
            Ok(output) => Ok(Some(self.parse_inspect(&output)?)),
            Err(crate::runtime::RuntimeError::CommandFailed(_)) => Ok(None),
            Err(e) => Err(HoneypotError::ContainerFailure(e.to_string())),
        }
    }

    fn parse_inspect(&self, output: &str) -> HoneypotResult<Honeypot> {
        let mut parts = output.splitn(5, '|');
        let id = parts.next().unwrap_or_default().to_string();
        let honeypot_type = parts.next().unwrap_or("unknown").to_string();
        let port_str = parts.next().unwrap_or("0");
        let image = parts.next().unwrap_or_default().to_string();
        let raw_status = parts.next().unwrap_or("not found");

        let honeypot_port: u16 = port_str.parse().unwrap_or(0);
        let honeypot_name = Honeypot::derive_name(&honeypot_type, honeypot_port);

        Ok(Honeypot {
            honeypot_id: Some(id),
            honeypot_type,
            honeypot_port,
            honeypot_name,
            image,
            honeypot_status: render_status(raw_status).to_string(),
        })
    }

    pub async fn list_all(&self) -> HoneypotResult<Vec<Honeypot>> {
        self.list_by_label_filter(&format!("owner={}", self.owner_label)).await
    }

    pub async fn list_by_type(&self, honeypot_type: &str) -> HoneypotResult<Vec<Honeypot>> {
        if !self.catalog.type_exists(honeypot_type) {
            return Err(HoneypotError::UnknownType(honeypot_type.to_string()));
        }
        self.list_by_label_filter(&format!("hive.type={honeypot_type}")).await
    }

    /// `list_by_status` renders status in-process since `running` is shown
    /// externally as `started` (spec §4.4).
    pub async fn list_by_status(&self, status: &str) -> HoneypotResult<Vec<Honeypot>> {
        let all = self.list_all().await?;
        Ok(all.into_iter().filter(|hp| hp.honeypot_status == status).collect())
    }

    async fn find_by_port(&self, port: u16) -> Option<Honeypot> {
        self.list_by_label_filter(&format!("hive.port={port}"))
            .await
            .ok()?
            .into_iter()
            .next()
    }

    async fn list_by_label_filter(&self, filter: &str) -> HoneypotResult<Vec<Honeypot>> {
        let ids = self
            .runner
            .run(&["ps", "-a", "--filter", &format!("label={filter}"), "--format", "{{.ID}}"])
            .await
            .map_err(|e| HoneypotError::ContainerFailure(e.to_string()))?;

        let mut honeypots = Vec::new();
        for id in ids.lines().filter(|l| !l.is_empty()) {
            if let Some(hp) = self.inspect(id).await? {
                honeypots.push(hp);
            }
        }
        Ok(honeypots)
    }
}

/// Releases the in-flight create lock for `name` on drop.
fn scopeguard<'a>(set: &'a DashSet<String>, name: &'a str) -> impl Drop + 'a {
    struct Guard<'a>(&'a DashSet<String>, &'a str);
    impl<'a> Drop for Guard<'a> {
        fn drop(&mut self) {
            self.0.remove(self.1);
        }
    }
    Guard(set, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt;

    use super::super::catalog::HoneypotCatalog;

    /// A stand-in `podman` tracking container state as files under `$STATE`,
    /// in the spirit of `container::tests::FakeContainer`'s fake binary but
    /// stateful enough to drive `HoneypotManager`'s own guards (which bypass
    /// the generic `ContainerManager` template for inspect/list).
    fn fake_podman_manager(dir: &std::path::Path) -> std::path::PathBuf {
        let state = dir.join("state");
        std::fs::create_dir_all(&state).unwrap();
        let script = dir.join("podman");
        let mut file = std::fs::File::create(&script).unwrap();
        writeln!(
            file,
            r#"#!/bin/sh
STATE="{state}"
case "$1" in
  version) exit 0 ;;
  network)
    [ "$2" = "exists" ] && exit 1
    exit 0
    ;;
  image)
    [ "$2" = "exists" ] && exit 1
    exit 0
    ;;
  build) exit 0 ;;
  container)
    if [ "$2" = "exists" ]; then
      [ -f "$STATE/$3" ] && exit 0 || exit 1
    fi
    exit 1
    ;;
  create)
    shift
    name=""
    prev=""
    labels=""
    for a in "$@"; do
      if [ "$prev" = "--name" ]; then name="$a"; fi
      if [ "$prev" = "--label" ]; then labels="$labels
$a"; fi
      prev="$a"
    done
    printf '%s\nstatus=created\n' "$labels" > "$STATE/$name"
    exit 0
    ;;
  start)
    name="$2"
    [ -f "$STATE/$name" ] || exit 1
    grep -v '^status=' "$STATE/$name" > "$STATE/$name.tmp"
    echo "status=running" >> "$STATE/$name.tmp"
    mv "$STATE/$name.tmp" "$STATE/$name"
    exit 0
    ;;
  stop)
    name="$2"
    [ -f "$STATE/$name" ] || exit 1
    grep -v '^status=' "$STATE/$name" > "$STATE/$name.tmp"
    echo "status=exited" >> "$STATE/$name.tmp"
    mv "$STATE/$name.tmp" "$STATE/$name"
    exit 0
    ;;
  restart)
    name="$2"
    [ -f "$STATE/$name" ] && exit 0 || exit 1
    ;;
  rm)
    name="$3"
    rm -f "$STATE/$name"
    exit 0
    ;;
  inspect)
    name="$4"
    [ -f "$STATE/$name" ] || exit 1
    htype=$(grep '^hive.type=' "$STATE/$name" | cut -d= -f2)
    port=$(grep '^hive.port=' "$STATE/$name" | cut -d= -f2)
    status=$(grep '^status=' "$STATE/$name" | cut -d= -f2)
    echo "${{name}}-id|${{htype}}|${{port}}|test-image|${{status}}"
    exit 0
    ;;
  ps)
    shift
    prev=""
    filter=""
    for a in "$@"; do
      if [ "$prev" = "--filter" ]; then filter="$a"; fi
      prev="$a"
    done
    kv="${{filter#label=}}"
    for f in "$STATE"/*; do
      [ -f "$f" ] || continue
      case "$f" in *.tmp) continue ;; esac
      n=$(basename "$f")
      grep -qx "$kv" "$f" && echo "$n"
    done
    exit 0
    ;;
  *) exit 0 ;;
esac
"#,
            state = state.display(),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    fn test_manager(dir: &std::path::Path) -> HoneypotManager {
        let script = fake_podman_manager(dir);
        let runner = PodmanRunner::new(script.to_string_lossy().to_string(), 5);
        let catalog = Arc::new(HoneypotCatalog::load(dir.join("nonexistent-types.yml")));
        HoneypotManager::new(
            runner,
            catalog,
            "hive-net".to_string(),
            "hive-test".to_string(),
            dir.join("volumes"),
            dir.join("build"),
        )
    }

    fn create_req(honeypot_type: &str, port: u16) -> CreateHoneypotRequest {
        CreateHoneypotRequest {
            honeypot_type: honeypot_type.to_string(),
            honeypot_port: port,
            honeypot_cpu_limit: None,
            honeypot_cpu_quota: None,
            honeypot_memory_limit: None,
            honeypot_memory_swap_limit: None,
            authentication: None,
            banner: None,
        }
    }

    #[tokio::test]
    async fn create_rejects_a_second_type_claiming_the_same_port() {
        let dir = tempfile::tempdir().unwrap();
        let manager = test_manager(dir.path());

        manager
            .create(create_req("ssh", 2201))
            .await
            .expect("first create should succeed");

        let err = manager
            .create(create_req("ftp", 2201))
            .await
            .expect_err("a different type claiming the same port must be rejected");
        assert!(matches!(err, HoneypotError::PortInUse { port: 2201 }));
    }

    #[tokio::test]
    async fn create_rejects_an_exact_name_collision() {
        let dir = tempfile::tempdir().unwrap();
        let manager = test_manager(dir.path());

        manager
            .create(create_req("ssh", 2202))
            .await
            .expect("first create should succeed");
        let err = manager
            .create(create_req("ssh", 2202))
            .await
            .expect_err("recreating the same type+port must be rejected");
        assert!(matches!(err, HoneypotError::AlreadyExists { port: 2202 }));
    }

    #[tokio::test]
    async fn start_rejects_a_honeypot_that_is_already_running() {
        let dir = tempfile::tempdir().unwrap();
        let manager = test_manager(dir.path());
        let hp = manager.create(create_req("ssh", 2203)).await.unwrap();

        manager.start(&hp.honeypot_name).await.expect("first start should succeed");
        let err = manager
            .start(&hp.honeypot_name)
            .await
            .expect_err("starting an already-running honeypot must be rejected");
        assert!(matches!(err, HoneypotError::AlreadyRunning(_)));
    }

    #[tokio::test]
    async fn restart_rejects_a_honeypot_that_is_not_running() {
        let dir = tempfile::tempdir().unwrap();
        let manager = test_manager(dir.path());
        let hp = manager.create(create_req("ssh", 2204)).await.unwrap();

        let err = manager
            .restart(&hp.honeypot_name)
            .await
            .expect_err("restarting a non-running honeypot must be rejected");
        assert!(matches!(err, HoneypotError::NotRunning(_)));

        manager.start(&hp.honeypot_name).await.expect("start should succeed");
        let restarted = manager
            .restart(&hp.honeypot_name)
            .await
            .expect("restart should succeed once running");
        assert_eq!(restarted.honeypot_status, "started");
    }

    #[tokio::test]
    async fn delete_rejects_a_honeypot_that_is_still_running() {
        let dir = tempfile::tempdir().unwrap();
        let manager = test_manager(dir.path());
        let hp = manager.create(create_req("ssh", 2205)).await.unwrap();
        manager.start(&hp.honeypot_name).await.unwrap();

        let err = manager
            .delete(&hp.honeypot_name)
            .await
            .expect_err("deleting a running honeypot must be rejected");
        assert!(matches!(err, HoneypotError::ContainerBusy(_)));

        manager.stop(&hp.honeypot_name).await.expect("stop should succeed");
        manager
            .delete(&hp.honeypot_name)
            .await
            .expect("delete should succeed once stopped");
    }
}
