//! The shared container lifecycle contract every concrete manager
//! (honeypots, search node, message bus, log collector) implements.
//!
//! This is the Rust shape of the original's `BaseContainerManager`: a base
//! that factors out the "does it exist / create / start / stop / delete /
//! status" boilerplate, with `pre_create`/`post_create` hooks for the bits
//! that differ per container (port mappings, volumes, network aliases).

use async_trait::async_trait;

use crate::runtime::{RuntimeError, RuntimeResult};

/// Anything that can be driven through the standard container lifecycle.
#[async_trait]
pub trait ContainerManager: Send + Sync {
    /// The name `podman` knows this container by.
    fn container_name(&self) -> &str;

    /// The image this container runs.
    fn image(&self) -> &str;

    /// Extra `podman create` flags (labels, ports, volumes, env) — placed
    /// between `--name <name>` and the image reference.
    fn create_args(&self) -> Vec<String>;

    /// The container's entrypoint arguments, placed after the image
    /// reference. Empty for images that need no override.
    fn command_args(&self) -> Vec<String> {
        Vec::new()
    }

    /// Hook run before `podman create` — e.g. ensure a named volume exists.
    async fn pre_create(&self) -> RuntimeResult<()> {
        Ok(())
    }

    /// Hook run after `podman create` — e.g. connect to the shared network.
    async fn post_create(&self) -> RuntimeResult<()> {
        Ok(())
    }

    /// Whether the container currently exists (running or not).
    async fn exists(&self) -> bool;

    /// Create the container if it doesn't exist yet. Idempotent.
    async fn create(&self) -> RuntimeResult<()> {
        if self.exists().await {
            return Ok(());
        }
        self.pre_create().await?;
        let mut args: Vec<String> = vec!["create".into(), "--name".into(), self.container_name().into()];
        args.extend(self.create_args());
        args.push(self.image().into());
        args.extend(self.command_args());
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        self.runner().run(&arg_refs).await?;
        self.post_create().await?;
        Ok(())
    }

    async fn start(&self) -> RuntimeResult<()> {
        self.runner().run(&["start", self.container_name()]).await.map(|_| ())
    }

    async fn stop(&self) -> RuntimeResult<()> {
        self.runner().run(&["stop", self.container_name()]).await.map(|_| ())
    }

    async fn delete(&self) -> RuntimeResult<()> {
        if !self.exists().await {
            return Ok(());
        }
        self.runner().run(&["rm", "-f", self.container_name()]).await.map(|_| ())
    }

    /// `podman inspect -f {{.State.Status}}`, or `"not found"` if missing.
    async fn status(&self) -> String {
        match self
            .runner()
            .run(&["inspect", "-f", "{{.State.Status}}", self.container_name()])
            .await
        {
            Ok(status) => status,
            Err(RuntimeError::CommandFailed(_)) => "not found".into(),
            Err(_) => "not found".into(),
        }
    }

    async fn is_running(&self) -> bool {
        self.status().await == "running"
    }

    /// Access to the runtime driver, needed by the default method bodies
    /// above. Implementors hold one (or a clone of the shared one).
    fn runner(&self) -> &crate::runtime::PodmanRunner;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::PodmanRunner;
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// A container manager backed by a fake `podman` shell script, so the
    /// shared `create`/`delete` template in this trait's default methods
    /// runs against a real subprocess rather than a mock.
    struct FakeContainer {
        runner: PodmanRunner,
        created: AtomicBool,
    }

    #[async_trait]
    impl ContainerManager for FakeContainer {
        fn container_name(&self) -> &str {
            "fake"
        }
        fn image(&self) -> &str {
            "fake-image"
        }
        fn create_args(&self) -> Vec<String> {
            vec![]
        }
        async fn exists(&self) -> bool {
            self.created.load(Ordering::SeqCst)
        }
        fn runner(&self) -> &PodmanRunner {
            &self.runner
        }
    }

    fn fake_podman_binary(dir: &std::path::Path) -> std::path::PathBuf {
        let path = dir.join("podman");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "#!/bin/sh\nexit 0").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn create_is_a_noop_when_the_container_already_exists() {
        let dir = tempfile::tempdir().unwrap();
        let binary = fake_podman_binary(dir.path());
        let container = FakeContainer {
            runner: PodmanRunner::new(binary.to_string_lossy().to_string(), 5),
            created: AtomicBool::new(true),
        };
        assert!(container.create().await.is_ok());
    }

    #[tokio::test]
    async fn create_issues_a_create_call_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let binary = fake_podman_binary(dir.path());
        let container = FakeContainer {
            runner: PodmanRunner::new(binary.to_string_lossy().to_string(), 5),
            created: AtomicBool::new(false),
        };
        assert!(container.create().await.is_ok());
    }

    #[tokio::test]
    async fn delete_is_a_noop_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let binary = fake_podman_binary(dir.path());
        let container = FakeContainer {
            runner: PodmanRunner::new(binary.to_string_lossy().to_string(), 5),
            created: AtomicBool::new(false),
        };
        assert!(container.delete().await.is_ok());
    }

    #[tokio::test]
    async fn status_reports_not_found_when_inspect_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("podman");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "#!/bin/sh\necho 'no such container' >&2\nexit 1").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

        let container = FakeContainer {
            runner: PodmanRunner::new(path.to_string_lossy().to_string(), 5),
            created: AtomicBool::new(false),
        };
        assert_eq!(container.status().await, "not found");
        assert!(!container.is_running().await);
    }
}
