//! Subprocess execution of the `podman` CLI.

use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use super::stderr::simplify;
use super::{RuntimeError, RuntimeResult};

/// Runs `podman` commands with a uniform timeout and stderr simplification.
///
/// Unlike the original's singleton `PodmanRunner`, this one is just a plain
/// value cloned (cheaply — it's two `String`s) into every container manager
/// that needs it; there is no process-wide global to coordinate through.
#[derive(Debug, Clone)]
pub struct PodmanRunner {
    binary: String,
    timeout: Duration,
}

impl PodmanRunner {
    pub fn new(binary: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            binary: binary.into(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Run a podman subcommand, returning trimmed stdout.
    pub async fn run(&self, args: &[&str]) -> RuntimeResult<String> {
        let cmd: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        debug!(command = %shell_words::join(&cmd), "running podman command");

        let mut child = Command::new(&self.binary);
        child.args(args);

        let output = match timeout(self.timeout, child.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RuntimeError::BinaryMissing(self.binary.clone()));
            }
            Ok(Err(e)) => return Err(RuntimeError::Io(e)),
            Err(_) => return Err(RuntimeError::Timeout(self.timeout)),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RuntimeError::CommandFailed(simplify(&cmd, &stderr)));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Run a command purely for its exit status (used by the `exists`-style
    /// probes the original expressed as a bare `subprocess.run(...).returncode`).
    pub async fn succeeds(&self, args: &[&str]) -> bool {
        let mut child = Command::new(&self.binary);
        child.args(args);
        matches!(
            timeout(self.timeout, child.status()).await,
            Ok(Ok(status)) if status.success()
        )
    }
}
