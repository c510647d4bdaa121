//! Pulls or builds container images as necessary.

use std::path::Path;

use tracing::info;

use super::{PodmanRunner, RuntimeResult};

#[derive(Debug, Clone)]
pub struct ImageManager {
    runner: PodmanRunner,
}

impl ImageManager {
    pub fn new(runner: PodmanRunner) -> Self {
        Self { runner }
    }

    pub async fn exists(&self, tag: &str) -> bool {
        self.runner.succeeds(&["image", "exists", tag]).await
    }

    pub async fn ensure_pulled(&self, image: &str) -> RuntimeResult<()> {
        if self.exists(image).await {
            return Ok(());
        }
        self.runner.run(&["pull", image]).await?;
        info!(image, "pulled image");
        Ok(())
    }

    /// Build `tag` from a Dockerfile under `context_dir` if it isn't present
    /// already. Non-recursive: the caller is expected to call this exactly
    /// once before the single subsequent `podman create`, never to retry
    /// `create` and have it trigger another build.
    pub async fn ensure_built(
        &self,
        tag: &str,
        context_dir: &Path,
        dockerfile: &str,
    ) -> RuntimeResult<()> {
        if self.exists(tag).await {
            return Ok(());
        }
        self.runner
            .run(&[
                "build",
                "-t",
                tag,
                "-f",
                dockerfile,
                &context_dir.to_string_lossy(),
            ])
            .await?;
        info!(image = tag, "built image");
        Ok(())
    }
}
