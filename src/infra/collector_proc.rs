//! Log collector infrastructure container.
//!
//! Grounded on `Log_Collector.py`: unlike the message bus, this container
//! builds its own image from a project-local build context rather than
//! pulling one, and is wired with the search endpoint, credentials, and bus
//! URL through environment variables so the enrichment pipeline it runs
//! (see `crate::collector`) can reach both dependencies.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::container::ContainerManager;
use crate::runtime::{ImageManager, NetworkManager, PodmanRunner, RuntimeResult};

use super::{InfraComponent, InfraError, InfraResult};

const CONTAINER_NAME: &str = "hive-log-collector";

pub struct LogCollector {
    runner: PodmanRunner,
    network: NetworkManager,
    images: ImageManager,
    network_name: String,
    image: String,
    build_context_dir: PathBuf,
    opensearch_url: String,
    opensearch_user: String,
    opensearch_password: String,
    nats_url: String,
}

impl LogCollector {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        runner: PodmanRunner,
        network_name: String,
        image: String,
        build_context_dir: PathBuf,
        opensearch_url: String,
        opensearch_user: String,
        opensearch_password: String,
        nats_url: String,
    ) -> Self {
        Self {
            images: ImageManager::new(runner.clone()),
            network: NetworkManager::new(runner.clone()),
            runner,
            network_name,
            image,
            build_context_dir,
            opensearch_url,
            opensearch_user,
            opensearch_password,
            nats_url,
        }
    }
}

#[async_trait]
impl ContainerManager for LogCollector {
    fn container_name(&self) -> &str {
        CONTAINER_NAME
    }

    fn image(&self) -> &str {
        &self.image
    }

    fn create_args(&self) -> Vec<String> {
        vec![
            "--hostname".into(),
            CONTAINER_NAME.into(),
            "--network".into(),
            self.network_name.clone(),
            "--network-alias".into(),
            CONTAINER_NAME.into(),
            "--label".into(),
            "owner=hive".into(),
            "--label".into(),
            format!("hive.type={CONTAINER_NAME}"),
            "--security-opt".into(),
            "no-new-privileges".into(),
            "--restart".into(),
            "always".into(),
            "--env".into(),
            format!("OPENSEARCH_HOST={}", self.opensearch_url),
            "--env".into(),
            format!("OPENSEARCH_USER={}", self.opensearch_user),
            "--env".into(),
            format!("OPENSEARCH_PASSWORD={}", self.opensearch_password),
            "--env".into(),
            format!("NATS_URL={}", self.nats_url),
        ]
    }

    async fn pre_create(&self) -> RuntimeResult<()> {
        self.network.ensure_exists(&self.network_name).await?;
        self.images
            .ensure_built(&self.image, &self.build_context_dir, "Dockerfile.subscriber")
            .await
    }

    async fn exists(&self) -> bool {
        self.runner.succeeds(&["container", "exists", CONTAINER_NAME]).await
    }

    fn runner(&self) -> &PodmanRunner {
        &self.runner
    }
}

#[async_trait]
impl InfraComponent for LogCollector {
    fn name(&self) -> &str {
        CONTAINER_NAME
    }

    async fn exists(&self) -> bool {
        ContainerManager::exists(self).await
    }

    async fn create(&self) -> InfraResult<()> {
        ContainerManager::create(self)
            .await
            .map_err(|e| InfraError::RuntimeFailure(e.to_string()))
    }

    async fn start(&self) -> InfraResult<()> {
        ContainerManager::start(self)
            .await
            .map_err(|e| InfraError::RuntimeFailure(e.to_string()))
    }

    async fn stop(&self) -> InfraResult<()> {
        ContainerManager::stop(self)
            .await
            .map_err(|e| InfraError::RuntimeFailure(e.to_string()))
    }

    async fn delete(&self) -> InfraResult<()> {
        ContainerManager::delete(self)
            .await
            .map_err(|e| InfraError::RuntimeFailure(e.to_string()))
    }

    async fn status(&self) -> String {
        ContainerManager::status(self).await
    }
}
