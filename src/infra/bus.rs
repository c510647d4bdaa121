//! Message bus (NATS JetStream) infrastructure container.
//!
//! Grounded on `NATS_Server.py`: pull the official image, run with
//! JetStream and the monitoring port enabled, attach to the shared network
//! under a fixed DNS alias so honeypots can reach it by name.

use async_trait::async_trait;

use crate::container::ContainerManager;
use crate::runtime::{ImageManager, NetworkManager, PodmanRunner};

use super::{InfraComponent, InfraError, InfraResult};

pub struct MessageBus {
    runner: PodmanRunner,
    network: NetworkManager,
    images: ImageManager,
    network_name: String,
    image: String,
}

const CONTAINER_NAME: &str = "hive-nats-server";

impl MessageBus {
    pub fn new(runner: PodmanRunner, network_name: String, image: String) -> Self {
        Self {
            network: NetworkManager::new(runner.clone()),
            images: ImageManager::new(runner.clone()),
            runner,
            network_name,
            image,
        }
    }
}

#[async_trait]
impl ContainerManager for MessageBus {
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
        ]
    }

    fn command_args(&self) -> Vec<String> {
        vec!["--js".into(), "-m".into(), "8222".into()]
    }

    async fn pre_create(&self) -> crate::runtime::RuntimeResult<()> {
        self.network.ensure_exists(&self.network_name).await?;
        self.images.ensure_pulled(&self.image).await
    }

    async fn exists(&self) -> bool {
        self.runner.succeeds(&["container", "exists", CONTAINER_NAME]).await
    }

    fn runner(&self) -> &PodmanRunner {
        &self.runner
    }
}

#[async_trait]
impl InfraComponent for MessageBus {
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
