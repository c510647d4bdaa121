//! Shared state for each HTTP surface.

use std::sync::Arc;

use crate::honeypot::HoneypotManager;
use crate::infra::LogInfraOrchestrator;

#[derive(Clone)]
pub struct HoneypotApiState {
    pub manager: Arc<HoneypotManager>,
}

#[derive(Clone)]
pub struct InfraApiState {
    pub orchestrator: Arc<LogInfraOrchestrator>,
}
