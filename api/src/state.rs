use std::sync::Arc;

use crate::config::SkillConfig;
use crate::gateway::PlantGateway;

/// Shared, read-only per-process state. Requests never mutate it.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SkillConfig>,
    pub gateway: Arc<dyn PlantGateway>,
}

impl AppState {
    pub fn new(config: SkillConfig, gateway: impl PlantGateway + 'static) -> Self {
        Self {
            config: Arc::new(config),
            gateway: Arc::new(gateway),
        }
    }
}
