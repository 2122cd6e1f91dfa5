pub mod sources;

use std::{path::PathBuf, time::Duration};

use pactest_core::{
    engine::{EngineDescriptor, EngineRegistry},
    eval::OrchestratorConfig,
};
use url::Url;

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub orchestrator: OrchestratorSettings,
    /// Engines in result order.
    pub engines: Vec<EngineDescriptor>,
    pub metadata: ConfigMetadata,
}

impl Config {
    pub fn engine_registry(&self) -> pactest_core::Result<EngineRegistry> {
        EngineRegistry::new(self.engines.clone())
    }

    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            engine_timeout: self.orchestrator.engine_timeout,
            pac_base_url: self.server.public_url.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Base URL engines use to fetch stored PACs.
    pub public_url: Url,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub capacity: usize,
}

#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub engine_timeout: Duration,
}

/// Where the engine list came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EngineSource {
    #[default]
    Default,
    File(PathBuf),
    Env,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
    pub engine_source: EngineSource,
}
