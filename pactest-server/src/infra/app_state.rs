use std::{fmt, sync::Arc};

use pactest_config::Config;
use pactest_core::{eval::Orchestrator, pac::PacStore};

/// Shared handles passed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PacStore>,
    pub orchestrator: Arc<Orchestrator>,
    pub config: Arc<Config>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("stored_pacs", &self.store.len())
            .field("engines", &self.orchestrator.registry().len())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Builds the store and the orchestrator described by `config`.
    pub fn from_config(config: Config) -> pactest_core::Result<Self> {
        let registry = config.engine_registry()?;
        let orchestrator = Orchestrator::new(registry, config.orchestrator_config())?;
        let store = PacStore::new(config.store.capacity);

        Ok(Self {
            store: Arc::new(store),
            orchestrator: Arc::new(orchestrator),
            config: Arc::new(config),
        })
    }

    pub fn store(&self) -> &PacStore {
        &self.store
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
