use std::{path::PathBuf, time::Duration};

use pactest_core::engine::EngineFlag;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        ENV_CONFIG_PATH, ENV_ENGINE_TIMEOUT, ENV_ENGINES_JSON, ENV_MAX_CACHE, ENV_PUBLIC_URL,
        ENV_SERVER_HOST, ENV_SERVER_PORT,
    },
    loader::error::ConfigLoadError,
    util::{non_empty_var, parse_duration_var, parse_var},
};

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub store: FileStoreConfig,
    #[serde(default)]
    pub orchestrator: FileOrchestratorConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engines: Option<Vec<FileEngineConfig>>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileStoreConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileOrchestratorConfig {
    /// Humantime string, e.g. `"5s"` or `"750ms"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_timeout: Option<String>,
}

/// One `[[engines]]` table; also the element shape of `PACTEST_ENGINES_JSON`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileEngineConfig {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub flags: Vec<EngineFlag>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub server_host: Option<String>,
    pub server_port: Option<u16>,
    pub public_url: Option<String>,
    pub max_cache: Option<usize>,
    pub engine_timeout: Option<Duration>,
    pub engines: Option<Vec<FileEngineConfig>>,
}

impl EnvConfig {
    pub fn gather() -> Result<Self, ConfigLoadError> {
        let engines = non_empty_var(ENV_ENGINES_JSON)
            .map(|raw| {
                serde_json::from_str::<Vec<FileEngineConfig>>(&raw)
                    .map_err(|source| ConfigLoadError::EnginesJson { source })
            })
            .transpose()?;

        Ok(Self {
            config_path: non_empty_var(ENV_CONFIG_PATH).map(PathBuf::from),
            server_host: non_empty_var(ENV_SERVER_HOST),
            server_port: parse_var(ENV_SERVER_PORT)?,
            public_url: non_empty_var(ENV_PUBLIC_URL),
            max_cache: parse_var(ENV_MAX_CACHE)?,
            engine_timeout: parse_duration_var(ENV_ENGINE_TIMEOUT)?,
            engines,
        })
    }
}
