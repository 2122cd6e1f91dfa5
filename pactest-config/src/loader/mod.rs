pub mod error;

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use once_cell::sync::Lazy;
use pactest_core::engine::EngineDescriptor;
use tracing::debug;
use url::Url;

use crate::{
    constants::{
        DEFAULT_ENGINE_TIMEOUT, DEFAULT_ENGINES, DEFAULT_HOST, DEFAULT_PORT,
        DEFAULT_STORE_CAPACITY,
    },
    models::{
        Config, ConfigMetadata, EngineSource, OrchestratorSettings, ServerConfig, StoreConfig,
        sources::{EnvConfig, FileConfig, FileEngineConfig},
    },
    util::parse_duration,
    validation::{self, ConfigWarnings},
};
use error::ConfigLoadError;

static DEFAULT_CONFIG_LOCATIONS: Lazy<Vec<PathBuf>> = Lazy::new(|| {
    vec![
        PathBuf::from("pactest.toml"),
        PathBuf::from("config/pactest.toml"),
    ]
});

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
    /// Ignore `.env` entirely, explicit or not.
    pub skip_env_file: bool,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn without_env_file(mut self) -> Self {
        self.options.skip_env_file = true;
        self
    }

    /// Applies `.env`, reads the environment and the config file, then
    /// composes them (env > file > defaults) and runs the guard rails.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = self.apply_env_file()?;

        let env_config = EnvConfig::gather()?;
        let (file_config, config_path) = self.load_file_config(&env_config)?;

        let (config, warnings) =
            compose_config(file_config, env_config, config_path, env_file_loaded)?;

        debug!(
            config_path = ?config.metadata.config_path,
            env_file_loaded,
            engines = config.engines.len(),
            warnings = warnings.items.len(),
            "configuration loaded"
        );

        Ok(ConfigLoad { config, warnings })
    }

    /// An explicit `.env` path must exist; the implicit `./.env` is optional.
    /// A malformed file is an error either way.
    fn apply_env_file(&self) -> Result<bool, ConfigLoadError> {
        if self.options.skip_env_file {
            return Ok(false);
        }

        match &self.options.env_file {
            Some(path) => match dotenvy::from_path(path) {
                Ok(()) => Ok(true),
                Err(dotenvy::Error::Io(source)) => Err(ConfigLoadError::EnvFileIo {
                    path: path.clone(),
                    source,
                }),
                Err(err) => Err(err.into()),
            },
            None => match dotenvy::dotenv() {
                Ok(_) => Ok(true),
                Err(dotenvy::Error::Io(_)) => Ok(false),
                Err(err) => Err(err.into()),
            },
        }
    }

    fn load_file_config(
        &self,
        env_config: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        // Explicit and env-provided paths must exist; defaults are optional.
        let (path, required) = if let Some(explicit) = &self.options.config_path {
            (explicit.clone(), true)
        } else if let Some(from_env) = &env_config.config_path {
            (from_env.clone(), true)
        } else if let Some(found) = DEFAULT_CONFIG_LOCATIONS
            .iter()
            .find(|candidate| candidate.exists())
        {
            (found.clone(), false)
        } else {
            return Ok((None, None));
        };

        if !path.exists() {
            if required {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            return Ok((None, None));
        }

        let file_config = read_file_config(&path)?;
        Ok((Some(file_config), Some(path)))
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn compose_config(
    file_config: Option<FileConfig>,
    env: EnvConfig,
    config_path: Option<PathBuf>,
    env_file_loaded: bool,
) -> Result<(Config, ConfigWarnings), ConfigLoadError> {
    let mut warnings = ConfigWarnings::default();

    if file_config.is_none() {
        warnings.push_with_hint(
            "No pactest.toml detected; using environment variables and defaults",
            "Pass --config or set PACTEST_CONFIG_PATH to load a configuration file",
        );
    }

    let FileConfig {
        server: file_server,
        store: file_store,
        orchestrator: file_orchestrator,
        engines: file_engines,
    } = file_config.unwrap_or_default();

    let host = env
        .server_host
        .or(file_server.host)
        .unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = env.server_port.or(file_server.port).unwrap_or(DEFAULT_PORT);
    let public_url = env
        .public_url
        .or(file_server.public_url)
        .unwrap_or_else(|| format!("http://127.0.0.1:{port}/"));
    let public_url = parse_url("server.public_url", &public_url)?;

    let capacity = env
        .max_cache
        .or(file_store.capacity)
        .unwrap_or(DEFAULT_STORE_CAPACITY);

    let engine_timeout = match (env.engine_timeout, file_orchestrator.engine_timeout) {
        (Some(timeout), _) => timeout,
        (None, Some(raw)) => parse_file_duration("orchestrator.engine_timeout", &raw)?,
        (None, None) => DEFAULT_ENGINE_TIMEOUT,
    };

    let (engines, engine_source) = match (env.engines, file_engines) {
        (Some(engines), _) => (build_engines(engines)?, EngineSource::Env),
        (None, Some(engines)) => {
            let source = config_path
                .clone()
                .map(EngineSource::File)
                .unwrap_or_default();
            (build_engines(engines)?, source)
        }
        (None, None) => (default_engines()?, EngineSource::Default),
    };

    let config = Config {
        server: ServerConfig {
            host,
            port,
            public_url,
        },
        store: StoreConfig { capacity },
        orchestrator: OrchestratorSettings { engine_timeout },
        engines,
        metadata: ConfigMetadata {
            config_path,
            env_file_loaded,
            engine_source,
        },
    };

    warnings.extend(validation::apply_guard_rails(&config)?);

    Ok((config, warnings))
}

fn parse_url(field: &str, raw: &str) -> Result<Url, ConfigLoadError> {
    Url::parse(raw.trim()).map_err(|source| ConfigLoadError::InvalidUrl {
        field: field.to_string(),
        value: raw.to_string(),
        source,
    })
}

fn parse_file_duration(field: &'static str, raw: &str) -> Result<Duration, ConfigLoadError> {
    parse_duration(raw).map_err(|source| ConfigLoadError::InvalidDuration {
        field,
        value: raw.to_string(),
        source,
    })
}

fn build_engines(raw: Vec<FileEngineConfig>) -> Result<Vec<EngineDescriptor>, ConfigLoadError> {
    raw.into_iter()
        .map(|engine| {
            let name = engine.name.trim().to_string();
            let url = parse_url(&format!("engines.{name}.url"), &engine.url)?;
            Ok(EngineDescriptor::new(name, url, engine.flags))
        })
        .collect()
}

/// The reference v8, winhttp and eslint engines on localhost.
pub fn default_engines() -> Result<Vec<EngineDescriptor>, ConfigLoadError> {
    DEFAULT_ENGINES
        .iter()
        .map(|(name, url, flags)| {
            let url = parse_url(&format!("engines.{name}.url"), url)?;
            Ok(EngineDescriptor::new(*name, url, flags.iter().copied()))
        })
        .collect()
}
