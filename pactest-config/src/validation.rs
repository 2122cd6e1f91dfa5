use std::{collections::HashSet, time::Duration};

use thiserror::Error;

use crate::models::Config;

/// Beyond this, a single stuck engine holds an evaluation open for a long time.
const LONG_ENGINE_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error("store capacity must be greater than zero")]
    ZeroCapacity,
    #[error("engine timeout must be greater than zero")]
    ZeroEngineTimeout,
    #[error("engine #{index} has an empty name")]
    EmptyEngineName { index: usize },
    #[error("engine name '{name}' is configured more than once")]
    DuplicateEngine { name: String },
    #[error("{field} must use http or https, got '{scheme}'")]
    UnsupportedScheme { field: String, scheme: String },
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(&mut self, message: S, hint: H) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }
}

pub fn apply_guard_rails(config: &Config) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    if config.store.capacity == 0 {
        return Err(ConfigGuardRailError::ZeroCapacity);
    }
    if config.orchestrator.engine_timeout.is_zero() {
        return Err(ConfigGuardRailError::ZeroEngineTimeout);
    }

    ensure_http("server.public_url", config.server.public_url.scheme())?;

    let mut seen = HashSet::new();
    for (index, engine) in config.engines.iter().enumerate() {
        if engine.name.trim().is_empty() {
            return Err(ConfigGuardRailError::EmptyEngineName { index });
        }
        if !seen.insert(engine.name.as_str()) {
            return Err(ConfigGuardRailError::DuplicateEngine {
                name: engine.name.clone(),
            });
        }
        ensure_http(&format!("engines.{}.url", engine.name), engine.url.scheme())?;
        if engine.flags.is_empty() {
            warnings.push(format!(
                "Engine '{}' has no flags; consumers cannot tell what its result means",
                engine.name
            ));
        }
    }

    if config.engines.is_empty() {
        warnings.push_with_hint(
            "No engines configured; every evaluation will return an empty result list",
            "Add [[engines]] tables to pactest.toml or set PACTEST_ENGINES_JSON",
        );
    }

    let unspecified_host = config
        .server
        .public_url
        .host_str()
        .is_some_and(|host| matches!(host, "0.0.0.0" | "[::]"));
    if unspecified_host {
        warnings.push_with_hint(
            "Public URL points at an unspecified address; engines will not be able to fetch PACs",
            "Set PACTEST_PUBLIC_URL to an address the engines can reach",
        );
    }

    if config.orchestrator.engine_timeout > LONG_ENGINE_TIMEOUT {
        warnings.push(format!(
            "Engine timeout of {}s is unusually long",
            config.orchestrator.engine_timeout.as_secs()
        ));
    }

    Ok(warnings)
}

fn ensure_http(field: &str, scheme: &str) -> Result<(), ConfigGuardRailError> {
    match scheme {
        "http" | "https" => Ok(()),
        other => Err(ConfigGuardRailError::UnsupportedScheme {
            field: field.to_string(),
            scheme: other.to_string(),
        }),
    }
}
