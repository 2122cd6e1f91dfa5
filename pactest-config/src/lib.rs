//! Configuration loading for the PAC test server.
//!
//! Settings come from three layers, highest precedence first: process
//! environment (after an optional `.env` file is applied), a TOML file, and
//! built-in defaults. [`ConfigLoader::load`] composes them, applies guard
//! rails and hands back the resulting [`Config`] together with any
//! [`ConfigWarnings`] worth logging at startup.
//!
//! ```no_run
//! use pactest_config::ConfigLoader;
//!
//! let load = ConfigLoader::new().with_config_path("pactest.toml").load()?;
//! for warning in &load.warnings.items {
//!     eprintln!("config: {}", warning.message);
//! }
//! println!("listening on {}:{}", load.config.server.host, load.config.server.port);
//! # Ok::<(), pactest_config::ConfigLoadError>(())
//! ```

/// Environment variable names and built-in defaults.
pub mod constants;
/// Layer composition.
pub mod loader;
/// Resolved configuration and its raw sources.
pub mod models;
/// Small helpers for reading typed values out of the environment.
pub mod util;
/// Hard limits and soft warnings applied to a composed configuration.
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoader, ConfigLoaderOptions, error::ConfigLoadError};
pub use models::{Config, ConfigMetadata, OrchestratorSettings, ServerConfig, StoreConfig};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
