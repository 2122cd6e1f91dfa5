use std::{
    ffi::OsString,
    fs,
    path::Path,
    sync::{Mutex, MutexGuard},
    time::Duration,
};

use once_cell::sync::Lazy;
use pactest_config::{ConfigGuardRailError, ConfigLoadError, ConfigLoader, models::EngineSource};
use pactest_core::engine::EngineFlag;
use tempfile::TempDir;

const MANAGED_VARS: &[&str] = &[
    "PACTEST_CONFIG_PATH",
    "SERVER_HOST",
    "SERVER_PORT",
    "PACTEST_PUBLIC_URL",
    "MAX_CACHE",
    "ENGINE_TIMEOUT",
    "PACTEST_ENGINES_JSON",
];

// The environment is process-wide; tests touching it run one at a time.
static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

struct EnvVarGuard {
    key: &'static str,
    previous: Option<OsString>,
}

impl EnvVarGuard {
    fn unset(key: &'static str) -> Self {
        let previous = std::env::var_os(key);
        // SAFETY: serialized by ENV_LOCK and restored on drop.
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, previous }
    }

    fn set(key: &'static str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        let previous = std::env::var_os(key);
        // SAFETY: serialized by ENV_LOCK and restored on drop.
        unsafe {
            std::env::set_var(key, value);
        }
        Self { key, previous }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        // SAFETY: we reinstate the environment variable to its prior state.
        unsafe {
            match &self.previous {
                Some(prev) => std::env::set_var(self.key, prev),
                None => std::env::remove_var(self.key),
            }
        }
    }
}

/// A clean environment plus a scratch directory. Field order matters: the
/// guards restore the environment before the lock is released.
struct Sandbox {
    guards: Vec<EnvVarGuard>,
    dir: TempDir,
    _lock: MutexGuard<'static, ()>,
}

impl Sandbox {
    fn new() -> Self {
        let lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let guards = MANAGED_VARS.iter().copied().map(EnvVarGuard::unset).collect();
        Self {
            guards,
            dir: TempDir::new().unwrap(),
            _lock: lock,
        }
    }

    fn set(&mut self, key: &'static str, value: &str) {
        self.guards.push(EnvVarGuard::set(key, value));
    }

    fn write(&self, name: &str, contents: &str) -> std::path::PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    /// A loader that never picks up a stray `.env` from the working tree.
    fn loader(&self) -> ConfigLoader {
        ConfigLoader::new().without_env_file()
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }
}

#[test]
fn environment_only_load_uses_defaults() {
    let sandbox = Sandbox::new();

    let load = sandbox.loader().load().unwrap();
    let config = load.config;
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.store.capacity, 1000);
    assert_eq!(config.orchestrator.engine_timeout, Duration::from_secs(5));
    assert_eq!(config.engines.len(), 3);
    assert!(config.metadata.config_path.is_none());
    assert!(!config.metadata.env_file_loaded);
    assert!(
        load.warnings
            .items
            .iter()
            .any(|w| w.message.contains("No pactest.toml"))
    );
}

#[test]
fn file_values_apply_and_env_overrides_them() {
    let mut sandbox = Sandbox::new();
    let path = sandbox.write(
        "pactest.toml",
        r#"
        [server]
        host = "127.0.0.1"
        port = 9000
        public_url = "http://pactest.internal:9000/"

        [store]
        capacity = 50

        [orchestrator]
        engine_timeout = "2s"

        [[engines]]
        name = "v8"
        url = "http://v8.internal:8081/"
        flags = ["evaluation", "src_ip"]
        "#,
    );
    sandbox.set("MAX_CACHE", "7");
    sandbox.set("ENGINE_TIMEOUT", "250ms");

    let load = sandbox.loader().with_config_path(&path).load().unwrap();
    let config = load.config;
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.server.public_url.as_str(), "http://pactest.internal:9000/");
    assert_eq!(config.store.capacity, 7);
    assert_eq!(config.orchestrator.engine_timeout, Duration::from_millis(250));
    assert_eq!(config.engines.len(), 1);
    assert_eq!(config.engines[0].flags, vec![EngineFlag::Evaluation, EngineFlag::SrcIp]);
    assert_eq!(config.metadata.config_path.as_deref(), Some(path.as_path()));
    assert_eq!(config.metadata.engine_source, EngineSource::File(path.clone()));
    assert!(load.warnings.is_empty());
}

#[test]
fn engines_json_replaces_file_engines() {
    let mut sandbox = Sandbox::new();
    let path = sandbox.write(
        "pactest.toml",
        "[[engines]]\nname = \"v8\"\nurl = \"http://v8/\"\nflags = [\"evaluation\"]\n",
    );
    sandbox.set(
        "PACTEST_ENGINES_JSON",
        r#"[{"name":"winhttp","url":"http://win:8082/","flags":["evaluation"]},
            {"name":"eslint","url":"http://lint:8083/","flags":["validation"]}]"#,
    );

    let config = sandbox.loader().with_config_path(&path).load().unwrap().config;
    let names: Vec<_> = config.engines.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["winhttp", "eslint"]);
    assert_eq!(config.metadata.engine_source, EngineSource::Env);
    assert_eq!(config.engine_registry().unwrap().len(), 2);
}

#[test]
fn config_path_from_env_is_honoured() {
    let mut sandbox = Sandbox::new();
    let path = sandbox.write("custom.toml", "[server]\nport = 9191\n");
    sandbox.set("PACTEST_CONFIG_PATH", path.to_str().unwrap());

    let config = sandbox.loader().load().unwrap().config;
    assert_eq!(config.server.port, 9191);
    assert_eq!(config.server.public_url.as_str(), "http://127.0.0.1:9191/");
}

#[test]
fn explicit_missing_file_is_an_error() {
    let sandbox = Sandbox::new();
    let missing = sandbox.path().join("nope.toml");

    let err = sandbox.loader().with_config_path(&missing).load().unwrap_err();
    assert!(matches!(err, ConfigLoadError::MissingConfig { path } if path == missing));
}

#[test]
fn malformed_inputs_are_reported() {
    let mut sandbox = Sandbox::new();
    let path = sandbox.write("broken.toml", "[server\nport = ");
    let err = sandbox.loader().with_config_path(&path).load().unwrap_err();
    assert!(matches!(err, ConfigLoadError::Parse { .. }));

    sandbox.set("SERVER_PORT", "eighty");
    let err = sandbox.loader().load().unwrap_err();
    assert!(matches!(err, ConfigLoadError::InvalidEnv { var: "SERVER_PORT", .. }));
}

#[test]
fn bad_engine_json_is_rejected() {
    let mut sandbox = Sandbox::new();
    sandbox.set("PACTEST_ENGINES_JSON", r#"{"name":"v8"}"#);

    let err = sandbox.loader().load().unwrap_err();
    assert!(matches!(err, ConfigLoadError::EnginesJson { .. }));
}

#[test]
fn guard_rails_stop_the_load() {
    let mut sandbox = Sandbox::new();
    sandbox.set("MAX_CACHE", "0");

    let err = sandbox.loader().load().unwrap_err();
    assert!(matches!(
        err,
        ConfigLoadError::GuardRail(ConfigGuardRailError::ZeroCapacity)
    ));
}

#[test]
fn env_file_values_are_applied() {
    let sandbox = Sandbox::new();
    let env_file = sandbox.write(".env", "MAX_CACHE=42\nSERVER_PORT=8181\n");

    let config = ConfigLoader::new().with_env_file(&env_file).load().unwrap().config;
    assert!(config.metadata.env_file_loaded);
    assert_eq!(config.store.capacity, 42);
    assert_eq!(config.server.port, 8181);
}

#[test]
fn explicit_missing_env_file_is_an_error() {
    let sandbox = Sandbox::new();
    let missing = sandbox.path().join("absent.env");

    let err = ConfigLoader::new().with_env_file(&missing).load().unwrap_err();
    assert!(matches!(err, ConfigLoadError::EnvFileIo { path, .. } if path == missing));
}
