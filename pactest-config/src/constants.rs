use std::time::Duration;

use pactest_core::engine::EngineFlag;

pub const ENV_CONFIG_PATH: &str = "PACTEST_CONFIG_PATH";
pub const ENV_SERVER_HOST: &str = "SERVER_HOST";
pub const ENV_SERVER_PORT: &str = "SERVER_PORT";
pub const ENV_PUBLIC_URL: &str = "PACTEST_PUBLIC_URL";
pub const ENV_MAX_CACHE: &str = "MAX_CACHE";
pub const ENV_ENGINE_TIMEOUT: &str = "ENGINE_TIMEOUT";
pub const ENV_ENGINES_JSON: &str = "PACTEST_ENGINES_JSON";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_STORE_CAPACITY: usize = pactest_core::pac::DEFAULT_CAPACITY;
pub const DEFAULT_ENGINE_TIMEOUT: Duration = pactest_core::eval::DEFAULT_ENGINE_TIMEOUT;

/// The reference engines shipped alongside the server: `(name, url, flags)`.
pub const DEFAULT_ENGINES: &[(&str, &str, &[EngineFlag])] = &[
    (
        "v8",
        "http://127.0.0.1:8081/",
        &[EngineFlag::Evaluation, EngineFlag::SrcIp],
    ),
    ("winhttp", "http://127.0.0.1:8082/", &[EngineFlag::Evaluation]),
    ("eslint", "http://127.0.0.1:8083/", &[EngineFlag::Validation]),
];
