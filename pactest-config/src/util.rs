use std::{str::FromStr, time::Duration};

use crate::loader::error::ConfigLoadError;

/// Reads `name`, treating unset and whitespace-only values alike.
pub fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Reads and parses `name`; a value that does not parse is an error rather
/// than silently ignored.
pub fn parse_var<T>(name: &'static str) -> Result<Option<T>, ConfigLoadError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    non_empty_var(name)
        .map(|raw| {
            raw.parse::<T>().map_err(|err| ConfigLoadError::InvalidEnv {
                var: name,
                value: raw.clone(),
                reason: err.to_string(),
            })
        })
        .transpose()
}

/// Parses a human-friendly duration such as `5s`, `750ms` or `1m 30s`.
/// A bare integer is taken as seconds.
pub fn parse_duration(raw: &str) -> Result<Duration, humantime::DurationError> {
    let trimmed = raw.trim();
    match trimmed.parse::<u64>() {
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(_) => humantime::parse_duration(trimmed),
    }
}

pub fn parse_duration_var(name: &'static str) -> Result<Option<Duration>, ConfigLoadError> {
    non_empty_var(name)
        .map(|raw| {
            parse_duration(&raw).map_err(|err| ConfigLoadError::InvalidEnv {
                var: name,
                value: raw.clone(),
                reason: err.to_string(),
            })
        })
        .transpose()
}
