//! Application-level configuration loading: history size and round limits.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "SCRAMBLE_CONFIG_PATH";

const DEFAULT_HISTORY_LIMIT: usize = 10;
const DEFAULT_HOLE_COUNT: u8 = 18;
const DEFAULT_MAX_HOLES: u8 = 36;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Number of completed games returned by the history listing.
    pub history_limit: usize,
    /// Hole count used when a new game does not specify one.
    pub default_hole_count: u8,
    /// Largest hole count a game may have.
    pub max_holes: u8,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(app_config) => {
                    info!(
                        path = %path.display(),
                        history_limit = app_config.history_limit,
                        max_holes = app_config.max_holes,
                        "loaded config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<RawConfig>(contents).map(Into::into)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            default_hole_count: DEFAULT_HOLE_COUNT,
            max_holes: DEFAULT_MAX_HOLES,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    history_limit: Option<usize>,
    #[serde(default)]
    default_hole_count: Option<u8>,
    #[serde(default)]
    max_holes: Option<u8>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let max_holes = value
            .max_holes
            .filter(|max| *max > 0)
            .unwrap_or(DEFAULT_MAX_HOLES);
        let default_hole_count = value
            .default_hole_count
            .filter(|count| (1..=max_holes).contains(count))
            .unwrap_or(DEFAULT_HOLE_COUNT.min(max_holes));
        Self {
            history_limit: value.history_limit.unwrap_or(DEFAULT_HISTORY_LIMIT),
            default_hole_count,
            max_holes,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_use_defaults() {
        let config = AppConfig::from_json("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.history_limit, 10);
        assert_eq!(config.max_holes, 36);
    }

    #[test]
    fn default_hole_count_stays_within_max() {
        let config =
            AppConfig::from_json(r#"{ "history_limit": 5, "max_holes": 9, "default_hole_count": 18 }"#)
                .unwrap();
        assert_eq!(config.history_limit, 5);
        assert_eq!(config.max_holes, 9);
        assert_eq!(config.default_hole_count, 9);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(AppConfig::from_json("{ history_limit: ").is_err());
    }
}
