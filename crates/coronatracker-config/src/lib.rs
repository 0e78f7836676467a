//! Configuration for the coronatracker CLI.
//!
//! A flat TOML file, `CORONATRACKER_*` environment overrides, and the
//! translation to `coronatracker_core::TrackerConfig`. The CLI applies its
//! own flag overrides on top of the loaded [`Config`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use coronatracker_core::TrackerConfig;
use coronatracker_core::config::{DEFAULT_API_URL, DEFAULT_COUNTRY};

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "CORONATRACKER_";

/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "CORONATRACKER_CONFIG";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Statistics API root.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Country for the local summary.
    #[serde(default = "default_country")]
    pub country: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Minutes before cached data counts as stale.
    #[serde(default = "default_refresh_threshold")]
    pub refresh_threshold: u64,

    /// Output format: "table", "json", or "plain".
    #[serde(default = "default_output")]
    pub output: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            country: default_country(),
            timeout: default_timeout(),
            refresh_threshold: default_refresh_threshold(),
            output: default_output(),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}
fn default_country() -> String {
    DEFAULT_COUNTRY.into()
}
fn default_timeout() -> u64 {
    30
}
fn default_refresh_threshold() -> u64 {
    30
}
fn default_output() -> String {
    "table".into()
}

impl Config {
    /// Validate and build the runtime configuration.
    pub fn to_tracker_config(&self) -> Result<TrackerConfig, ConfigError> {
        let api_url: url::Url = self.api_url.parse().map_err(|_| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {}", self.api_url),
        })?;

        if self.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }

        let country = self.country.trim();
        if country.is_empty() {
            return Err(ConfigError::Validation {
                field: "country".into(),
                reason: "must not be empty".into(),
            });
        }

        Ok(TrackerConfig {
            api_url,
            timeout: Duration::from_secs(self.timeout),
            refresh_threshold: Duration::from_secs(self.refresh_threshold.saturating_mul(60)),
            country: country.to_owned(),
        })
    }
}

impl Config {
    /// Keys accepted by [`set`](Self::set).
    pub const KEYS: [&'static str; 5] = ["api_url", "country", "timeout", "refresh_threshold", "output"];

    /// Set one value by key, validating numbers and output formats.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "api_url" => self.api_url = value.to_owned(),
            "country" => self.country = value.to_owned(),
            "timeout" => self.timeout = parse_number(key, value)?,
            "refresh_threshold" => self.refresh_threshold = parse_number(key, value)?,
            "output" => {
                if !["table", "json", "plain"].contains(&value) {
                    return Err(ConfigError::Validation {
                        field: key.into(),
                        reason: format!("expected 'table', 'json', or 'plain', got '{value}'"),
                    });
                }
                self.output = value.to_owned();
            }
            other => {
                return Err(ConfigError::Validation {
                    field: other.into(),
                    reason: format!("unknown key, expected one of: {}", Self::KEYS.join(", ")),
                });
            }
        }
        Ok(())
    }
}

fn parse_number(field: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse().map_err(|_| ConfigError::Validation {
        field: field.into(),
        reason: format!("expected a whole number, got '{value}'"),
    })
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `CORONATRACKER_CONFIG`, then platform
/// conventions.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }

    ProjectDirs::from("", "", "coronatracker").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("coronatracker");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Defaults, then the TOML file at `path`, then the environment.
pub fn figment_for(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]))
}

/// Load the Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the Config from `path` + environment. A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    Ok(figment_for(path).extract()?)
}

/// Load defaults + the TOML file only, ignoring the environment.
///
/// Used when editing the file so environment overrides are not written back.
pub fn load_file_config(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path));
    Ok(figment.extract()?)
}

/// Load config, falling back to defaults on any error.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
