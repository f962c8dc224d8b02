//! Configuration loading and validation.
//!
//! Settings come from an optional TOML file, overridden by `PAIRING_*`
//! environment variables (e.g. `PAIRING_DATA_DIR`, `PAIRING_TEAM_NAMES=MK,Bedford`,
//! `PAIRING_SEARCH__MAX_STEPS`).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::engine::PairingOptions;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to load settings: {0}")]
    LoadError(#[from] ::config::ConfigError),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Limits for the pairing search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_max_steps")]
    pub max_steps: u64,

    /// Wall-clock limit in seconds; unset means no limit.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

fn default_max_steps() -> u64 {
    1_000_000
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            timeout_seconds: None,
        }
    }
}

impl SearchConfig {
    pub fn pairing_options(&self) -> PairingOptions {
        PairingOptions {
            max_steps: self.max_steps,
            timeout: self.timeout_seconds.map(Duration::from_secs),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// The two teams in the league; the first is listed first in every pairing.
    #[serde(default = "default_team_names")]
    pub team_names: Vec<String>,

    /// Wins credited to a player for a bye.
    #[serde(default)]
    pub bye_wins: u32,

    #[serde(default)]
    pub search: SearchConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_team_names() -> Vec<String> {
    vec!["MK".to_string(), "Bedford".to_string()]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            team_names: default_team_names(),
            bye_wins: 0,
            search: SearchConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an optional TOML file layered with `PAIRING_*` environment variables.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let settings = ::config::Config::builder()
            .add_source(
                ::config::File::from(path)
                    .format(::config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                ::config::Environment::with_prefix("PAIRING")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("team_names"),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// The configured spelling of `team`, matched case-insensitively.
    pub fn team_name(&self, team: &str) -> Option<&str> {
        self.team_names
            .iter()
            .map(|t| t.trim())
            .find(|t| t.eq_ignore_ascii_case(team.trim()))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.team_names.len() != 2 {
            return Err(ConfigError::ValidationError(format!(
                "Exactly two team names are required, got {}",
                self.team_names.len()
            )));
        }

        if self.team_names.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "Team names must not be empty".to_string(),
            ));
        }

        if self.team_names[0].trim().eq_ignore_ascii_case(self.team_names[1].trim()) {
            return Err(ConfigError::ValidationError(
                "Team names must be different".to_string(),
            ));
        }

        if self.search.max_steps == 0 {
            return Err(ConfigError::ValidationError(
                "Search max_steps must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
