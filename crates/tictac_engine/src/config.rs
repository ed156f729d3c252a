//! Engine configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tictac_rules::GameMode;
use tracing::{debug, info, instrument};

/// Tunable engine settings, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Seconds a player has for each move in standard mode.
    #[serde(default = "default_standard_turn_limit_secs")]
    standard_turn_limit_secs: u64,

    /// Seconds a player has for each move in ultimate mode.
    #[serde(default = "default_ultimate_turn_limit_secs")]
    ultimate_turn_limit_secs: u64,

    /// Number of rows the leaderboard returns by default.
    #[serde(default = "default_leaderboard_limit")]
    leaderboard_limit: usize,

    /// Display name recorded for the computer opponent.
    #[serde(default = "default_computer_name")]
    computer_name: String,
}

fn default_standard_turn_limit_secs() -> u64 {
    5
}

fn default_ultimate_turn_limit_secs() -> u64 {
    40
}

fn default_leaderboard_limit() -> usize {
    10
}

fn default_computer_name() -> String {
    "Computer".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            standard_turn_limit_secs: default_standard_turn_limit_secs(),
            ultimate_turn_limit_secs: default_ultimate_turn_limit_secs(),
            leaderboard_limit: default_leaderboard_limit(),
            computer_name: default_computer_name(),
        }
    }
}

impl EngineConfig {
    /// Per-turn allotment for the given mode.
    pub fn turn_limit(&self, mode: GameMode) -> chrono::Duration {
        let secs = match mode {
            GameMode::Standard => self.standard_turn_limit_secs,
            GameMode::Ultimate => self.ultimate_turn_limit_secs,
        };
        chrono::Duration::try_seconds(i64::try_from(secs).unwrap_or(i64::MAX))
            .unwrap_or(chrono::Duration::MAX)
    }

    /// Overrides the per-turn allotment for one mode.
    pub fn with_turn_limit_secs(mut self, mode: GameMode, secs: u64) -> Self {
        match mode {
            GameMode::Standard => self.standard_turn_limit_secs = secs,
            GameMode::Ultimate => self.ultimate_turn_limit_secs = secs,
        }
        self
    }

    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(
            standard_secs = config.standard_turn_limit_secs,
            ultimate_secs = config.ultimate_turn_limit_secs,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        if config.standard_turn_limit_secs == 0 || config.ultimate_turn_limit_secs == 0 {
            return Err(ConfigError::new("Turn limits must be at least one second"));
        }
        Ok(config)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.turn_limit(GameMode::Standard), chrono::Duration::seconds(5));
        assert_eq!(config.turn_limit(GameMode::Ultimate), chrono::Duration::seconds(40));
        assert_eq!(*config.leaderboard_limit(), 10);
        assert_eq!(config.computer_name(), "Computer");
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config = EngineConfig::from_toml("standard_turn_limit_secs = 7\n").unwrap();
        assert_eq!(*config.standard_turn_limit_secs(), 7);
        assert_eq!(*config.ultimate_turn_limit_secs(), 40);
    }

    #[test]
    fn test_zero_limit_rejected() {
        let err = EngineConfig::from_toml("ultimate_turn_limit_secs = 0\n").unwrap_err();
        assert!(err.message.contains("at least one second"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "leaderboard_limit = 3").unwrap();
        writeln!(file, "computer_name = \"Robo\"").unwrap();

        let config = EngineConfig::from_file(file.path()).unwrap();
        assert_eq!(*config.leaderboard_limit(), 3);
        assert_eq!(config.computer_name(), "Robo");
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = EngineConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(err.message.starts_with("Failed to read config file"));
    }
}
