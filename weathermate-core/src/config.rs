use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::WeatherError;
use crate::history::DEFAULT_HISTORY_CAP;
use crate::model::Units;

/// Environment variable that overrides any key stored in the config file.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// units = "metric"
/// default_city = "London"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OpenWeatherMap API key; `OPENWEATHER_API_KEY` takes precedence.
    pub api_key: Option<String>,

    pub units: Units,

    /// City used when a command is given no city argument.
    pub default_city: Option<String>,

    /// Retained readings per city before oldest-eviction.
    pub history_cap: usize,

    /// HTTP timeout for every provider request, in seconds.
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            units: Units::Metric,
            default_city: None,
            history_cap: DEFAULT_HISTORY_CAP,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load config from disk, or return the defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Path to the persisted search-history file.
    pub fn history_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().join("history.json"))
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "weathermate", "weathermate")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }

    /// The API key to use: environment first, then the config file.
    ///
    /// Missing key is the one startup misconfiguration that aborts a fetch.
    pub fn resolved_api_key(&self) -> Result<String, WeatherError> {
        pick_api_key(std::env::var(API_KEY_ENV).ok(), self.api_key.as_deref())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn pick_api_key(env: Option<String>, file: Option<&str>) -> Result<String, WeatherError> {
    if let Some(key) = env {
        if !key.trim().is_empty() {
            return Ok(key);
        }
    }
    file.map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .ok_or(WeatherError::MissingApiKey)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = Config::default();
        assert_eq!(cfg.units, Units::Metric);
        assert_eq!(cfg.history_cap, DEFAULT_HISTORY_CAP);
        assert_eq!(cfg.timeout(), Duration::from_secs(5));
        assert!(cfg.api_key.is_none());
        assert!(cfg.default_city.is_none());
    }

    #[test]
    fn env_key_overrides_file_key() {
        let key = pick_api_key(Some("ENV_KEY".into()), Some("FILE_KEY")).unwrap();
        assert_eq!(key, "ENV_KEY");
    }

    #[test]
    fn blank_env_key_falls_back_to_file() {
        let key = pick_api_key(Some("   ".into()), Some("FILE_KEY")).unwrap();
        assert_eq!(key, "FILE_KEY");
    }

    #[test]
    fn missing_key_everywhere_is_an_error() {
        let err = pick_api_key(None, None).unwrap_err();
        assert!(matches!(err, WeatherError::MissingApiKey));
        assert!(err.to_string().contains("weathermate configure"));
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg: Config = toml::from_str(r#"api_key = "KEY""#).unwrap();
        assert_eq!(cfg.api_key.as_deref(), Some("KEY"));
        assert_eq!(cfg.units, Units::Metric);
        assert_eq!(cfg.history_cap, DEFAULT_HISTORY_CAP);
    }

    #[test]
    fn units_round_trip_through_toml() {
        let mut cfg = Config::default();
        cfg.units = Units::Imperial;
        cfg.default_city = Some("Chicago".into());

        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.units, Units::Imperial);
        assert_eq!(parsed.default_city.as_deref(), Some("Chicago"));
    }
}
