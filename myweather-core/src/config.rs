use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::model::{Coordinate, DEFAULT_ICON_URL_TEMPLATE};

/// Environment variable that takes precedence over `api_key` in the file.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Coordinate used when location permission is denied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallbackConfig {
    pub lat: f64,
    pub lon: f64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self { lat: 37.517742, lon: 126.886463 }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// lang = "kr"
///
/// [fallback]
/// lat = 37.517742
/// lon = 126.886463
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: String,
    pub icon_url_template: String,
    pub units: String,
    pub lang: String,
    pub exclude: String,
    pub fallback: FallbackConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openweathermap.org/data/2.5/weather".to_string(),
            icon_url_template: DEFAULT_ICON_URL_TEMPLATE.to_string(),
            units: "metric".to_string(),
            lang: "kr".to_string(),
            exclude: "current".to_string(),
            fallback: FallbackConfig::default(),
        }
    }
}

impl Config {
    /// Load config from the platform config dir, or defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config dir, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "myweather", "myweather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// API key from the environment, falling back to the config file.
    pub fn resolve_api_key(&self) -> Result<String> {
        let from_env = std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty());
        self.api_key_with_override(from_env)
    }

    fn api_key_with_override(&self, override_key: Option<String>) -> Result<String> {
        override_key
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
            .ok_or_else(|| {
                anyhow!(
                    "No OpenWeather API key configured.\n\
                     Hint: run `myweather configure` or set {API_KEY_ENV}."
                )
            })
    }

    pub fn fallback_coordinate(&self) -> Result<Coordinate> {
        Coordinate::new(self.fallback.lat, self.fallback.lon)
            .context("Invalid fallback coordinate in configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_openweather_current_endpoint() {
        let cfg = Config::default();
        assert_eq!(cfg.base_url, "https://api.openweathermap.org/data/2.5/weather");
        assert_eq!(cfg.units, "metric");
        assert_eq!(cfg.lang, "kr");
        assert_eq!(cfg.exclude, "current");

        let fallback = cfg.fallback_coordinate().expect("default fallback is valid");
        assert_eq!(fallback.lat(), 37.517742);
        assert_eq!(fallback.lon(), 126.886463);
    }

    #[test]
    fn missing_api_key_has_hint() {
        let cfg = Config::default();
        let err = cfg.api_key_with_override(None).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No OpenWeather API key configured"));
        assert!(msg.contains("myweather configure"));
    }

    #[test]
    fn override_key_wins_over_file_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        assert_eq!(cfg.api_key_with_override(None).unwrap(), "FILE_KEY");
        assert_eq!(
            cfg.api_key_with_override(Some("ENV_KEY".into())).unwrap(),
            "ENV_KEY"
        );
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.fallback = FallbackConfig { lat: 35.1796, lon: 129.0756 };
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api_key.as_deref(), Some("KEY"));
        assert_eq!(loaded.fallback, cfg.fallback);
        assert_eq!(loaded.lang, "kr");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "lang = \"en\"\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.lang, "en");
        assert_eq!(cfg.units, "metric");
        assert_eq!(cfg.fallback, FallbackConfig::default());
    }

    #[test]
    fn invalid_fallback_is_reported() {
        let mut cfg = Config::default();
        cfg.fallback.lat = 123.0;
        let err = cfg.fallback_coordinate().unwrap_err();
        assert!(err.to_string().contains("Invalid fallback coordinate"));
    }
}
