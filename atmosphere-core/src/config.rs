use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{
    geo::{Coordinates, GeolocationError},
    provider::weatherstack::DEFAULT_BASE_URL};

/// Environment variable that overrides the stored access key.
pub const ACCESS_KEY_ENV: &str = "WEATHERSTACK_ACCESS_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// access_key = "..."
/// home = "51.5072,-0.1276"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Weatherstack access key.
    pub access_key: Option<String>,

    /// Override of the provider base URL, e.g. for a proxy.
    pub base_url: Option<String>,

    /// `lat,lon` used for "current location" lookups.
    pub home: Option<String>,
}

impl Config {
    /// Access key from the environment, falling back to the config file.
    pub fn access_key(&self) -> Result<String> {
        let from_env = std::env::var(ACCESS_KEY_ENV).ok();
        Self::pick_access_key(from_env, self.access_key.as_deref())
    }

    fn pick_access_key(from_env: Option<String>, from_file: Option<&str>) -> Result<String> {
        from_env
            .filter(|k| !k.trim().is_empty())
            .or_else(|| from_file.filter(|k| !k.trim().is_empty()).map(str::to_owned))
            .ok_or_else(|| {
                anyhow!(
                    "No Weatherstack access key configured.\n\
                     Hint: run `atmosphere configure` or set {ACCESS_KEY_ENV}."
                )
            })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Parsed `home`; `Ok(None)` when no home is configured.
    pub fn home_coordinates(&self) -> std::result::Result<Option<Coordinates>, GeolocationError> {
        self.home.as_deref().map(str::parse).transpose()
    }

    /// Store the access key, ignoring surrounding whitespace.
    pub fn set_access_key(&mut self, access_key: &str) {
        self.access_key = Some(access_key.trim().to_string());
    }

    pub fn set_home(&mut self, home: Coordinates) {
        self.home = Some(home.to_query());
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
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
        let dirs = ProjectDirs::from("dev", "atmosphere", "atmosphere")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_key_errors_when_not_set() {
        let err = Config::pick_access_key(None, None).unwrap_err();
        let msg = err.to_string();

        assert!(msg.contains("No Weatherstack access key configured"));
        assert!(msg.contains("Hint: run `atmosphere configure`"));
    }

    #[test]
    fn environment_key_wins_over_file() {
        let key = Config::pick_access_key(Some("ENV_KEY".into()), Some("FILE_KEY")).unwrap();
        assert_eq!(key, "ENV_KEY");
    }

    #[test]
    fn blank_keys_are_ignored() {
        let key = Config::pick_access_key(Some("   ".into()), Some("FILE_KEY")).unwrap();
        assert_eq!(key, "FILE_KEY");
        assert!(Config::pick_access_key(None, Some("")).is_err());
    }

    #[test]
    fn base_url_defaults_to_weatherstack() {
        let mut cfg = Config::default();
        assert_eq!(cfg.base_url(), "https://api.weatherstack.com");

        cfg.base_url = Some("http://localhost:9000".into());
        assert_eq!(cfg.base_url(), "http://localhost:9000");
    }

    #[test]
    fn toml_roundtrip_keeps_fields() {
        let mut cfg = Config::default();
        cfg.set_access_key("  KEY  ");
        cfg.set_home(Coordinates { latitude: 51.5, longitude: -0.12 });

        let text = toml::to_string_pretty(&cfg).expect("serialize");
        let back: Config = toml::from_str(&text).expect("parse");

        assert_eq!(back.access_key.as_deref(), Some("KEY"));
        assert_eq!(back.home.as_deref(), Some("51.5,-0.12"));
        assert!(back.base_url.is_none());
    }

    #[test]
    fn home_coordinates_are_validated() {
        let cfg = Config { home: Some("somewhere".into()), ..Config::default() };
        assert_eq!(cfg.home_coordinates(), Err(GeolocationError::PositionUnavailable));

        let cfg = Config { home: Some("40.7,-74.0".into()), ..Config::default() };
        let c = cfg.home_coordinates().expect("valid").expect("home set");
        assert_eq!(c.latitude, 40.7);

        assert_eq!(Config::default().home_coordinates(), Ok(None));
    }
}
