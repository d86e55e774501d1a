use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/ask";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub endpoint: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    /// Like `load`, but falls back to defaults with a warning when the file is unreadable.
    pub fn load_or_default() -> Self {
        match Self::get_config_path() {
            Ok(path) => Self::load_or_default_from(&path),
            Err(e) => {
                tracing::warn!(error = %e, "no config directory, using defaults");
                Self::new()
            }
        }
    }

    pub fn load_or_default_from(path: &Path) -> Self {
        Self::load_from(path).unwrap_or_else(|e| {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "ignoring unreadable config, saved endpoint not used"
            );
            Self::new()
        })
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    pub fn save_endpoint(endpoint: &str) -> Result<()> {
        let mut config = Self::load_or_default();
        config.endpoint = Some(endpoint.to_string());
        config.save()
    }

    /// Endpoint to use: the explicit override, then the saved value, then the default.
    pub fn resolve_endpoint(&self, override_endpoint: Option<&str>) -> String {
        override_endpoint
            .map(str::to_string)
            .or_else(|| self.endpoint.clone())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
    }

    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("destinations-chat"))
    }

    pub fn get_config_path() -> Result<PathBuf> {
        Ok(Self::get_config_dir()?.join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, Config::new());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            endpoint: Some("https://api.example.com/prod/ask".into()),
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_load_invalid_json_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_load_or_default_falls_back_on_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ \"endpoint\": 42 }").unwrap();
        assert_eq!(Config::load_or_default_from(&path), Config::new());

        fs::write(&path, "{ \"endpoint\": \"http://saved/ask\" }").unwrap();
        assert_eq!(
            Config::load_or_default_from(&path).endpoint.as_deref(),
            Some("http://saved/ask")
        );
    }

    #[test]
    fn test_resolve_endpoint_precedence() {
        let saved = Config {
            endpoint: Some("http://saved/ask".into()),
        };
        assert_eq!(saved.resolve_endpoint(Some("http://flag/ask")), "http://flag/ask");
        assert_eq!(saved.resolve_endpoint(None), "http://saved/ask");
        assert_eq!(Config::new().resolve_endpoint(None), DEFAULT_ENDPOINT);
    }
}
