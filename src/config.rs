use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Environment variable overriding the configured backend address.
pub const BASE_URL_ENV: &str = "HIKESMART_API_URL";

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Config {
    pub api_base_url: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Resolve the backend base URL once at startup: environment variable
    /// first, then the config file, then the local default.
    pub fn resolve_base_url(&self) -> String {
        std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| self.api_base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("hikesmart").join("config.json"))
    }
}
