//! JSON Configuration Management
//!
//! Reads and writes the application configuration file. Credentials can be
//! supplied through the environment instead of the file; those overrides
//! apply to the effective configuration only and are never saved.

use std::fs;
use std::path::{Path, PathBuf};

use crate::models::settings::AppConfig;
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::{app_dir, config_path, ensure_dir};

pub const ENV_CORTEX_TOKEN: &str = "SALES_ASSISTANT_CORTEX_TOKEN";
pub const ENV_ACCOUNT_URL: &str = "SALES_ASSISTANT_ACCOUNT_URL";
pub const ENV_HERE_API_KEY: &str = "HERE_API_KEY";

/// Configuration service for managing app settings
#[derive(Debug)]
pub struct ConfigService {
    config_path: PathBuf,
    config: AppConfig,
}

impl ConfigService {
    /// Load `~/.sales-assistant/config.json`, creating it with defaults if missing
    pub fn new() -> AppResult<Self> {
        ensure_dir(&app_dir()?)?;
        Self::open(config_path()?)
    }

    /// Load configuration from an explicit path, creating it with defaults if missing
    pub fn open(config_path: PathBuf) -> AppResult<Self> {
        let config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            if let Some(parent) = config_path.parent() {
                ensure_dir(parent)?;
            }
            let default_config = AppConfig::default();
            Self::save_to_file(&config_path, &default_config)?;
            default_config
        };

        tracing::debug!(path = %config_path.display(), "configuration loaded");
        Ok(Self {
            config_path,
            config,
        })
    }

    /// Load configuration from a file
    fn load_from_file(path: &Path) -> AppResult<AppConfig> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.validate().map_err(AppError::validation)?;
        Ok(config)
    }

    /// Save configuration to a file with pretty formatting
    fn save_to_file(path: &Path, config: &AppConfig) -> AppResult<()> {
        config.validate().map_err(AppError::validation)?;
        let content = serde_json::to_string_pretty(config)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// The configuration as stored on disk
    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    /// The stored configuration with environment overrides applied
    pub fn effective_config(&self) -> AppConfig {
        apply_overrides(self.config.clone(), |key| std::env::var(key).ok())
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Replace and persist the configuration
    pub fn update_config(&mut self, config: AppConfig) -> AppResult<()> {
        Self::save_to_file(&self.config_path, &config)?;
        self.config = config;
        Ok(())
    }

    /// Reload configuration from disk
    pub fn reload(&mut self) -> AppResult<()> {
        self.config = Self::load_from_file(&self.config_path)?;
        Ok(())
    }
}

/// Overlay credentials from `lookup` (normally the process environment).
/// Empty values are ignored.
pub fn apply_overrides<F>(mut config: AppConfig, lookup: F) -> AppConfig
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(token) = get(ENV_CORTEX_TOKEN) {
        config.cortex.token = Some(token);
    }
    if let Some(url) = get(ENV_ACCOUNT_URL) {
        config.cortex.account_url = url;
    }
    if let Some(key) = get(ENV_HERE_API_KEY) {
        config.here.api_key = Some(key);
    }
    config
}
