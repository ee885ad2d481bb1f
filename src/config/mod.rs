// Configuration module
// Author: kelexine (https://github.com/kelexine)

mod models;

pub use models::*;

use crate::error::{HeadshotError, Result};
use config::{Config, Environment, File};
use std::path::PathBuf;

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. CLI arguments (highest, applied by the caller)
    /// 2. Environment variables
    /// 3. Config file
    /// 4. Defaults (lowest)
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let path = config_path
            .map(str::to_string)
            .unwrap_or_else(Self::default_config_path);

        let config = Config::builder()
            // Start with defaults
            .add_source(Config::try_from(&Self::default())?)
            // Load from config file if it exists
            .add_source(File::with_name(&path).required(config_path.is_some()))
            // Override with environment variables (e.g. HEADSHOT_GEMINI__MODEL)
            .add_source(
                Environment::with_prefix("HEADSHOT")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| HeadshotError::Config(e.to_string()))?;

        let mut app_config: AppConfig = config
            .try_deserialize()
            .map_err(|e| HeadshotError::Config(e.to_string()))?;

        if app_config.gemini.api_key.is_empty() {
            if let Ok(key) = std::env::var("GEMINI_API_KEY") {
                app_config.gemini.api_key = key;
            }
        }

        Ok(app_config)
    }

    /// Fail fast on settings the service cannot run without.
    pub fn validate(&self) -> Result<()> {
        if self.gemini.api_key.trim().is_empty() {
            return Err(HeadshotError::Config(
                "No Gemini API key configured (set gemini.api_key or GEMINI_API_KEY)".to_string(),
            ));
        }
        if self.gemini.timeout_seconds == 0 || self.gemini.probe_timeout_seconds == 0 {
            return Err(HeadshotError::Config(
                "Gemini timeouts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    fn default_config_path() -> String {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".headshot-forge")
            .join("config.toml")
            .to_string_lossy()
            .to_string()
    }
}
