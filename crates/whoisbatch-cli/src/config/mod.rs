//! Configuration management.

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use whoisbatch_pipeline::PipelineConfig;

use crate::output::OutputFormat;

/// Overrides the config file location (used by tests and portable setups)
pub const CONFIG_PATH_ENV: &str = "WHOISBATCH_CONFIG";

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Paid-service token.
    pub api_key: Option<String>,

    /// Default output format.
    pub output_format: Option<OutputFormat>,

    /// Pipeline defaults; command-line flags take precedence.
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Get the config file path.
    pub fn path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let dirs = ProjectDirs::from("org", "whoisbatch", "whoisbatch")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from file.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Self = toml::from_str(&content)?;

        Ok(config)
    }

    /// Save configuration to file.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        Ok(())
    }

    /// Copy with the API key hidden, for display
    #[must_use]
    pub fn masked(&self) -> Self {
        Self {
            api_key: self.api_key.as_ref().map(|_| "****".to_string()),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            output_format = "csv"

            [pipeline]
            workers = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.output_format, Some(OutputFormat::Csv));
        assert!(config.api_key.is_none());
        assert_eq!(config.pipeline.workers, 2);
        assert_eq!(config.pipeline.politeness_delay_ms, 2500);
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let mut config = Config {
            api_key: Some("token".into()),
            ..Config::default()
        };
        config.pipeline.use_rdap = true;

        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.api_key.as_deref(), Some("token"));
        assert!(back.pipeline.use_rdap);
    }

    #[test]
    fn test_masked_hides_key() {
        let config = Config {
            api_key: Some("secret-token".into()),
            ..Config::default()
        };
        assert_eq!(config.masked().api_key.as_deref(), Some("****"));
    }
}
