//! Configuration for hosts that build an [`crate::Activator`] from a file.
//!
//! ```toml
//! role = "client"
//! foreign_role_constructors = "exclude"
//!
//! [logging]
//! level = "debug"
//! json_format = false
//! ```

use crate::error::ConfigError;
use crate::role::{ExecutionRole, ForeignRolePolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Default log level for serde deserialization
fn default_log_level() -> String {
    "info".to_string()
}

/// Activator configuration loaded from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivatorConfig {
    /// Role reported by the activator built from this configuration
    #[serde(default)]
    pub role: ExecutionRole,
    /// Treatment of constructors tagged for the other role
    #[serde(default)]
    pub foreign_role_constructors: ForeignRolePolicy,
    /// Logging configuration settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json_format: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

impl ActivatorConfig {
    /// Parses and validates configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ActivatorConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// If the file doesn't exist, writes the default configuration to `path`
    /// and returns it.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml_str(&content)
        } else {
            let default_config = ActivatorConfig::default();
            std::fs::write(path, default_config.to_toml_string()?)?;
            info!("Created default activator configuration: {}", path.display());
            Ok(default_config)
        }
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validates the configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level: {}. Must be one of: {valid_levels:?}",
                &self.logging.level
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ActivatorConfig::default();
        assert_eq!(config.role, ExecutionRole::Server);
        assert_eq!(config.foreign_role_constructors, ForeignRolePolicy::Exclude);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json_format);
    }

    #[test]
    fn test_parse_full_config() {
        let config = ActivatorConfig::from_toml_str(
            r#"
            role = "client"
            foreign_role_constructors = "allow"

            [logging]
            level = "debug"
            json_format = true
            "#,
        )
        .unwrap();

        assert_eq!(config.role, ExecutionRole::Client);
        assert_eq!(config.foreign_role_constructors, ForeignRolePolicy::Allow);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json_format);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ActivatorConfig::from_toml_str("").unwrap();
        assert_eq!(config.role, ExecutionRole::Server);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            ActivatorConfig::from_toml_str("role = \"observer\""),
            Err(ConfigError::ParseError(_))
        ));
        assert!(matches!(
            ActivatorConfig::from_toml_str("[logging]\nlevel = \"loud\""),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("activator.toml");

        let created = ActivatorConfig::load_from_file(&path).unwrap();
        assert!(path.exists());
        assert_eq!(created.role, ExecutionRole::Server);

        std::fs::write(&path, "role = \"client\"\n").unwrap();
        let loaded = ActivatorConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.role, ExecutionRole::Client);
    }
}
