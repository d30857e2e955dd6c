//! Configuration management for the Tripmate client
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::TripmateError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the Tripmate client
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripmateConfig {
    /// Backend API configuration
    #[serde(default)]
    pub api: ApiConfig,
    /// Token handling configuration
    #[serde(default)]
    pub auth: AuthConfig,
    /// Session storage configuration
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the backend, without the `/api/v1` prefix
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_api_timeout")]
    pub timeout_seconds: u32,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Token handling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Refresh proactively when the access token expires within this window
    #[serde(default = "default_expiry_buffer")]
    pub expiry_buffer_seconds: u32,
}

/// Where session tokens are kept
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// `memory` (process lifetime) or `persistent` (on disk)
    #[serde(default = "default_session_backend")]
    pub backend: String,
    /// Directory for the persistent session store
    #[serde(default = "default_session_location")]
    pub location: String,
    /// How long persisted session entries live, in hours
    #[serde(default = "default_session_ttl")]
    pub ttl_hours: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_api_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_api_timeout() -> u32 {
    30
}

fn default_user_agent() -> String {
    format!("Tripmate/{}", crate::VERSION)
}

fn default_expiry_buffer() -> u32 {
    60
}

fn default_session_backend() -> String {
    "persistent".to_string()
}

fn default_session_location() -> String {
    "~/.cache/tripmate/session".to_string()
}

fn default_session_ttl() -> u32 {
    24 * 7
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            timeout_seconds: default_api_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            expiry_buffer_seconds: default_expiry_buffer(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: default_session_backend(),
            location: default_session_location(),
            ttl_hours: default_session_ttl(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl SessionConfig {
    /// Session directory with a leading `~` expanded to the home directory
    #[must_use]
    pub fn resolved_location(&self) -> PathBuf {
        match self.location.strip_prefix("~/") {
            Some(rest) => dirs::home_dir()
                .map(|home| home.join(rest))
                .unwrap_or_else(|| PathBuf::from(rest)),
            None => PathBuf::from(&self.location),
        }
    }

    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.backend == "persistent"
    }
}

impl TripmateConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides such as TRIPMATE__API__BASE_URL
        builder = builder.add_source(
            Environment::with_prefix("TRIPMATE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: TripmateConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tripmate").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.api.base_url.is_empty() {
            self.api.base_url = default_api_base_url();
        }
        if self.api.timeout_seconds == 0 {
            self.api.timeout_seconds = default_api_timeout();
        }
        if self.api.user_agent.is_empty() {
            self.api.user_agent = default_user_agent();
        }
        if self.session.backend.is_empty() {
            self.session.backend = default_session_backend();
        }
        if self.session.location.is_empty() {
            self.session.location = default_session_location();
        }
        if self.session.ttl_hours == 0 {
            self.session.ttl_hours = default_session_ttl();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.api.timeout_seconds > 300 {
            return Err(TripmateError::config("API timeout cannot exceed 300 seconds").into());
        }

        if self.auth.expiry_buffer_seconds > 3600 {
            return Err(
                TripmateError::config("Token expiry buffer cannot exceed 3600 seconds").into(),
            );
        }

        if self.session.ttl_hours > 24 * 90 {
            return Err(TripmateError::config("Session TTL cannot exceed 90 days").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TripmateError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TripmateError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let valid_backends = ["memory", "persistent"];
        if !valid_backends.contains(&self.session.backend.as_str()) {
            return Err(TripmateError::config(format!(
                "Invalid session backend '{}'. Must be one of: {}",
                self.session.backend,
                valid_backends.join(", ")
            ))
            .into());
        }

        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            return Err(
                TripmateError::config("API base URL must be a valid HTTP or HTTPS URL").into(),
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = TripmateConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.auth.expiry_buffer_seconds, 60);
        assert_eq!(config.session.backend, "persistent");
        assert_eq!(config.logging.level, "warn");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = TripmateConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = TripmateConfig::default();
        config.api.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_config_validation_base_url() {
        let mut config = TripmateConfig::default();
        config.api.base_url = "ftp://tripmate".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_defaults_fills_empty_values() {
        let mut config = TripmateConfig::default();
        config.api.base_url.clear();
        config.session.ttl_hours = 0;
        config.apply_defaults();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.session.ttl_hours, 24 * 7);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[api]\nbase_url = \"https://api.tripmate.example\"\n\n[auth]\nexpiry_buffer_seconds = 120\n\n[session]\nbackend = \"memory\""
        )
        .unwrap();

        let config = TripmateConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.api.base_url, "https://api.tripmate.example");
        assert_eq!(config.auth.expiry_buffer_seconds, 120);
        assert!(!config.session.is_persistent());
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_resolved_location_expands_home() {
        let session = SessionConfig::default();
        let path = session.resolved_location();
        assert!(path.ends_with(".cache/tripmate/session"));
        assert!(!path.to_string_lossy().starts_with('~'));
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = TripmateConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("tripmate"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
