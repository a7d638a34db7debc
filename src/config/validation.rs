//! Configuration validation logic
//!
//! Every section validates itself; `Settings::validate` reports the first
//! failure it finds.

use crate::config::error::ConfigError;
use crate::config::settings::{
    FileSettings, FirebaseConfig, LoggerSettings, ProviderConfig, ServerConfig, Settings,
};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

impl ServerConfig {
    /// Validate server configuration
    ///
    /// # Validation Rules
    /// - Host must not be empty
    /// - Port must be between 1 and 65535
    /// - Request timeout must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::validation(
                "server.host",
                "Host must not be empty.",
            ));
        }

        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl FirebaseConfig {
    /// Validate credential source configuration
    ///
    /// The credential itself is not checked here: it is validated on every
    /// relay attempt so a broken credential never prevents startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = self.credential_env.trim();
        if name.is_empty() {
            return Err(ConfigError::validation(
                "firebase.credential_env",
                "Credential environment variable name must not be empty.",
            ));
        }

        if name.contains('=') || name.contains('\0') {
            return Err(ConfigError::validation(
                "firebase.credential_env",
                format!("'{}' is not a valid environment variable name.", name),
            ));
        }

        Ok(())
    }
}

impl ProviderConfig {
    /// Validate outbound provider configuration
    ///
    /// # Validation Rules
    /// - Base URL must use http or https
    /// - Timeouts must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fcm_base_url.starts_with("https://") || self.fcm_base_url.starts_with("http://"))
        {
            return Err(ConfigError::validation(
                "provider.fcm_base_url",
                format!(
                    "Invalid FCM base URL '{}'. Expected an http:// or https:// URL.",
                    self.fcm_base_url
                ),
            ));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "provider.request_timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        if self.connect_timeout == 0 {
            return Err(ConfigError::validation(
                "provider.connect_timeout",
                "Connect timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.file.format",
                format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            ));
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.level",
                format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            ));
        }

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        self.file.validate()
    }
}

impl Settings {
    /// Validate all configuration settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.logger.validate()?;
        self.firebase.validate()?;
        self.provider.validate()?;
        Ok(())
    }
}
