//! Configuration loader for fcm-relay
//!
//! This module provides the `ConfigLoader` struct that handles loading
//! configuration from multiple sources with proper precedence.

use std::io;
use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Environment variable for a specific configuration file
pub const CONFIG_FILE_ENV: &str = "FCM_RELAY_CONFIG_FILE";

/// Default configuration directory
const DEFAULT_CONFIG_DIR: &str = "config";

/// Environment variable prefix for configuration overrides
const ENV_PREFIX: &str = "FCM_RELAY";

/// Separator for nested configuration keys in environment variables
const ENV_SEPARATOR: &str = "__";

/// Dotenv files loaded before configuration, highest priority first.
const DOTENV_FILES: [&str; 2] = [".env.local", ".env"];

/// Loads `.env.local` then `.env` from the working directory.
///
/// See [`load_dotenv_from`].
pub fn load_dotenv() -> Vec<Result<PathBuf, ConfigError>> {
    load_dotenv_from(Path::new("."))
}

/// Loads `.env.local` then `.env` from `dir` into the process environment.
///
/// Variables already set are never overwritten, so the real environment
/// wins over `.env.local`, which wins over `.env`. Missing files are
/// skipped; every other failure is returned so it can be logged once the
/// logger is up.
///
/// # Returns
/// One entry per file found: its path, or why it could not be loaded
pub fn load_dotenv_from(dir: &Path) -> Vec<Result<PathBuf, ConfigError>> {
    DOTENV_FILES
        .iter()
        .filter_map(|name| {
            let path = dir.join(name);
            match dotenvy::from_path(&path) {
                Ok(()) => Some(Ok(path)),
                Err(dotenvy::Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => None,
                Err(source) => Some(Err(ConfigError::Dotenv {
                    path: path.display().to_string(),
                    source,
                })),
            }
        })
        .collect()
}

/// Configuration loader that handles layered configuration loading
///
/// The loader supports the following configuration sources (in order of priority):
/// 1. `default.toml` - Base default configuration (required)
/// 2. `{environment}.toml` - Environment-specific configuration (optional)
/// 3. `local.toml` - Local development overrides (optional)
/// 4. `FCM_RELAY_*` environment variables (highest priority)
#[derive(Debug)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    /// Specific configuration file path (if set, skips layered loading)
    config_file: Option<PathBuf>,
    environment: AppEnvironment,
}

impl ConfigLoader {
    /// Create a loader from the process environment
    ///
    /// Reads `FCM_RELAY_CONFIG_FILE` and `FCM_RELAY_APP_ENV`.
    pub fn new() -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            config_file: std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from),
            environment: AppEnvironment::from_env(),
        }
    }

    /// Use layered loading from `dir` instead of `./config`
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = dir.into();
        self
    }

    /// Load exactly one file instead of the layered set
    pub fn with_config_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.config_file = Some(file.into());
        self
    }

    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Load and validate configuration from all sources
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `default.toml` (or the single configured file) is not found
    /// - Configuration parsing fails
    /// - Configuration validation fails
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let config = self.build_config()?;
        let settings: Settings = config.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("Failed to deserialize configuration: {}", e))
        })?;

        settings.validate()?;

        Ok(settings)
    }

    fn build_config(&self) -> Result<Config, ConfigError> {
        let builder = Config::builder();

        let builder = match self.config_file {
            Some(ref config_file) => Self::add_file_source(builder, config_file, true)?,
            None => self.build_layered_config(builder)?,
        };

        // FCM_RELAY_SERVER__PORT -> server.port
        let builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true)
                .try_parsing(true),
        );

        builder.build().map_err(ConfigError::from)
    }

    fn build_layered_config(
        &self,
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let default_path = self.config_dir.join("default.toml");
        let builder = Self::add_file_source(builder, &default_path, true)?;

        let env_path = self
            .config_dir
            .join(format!("{}.toml", self.environment.as_str()));
        let builder = Self::add_file_source(builder, &env_path, false)?;

        let local_path = self.config_dir.join("local.toml");
        Self::add_file_source(builder, &local_path, false)
    }

    fn add_file_source(
        builder: ConfigBuilder<DefaultState>,
        path: &Path,
        required: bool,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        if required && !path.exists() {
            return Err(ConfigError::file_not_found(format!(
                "Required configuration file not found: {}",
                path.display()
            )));
        }

        Ok(builder.add_source(File::from(path).format(FileFormat::Toml).required(required)))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Tests touching process environment run one at a time
    pub(crate) static TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn setup_config_dir(files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        for (name, content) in files {
            fs::write(temp_dir.path().join(name), content).expect("Failed to write config file");
        }
        temp_dir
    }

    /// Restores touched environment variables on drop
    pub(crate) struct EnvGuard {
        vars_to_restore: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        pub(crate) fn new() -> Self {
            Self {
                vars_to_restore: Vec::new(),
            }
        }

        pub(crate) fn set(&mut self, key: &str, value: &str) {
            self.vars_to_restore
                .push((key.to_string(), std::env::var(key).ok()));
            unsafe {
                std::env::set_var(key, value);
            }
        }

        pub(crate) fn remove(&mut self, key: &str) {
            self.vars_to_restore
                .push((key.to_string(), std::env::var(key).ok()));
            unsafe {
                std::env::remove_var(key);
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, original_value) in self.vars_to_restore.iter().rev() {
                unsafe {
                    match original_value {
                        Some(value) => std::env::set_var(key, value),
                        None => std::env::remove_var(key),
                    }
                }
            }
        }
    }

    #[test]
    fn test_load_dotenv_skips_missing_files() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let dir = TempDir::new().unwrap();

        assert!(load_dotenv_from(dir.path()).is_empty());
    }

    #[test]
    fn test_load_dotenv_reports_unparsable_file() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        env.remove("FCM_RELAY_DOTENV_BROKEN");
        env.remove("FCM_RELAY_DOTENV_OK");

        let dir = setup_config_dir(&[
            (".env.local", "FCM_RELAY_DOTENV_BROKEN=\"\\x\"\n"),
            (".env", "FCM_RELAY_DOTENV_OK=1\n"),
        ]);

        let outcomes = load_dotenv_from(dir.path());
        assert_eq!(outcomes.len(), 2);

        match &outcomes[0] {
            Err(ConfigError::Dotenv { path, .. }) => assert!(path.ends_with(".env.local")),
            other => panic!("Expected Dotenv error, got {:?}", other),
        }
        match &outcomes[1] {
            Ok(path) => assert!(path.ends_with(".env")),
            other => panic!("Expected .env to load, got {:?}", other),
        }
        assert_eq!(std::env::var("FCM_RELAY_DOTENV_OK").as_deref(), Ok("1"));
    }

    const DEFAULT_TOML: &str = r#"
[application]
name = "test-relay"

[server]
host = "127.0.0.1"
port = 3000

[firebase]
credential_env = "FIREBASE_SERVICE_ACCOUNT_KEY"

[provider]
fcm_base_url = "https://fcm.googleapis.com"

[ui]
show_image = true
"#;

    #[test]
    fn test_loader_reads_process_environment() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        env.set(CONFIG_FILE_ENV, "/path/to/relay.toml");
        env.set(AppEnvironment::ENV_VAR, "production");

        let loader = ConfigLoader::new();
        assert_eq!(loader.config_file(), Some(Path::new("/path/to/relay.toml")));
        assert_eq!(loader.environment(), AppEnvironment::Production);
    }

    #[test]
    fn test_load_missing_default_toml() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        env.remove(CONFIG_FILE_ENV);
        let temp_dir = setup_config_dir(&[]);

        let result = ConfigLoader::new()
            .with_config_dir(temp_dir.path())
            .with_environment(AppEnvironment::Development)
            .load();

        match result {
            Err(ConfigError::FileNotFound(msg)) => assert!(msg.contains("default.toml")),
            other => panic!("Expected FileNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_default_toml_only() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        env.remove(CONFIG_FILE_ENV);
        env.remove("FCM_RELAY_SERVER__PORT");
        let temp_dir = setup_config_dir(&[("default.toml", DEFAULT_TOML)]);

        let settings = ConfigLoader::new()
            .with_config_dir(temp_dir.path())
            .with_environment(AppEnvironment::Test)
            .load()
            .expect("Should load settings");

        assert_eq!(settings.application.name, "test-relay");
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.provider.request_timeout, 30);
        assert!(settings.ui.show_custom_fields);
    }

    #[test]
    fn test_load_full_precedence_chain() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();

        let production = r#"
[application]
name = "prod-relay"

[server]
host = "0.0.0.0"
port = 8080

[ui]
show_custom_fields = false
"#;
        let local = r#"
[server]
port = 9090
"#;
        let temp_dir = setup_config_dir(&[
            ("default.toml", DEFAULT_TOML),
            ("production.toml", production),
            ("local.toml", local),
        ]);

        env.remove(CONFIG_FILE_ENV);
        env.set("FCM_RELAY_PROVIDER__REQUEST_TIMEOUT", "5");

        let settings = ConfigLoader::new()
            .with_config_dir(temp_dir.path())
            .with_environment(AppEnvironment::Production)
            .load()
            .expect("Should load settings");

        // environment variable beats every file
        assert_eq!(settings.provider.request_timeout, 5);
        // local.toml beats production.toml
        assert_eq!(settings.server.port, 9090);
        // production.toml beats default.toml
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.application.name, "prod-relay");
        assert!(!settings.ui.show_custom_fields);
        // default.toml provides the rest
        assert_eq!(settings.provider.fcm_base_url, "https://fcm.googleapis.com");
    }

    #[test]
    fn test_load_single_file_mode_skips_layers() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let single = r#"
[server]
port = 5000

[firebase]
credential_env = "RELAY_KEY"
"#;
        let temp_dir = setup_config_dir(&[("default.toml", DEFAULT_TOML), ("single.toml", single)]);

        let settings = ConfigLoader::new()
            .with_config_dir(temp_dir.path())
            .with_config_file(temp_dir.path().join("single.toml"))
            .load()
            .expect("Should load settings");

        assert_eq!(settings.server.port, 5000);
        assert_eq!(settings.firebase.credential_env, "RELAY_KEY");
        // default.toml was not consulted
        assert_eq!(settings.application.name, "fcm-relay");
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let broken = r#"
[provider]
fcm_base_url = "ftp://example.com"
"#;
        let temp_dir = setup_config_dir(&[("broken.toml", broken)]);

        let result = ConfigLoader::new()
            .with_config_file(temp_dir.path().join("broken.toml"))
            .load();

        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }
}
