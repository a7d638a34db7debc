//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::models::MessageType;

/// Address `send` posts to when `--url` is not given.
pub const DEFAULT_RELAY_URL: &str = "http://localhost:3000";

/// Test push notifications through Firebase Cloud Messaging
#[derive(Parser, Debug)]
#[command(name = "fcm-relay")]
#[command(about = "Test push notifications through Firebase Cloud Messaging")]
#[command(long_about = "
fcm-relay serves a small form for composing FCM test messages, checks the
configured service account key and relays messages to Firebase Cloud
Messaging.

The service account key is read from FIREBASE_SERVICE_ACCOUNT_KEY (usually
set in .env.local) as single-line JSON.

EXAMPLES:
    # Start the server with default configuration
    fcm-relay serve

    # Start server on custom host and port
    fcm-relay serve --host 0.0.0.0 --port 8080

    # Use custom configuration file
    fcm-relay --config /path/to/config.toml serve

    # Check configuration without starting server
    fcm-relay serve --dry-run

    # Validate the service account key
    fcm-relay check

    # Send a sample message through a running instance
    fcm-relay send <FCM_TOKEN>
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    ///
    /// Load exactly this TOML file instead of the layered `config/` directory.
    /// The file must exist and be readable.
    ///
    /// Example: --config /etc/fcm-relay/production.toml
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Selects which `{environment}.toml` layer is loaded.
    ///
    /// Available values: development (dev), production (prod), test
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose logging
    ///
    /// Cannot be used with --quiet.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    ///
    /// Cannot be used with --verbose.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web server (default)
    ///
    /// Serves the test form, the credential check and the relay endpoint.
    ///
    /// Examples:
    ///   fcm-relay serve                           # Start with defaults
    ///   fcm-relay serve --host 0.0.0.0 --port 80 # Bind to all interfaces on port 80
    ///   fcm-relay serve --dry-run                 # Validate config without starting
    Serve {
        /// Host address to bind to
        ///
        /// Use 127.0.0.1 for localhost only, or 0.0.0.0 to accept connections from any interface.
        ///
        /// Default: 127.0.0.1
        #[arg(long, value_name = "ADDRESS", value_parser = super::validation::validate_host_address)]
        host: Option<String>,

        /// Port number to listen on
        ///
        /// Default: 3000
        #[arg(short, long, value_name = "PORT", value_parser = super::validation::validate_port)]
        port: Option<u16>,

        /// Log level override
        ///
        /// Overrides both configuration file settings and global --verbose/--quiet flags.
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Validate configuration and exit
        ///
        /// Builds the application without binding a port.
        /// Returns exit code 0 if valid, non-zero if invalid.
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate the configured service account key
    ///
    /// Prints the same result as GET /api/check-firebase and exits non-zero
    /// unless the key is usable.
    Check,
    /// Send a sample message through a running instance
    ///
    /// Posts a fixed sample payload to `<URL>/api/send-fcm`.
    ///
    /// Examples:
    ///   fcm-relay send <FCM_TOKEN>
    ///   fcm-relay send <FCM_TOKEN> --url http://localhost:8080 --message-type notification-data
    Send {
        /// Destination registration token
        ///
        /// Without a token, usage guidance is printed and nothing is sent.
        #[arg(value_name = "TOKEN")]
        token: Option<String>,

        /// Base URL of the running relay
        #[arg(long, value_name = "URL", default_value = DEFAULT_RELAY_URL, value_parser = super::validation::validate_base_url)]
        url: String,

        /// Message shape to request
        ///
        /// Available values: data-only, notification-data
        #[arg(long, value_name = "TYPE", default_value = "data-only")]
        message_type: MessageType,
    },
}

/// Environment options
#[derive(ValueEnum, Clone, Debug)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "production", alias = "prod")]
    Production,
    #[value(name = "test")]
    Test,
}

/// Log level options
#[derive(ValueEnum, Clone, Debug)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => "error".to_string(),
            LogLevel::Warn => "warn".to_string(),
            LogLevel::Info => "info".to_string(),
            LogLevel::Debug => "debug".to_string(),
            LogLevel::Trace => "trace".to_string(),
        }
    }
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Production => crate::config::Environment::Production,
            Environment::Test => crate::config::Environment::Test,
        }
    }
}
