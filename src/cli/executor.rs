//! Command executor for dispatching CLI commands
//!
//! This module provides the main entry point for executing CLI commands
//! after parsing and configuration loading.

use super::handlers::{CheckCommandHandler, SendCommandHandler, ServeCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::{Environment, settings::Settings};

/// Execute a CLI command with the given settings
///
/// No subcommand means `serve`.
///
/// # Arguments
/// * `cli` - Parsed CLI arguments
/// * `settings` - Merged and validated settings
/// * `environment` - Environment the settings were loaded for
///
/// # Errors
/// Returns errors from command handlers
pub async fn execute_command(
    cli: &Cli,
    settings: Settings,
    environment: Environment,
) -> anyhow::Result<()> {
    warn_about_serve_args(cli);

    match &cli.command {
        Some(Commands::Serve { dry_run, .. }) => {
            ServeCommandHandler::new(settings, environment)
                .execute(*dry_run)
                .await
        }
        None => {
            ServeCommandHandler::new(settings, environment)
                .execute(false)
                .await
        }
        Some(Commands::Check) => CheckCommandHandler::new(&settings).execute(),
        Some(Commands::Send {
            token,
            url,
            message_type,
        }) => {
            SendCommandHandler::new(&settings.provider, url.clone())?
                .execute(token.as_deref(), *message_type)
                .await
        }
    }
}

/// Warn about host/port combinations that usually need extra privileges
fn warn_about_serve_args(cli: &Cli) {
    if let Some(Commands::Serve {
        host: Some(host_addr),
        port: Some(port_num),
        ..
    }) = &cli.command
        && *port_num < 1024
        && host_addr == "0.0.0.0"
    {
        tracing::warn!(
            port = %port_num,
            "Binding to 0.0.0.0 on a privileged port typically requires root privileges"
        );
    }
}
