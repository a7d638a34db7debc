use clap::Parser;
use fcm_relay::cli::{Cli, execute_command, init_logger_from_settings, load_and_merge_config};
use fcm_relay::config::load_dotenv;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // .env.local usually carries the service account key
    let dotenv_files = load_dotenv();
    let cli = Cli::parse();

    let (settings, environment) = match load_and_merge_config(&cli) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logger_from_settings(&settings) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    for outcome in &dotenv_files {
        match outcome {
            Ok(path) => tracing::debug!(path = %path.display(), "Loaded environment file"),
            Err(e) => tracing::warn!(error = %e, "Environment file ignored"),
        }
    }

    match execute_command(&cli, settings, environment).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
