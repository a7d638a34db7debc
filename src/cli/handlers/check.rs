//! Check command handler
//!
//! Runs the credential validator against the configured source.

use crate::config::settings::Settings;
use crate::services::{CredentialService, ValidationResult, credential_source};

/// Handler for the check command
pub struct CheckCommandHandler {
    credentials: CredentialService,
}

impl CheckCommandHandler {
    pub fn new(config: &Settings) -> Self {
        Self::with_credentials(CredentialService::new(credential_source(&config.firebase)))
    }

    pub fn with_credentials(credentials: CredentialService) -> Self {
        Self { credentials }
    }

    /// Print the validation result.
    ///
    /// # Errors
    /// Fails unless the credential is usable, so the process exits non-zero.
    pub fn execute(&self) -> anyhow::Result<()> {
        let result = self.credentials.check();
        println!("{}", self.report(&result));

        if result.is_ok() {
            Ok(())
        } else {
            anyhow::bail!("Firebase credential check failed: {}", result.message())
        }
    }

    /// Human-readable report for `result`.
    pub fn report(&self, result: &ValidationResult) -> String {
        let mut lines = vec![format!("Source: {}", self.credentials.source_name())];

        match result {
            ValidationResult::Ok {
                project_id,
                client_email,
            } => {
                lines.push(format!("✓ {}", result.message()));
                lines.push(format!("  Project: {}", project_id));
                lines.push(format!("  Account: {}", client_email));
            }
            _ => {
                lines.push(format!("✗ {}", result.message()));
                if let Some(error) = result.parser_error() {
                    lines.push(format!("  Error: {}", error));
                }
                if let Some(hint) = result.hint() {
                    lines.push(format!("  Hint: {}", hint));
                }
            }
        }

        lines.join("\n")
    }
}
