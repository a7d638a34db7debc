//! Service-account credential model.

use serde::{Deserialize, Serialize};

/// Token endpoint used when the credential does not name one.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Firebase service-account key, as downloaded from the Firebase console.
///
/// Only the fields needed to mint an OAuth2 access token are kept.
/// Instances are produced by [`crate::services::credential::load_credential`],
/// which guarantees the five required fields are non-empty and that the
/// private key carries literal newlines.
#[derive(Clone, Serialize, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type")]
    pub account_type: String,
    pub project_id: String,
    pub private_key_id: String,
    pub private_key: String,
    pub client_email: String,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccountKey {
    /// Replaces escaped `\n` sequences in the private key with real newlines.
    ///
    /// Keys pasted into a single-line environment variable keep the PEM line
    /// breaks as the two characters `\` `n`; the PEM parser needs real ones.
    pub fn normalize_private_key(mut self) -> Self {
        self.private_key = self.private_key.replace("\\n", "\n");
        self
    }

    /// Identity used to decide whether a cached provider client is stale.
    pub fn fingerprint(&self) -> (&str, &str) {
        (&self.project_id, &self.private_key_id)
    }
}

// Key material stays out of logs and panic messages.
impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("account_type", &self.account_type)
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field("private_key", &"<redacted>")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}
