//! OAuth2 access tokens for the service account.
//!
//! A short-lived RS256 assertion signed with the service-account key is
//! exchanged at the credential's token endpoint. The resulting bearer token
//! is cached until shortly before it expires.

use super::provider::ProviderError;
use crate::models::ServiceAccountKey;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// OAuth scope required by the FCM HTTP v1 API.
pub const FCM_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";

const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Cached tokens are refreshed this long before they expire.
const REFRESH_MARGIN_SECS: i64 = 60;

/// Claims of the self-signed assertion.
#[derive(Debug, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub sub: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: i64,
}

/// Mints and caches access tokens for one service account.
pub struct AccessTokenProvider {
    client_email: String,
    token_uri: String,
    key_id: String,
    encoding_key: EncodingKey,
    http: reqwest::Client,
    cache: Mutex<Option<CachedToken>>,
}

impl AccessTokenProvider {
    /// Parses the private key up front so a malformed key fails at
    /// initialization rather than on the first send.
    pub fn new(credential: &ServiceAccountKey, http: reqwest::Client) -> Result<Self, ProviderError> {
        let encoding_key = EncodingKey::from_rsa_pem(credential.private_key.as_bytes())
            .map_err(|e| {
                ProviderError::invalid_credential(format!("Failed to parse private key: {}", e))
            })?;

        Ok(Self {
            client_email: credential.client_email.clone(),
            token_uri: credential.token_uri.clone(),
            key_id: credential.private_key_id.clone(),
            encoding_key,
            http,
            cache: Mutex::new(None),
        })
    }

    /// Returns a valid bearer token, exchanging a new assertion when needed.
    pub async fn token(&self) -> Result<String, ProviderError> {
        let mut cache = self.cache.lock().await;
        let now = jiff::Timestamp::now().as_second();

        if let Some(cached) = cache.as_ref()
            && cached.expires_at > now + REFRESH_MARGIN_SECS
        {
            return Ok(cached.access_token.clone());
        }

        let response = self.exchange(now).await?;
        tracing::debug!(expires_in = response.expires_in, "Access token obtained");

        let token = response.access_token.clone();
        *cache = Some(CachedToken {
            access_token: response.access_token,
            expires_at: now + response.expires_in,
        });
        Ok(token)
    }

    fn sign_assertion(&self, now: i64) -> Result<String, ProviderError> {
        let claims = AssertionClaims {
            iss: self.client_email.clone(),
            sub: self.client_email.clone(),
            scope: FCM_SCOPE.to_string(),
            aud: self.token_uri.clone(),
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(self.key_id.clone());

        encode(&header, &claims, &self.encoding_key).map_err(|e| {
            ProviderError::invalid_credential(format!("Failed to sign token assertion: {}", e))
        })
    }

    async fn exchange(&self, now: i64) -> Result<TokenResponse, ProviderError> {
        let assertion = self.sign_assertion(now)?;
        let params = [("grant_type", GRANT_TYPE), ("assertion", assertion.as_str())];

        let response = self
            .http
            .post(&self.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| ProviderError::network(format!("Failed to get access token: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::invalid_credential(format!(
                "Token request failed with status {}: {}",
                status,
                body.trim()
            )));
        }

        response.json::<TokenResponse>().await.map_err(|e| {
            ProviderError::invalid_credential(format!("Failed to parse token response: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_TOKEN_URI;

    #[test]
    fn test_new_rejects_malformed_private_key() {
        let credential = ServiceAccountKey {
            account_type: "service_account".to_string(),
            project_id: "demo".to_string(),
            private_key_id: "kid".to_string(),
            private_key: "not a pem".to_string(),
            client_email: "relay@demo.iam.gserviceaccount.com".to_string(),
            client_id: None,
            token_uri: DEFAULT_TOKEN_URI.to_string(),
        };

        let error = AccessTokenProvider::new(&credential, reqwest::Client::new())
            .err()
            .expect("malformed key must be rejected");
        assert_eq!(error.code, "app/invalid-credential");
        assert!(error.message.contains("private key"));
    }
}
