//! OAuth access tokens for the Sheets API.
//!
//! `ServiceAccountTokenSource` signs an RS256 JWT assertion with the service
//! account's private key and exchanges it at the key's `token_uri`.
//! Tokens are reused until shortly before they expire.

use crate::domain::DomainError;
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
/// Assertion lifetime; Google caps it at one hour.
const ASSERTION_TTL_SECS: i64 = 3600;
/// Refresh this long before the token actually expires.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Source of bearer tokens for Google APIs.
#[async_trait::async_trait]
pub trait AccessTokenSource: Send + Sync {
    async fn access_token(&self) -> Result<String, DomainError>;
}

/// A pre-issued token (e.g. from `gcloud auth print-access-token`).
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait::async_trait]
impl AccessTokenSource for StaticToken {
    async fn access_token(&self) -> Result<String, DomainError> {
        Ok(self.0.clone())
    }
}

/// The fields we need from a downloaded service-account key file.
#[derive(Debug, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
struct Claims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

impl Claims {
    fn new(key: &ServiceAccountKey, now: i64) -> Self {
        Self {
            iss: key.client_email.clone(),
            scope: SHEETS_SCOPE.to_string(),
            aud: key.token_uri.clone(),
            iat: now,
            exp: now + ASSERTION_TTL_SECS,
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_TTL_SECS
}

struct CachedToken {
    token: String,
    expires_at: i64,
}

pub struct ServiceAccountTokenSource {
    client: reqwest::Client,
    key: ServiceAccountKey,
    signing_key: EncodingKey,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountTokenSource {
    /// Parse the key JSON (the content of the downloaded key file, not a path).
    pub fn from_json(client: reqwest::Client, key_json: &str) -> Result<Self, DomainError> {
        let key: ServiceAccountKey = serde_json::from_str(key_json)
            .map_err(|e| DomainError::Export(format!("Invalid service account key JSON: {}", e)))?;
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| DomainError::Export(format!("Invalid service account private key: {}", e)))?;
        info!(client_email = %key.client_email, "service account loaded");
        Ok(Self {
            client,
            key,
            signing_key,
            cached: Mutex::new(None),
        })
    }

    async fn exchange(&self, now: i64) -> Result<CachedToken, DomainError> {
        let assertion = jsonwebtoken::encode(
            &Header::new(Algorithm::RS256),
            &Claims::new(&self.key, now),
            &self.signing_key,
        )
        .map_err(|e| DomainError::Export(format!("Failed to sign assertion: {}", e)))?;

        let res = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| DomainError::Export(format!("Token request failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(DomainError::Export(format!(
                "Token exchange error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        let body: TokenResponse = res
            .json()
            .await
            .map_err(|e| DomainError::Export(format!("Failed to parse token response: {}", e)))?;
        debug!(expires_in = body.expires_in, "access token issued");
        Ok(CachedToken {
            token: body.access_token,
            expires_at: now + body.expires_in,
        })
    }
}

#[async_trait::async_trait]
impl AccessTokenSource for ServiceAccountTokenSource {
    async fn access_token(&self) -> Result<String, DomainError> {
        let now = Utc::now().timestamp();
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at - EXPIRY_MARGIN_SECS > now {
                return Ok(token.token.clone());
            }
        }
        let fresh = self.exchange(now).await?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> ServiceAccountKey {
        serde_json::from_str(
            r#"{"client_email":"exporter@project.iam.gserviceaccount.com","private_key":"pem"}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_key_defaults_token_uri() {
        assert_eq!(key().token_uri, DEFAULT_TOKEN_URI);
    }

    #[test]
    fn test_claims() {
        let claims = Claims::new(&key(), 1_700_000_000);
        assert_eq!(claims.iss, "exporter@project.iam.gserviceaccount.com");
        assert_eq!(claims.scope, SHEETS_SCOPE);
        assert_eq!(claims.aud, DEFAULT_TOKEN_URI);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_invalid_private_key_rejected() {
        let result = ServiceAccountTokenSource::from_json(
            reqwest::Client::new(),
            r#"{"client_email":"a@b.c","private_key":"not a pem"}"#,
        );
        assert!(matches!(result, Err(DomainError::Export(_))));
    }

    #[test]
    fn test_invalid_json_rejected() {
        let result = ServiceAccountTokenSource::from_json(reqwest::Client::new(), "{");
        assert!(matches!(result, Err(DomainError::Export(_))));
    }

    #[tokio::test]
    async fn test_static_token() {
        assert_eq!(StaticToken::new("abc").access_token().await.unwrap(), "abc");
    }
}
