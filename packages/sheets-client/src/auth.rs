//! Service-account authentication (OAuth 2.0 JWT bearer grant).
//!
//! A signed RS256 assertion is exchanged at the key's `token_uri` for a
//! short-lived access token. The token is cached and refreshed a minute
//! before it expires.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::sync::Mutex;

use crate::error::{Result, SheetsError};

pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const REFRESH_MARGIN_SECS: i64 = 60;

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// The fields of a Google service-account JSON key this client needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"[REDACTED]")
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

impl ServiceAccountKey {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SheetsError::InvalidKey(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SheetsError::CredentialsFile {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }
}

/// JWT claims for the bearer grant assertion.
#[derive(Debug, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
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
struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(REFRESH_MARGIN_SECS) < self.expires_at
    }
}

/// Issues and caches access tokens for one service account.
pub struct ServiceAccountAuth {
    key: ServiceAccountKey,
    scopes: Vec<String>,
    http: reqwest::Client,
    token: Mutex<Option<AccessToken>>,
}

impl ServiceAccountAuth {
    pub fn new(key: ServiceAccountKey, scopes: &[&str]) -> Self {
        Self {
            key,
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
            http: reqwest::Client::new(),
            token: Mutex::new(None),
        }
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// Build the signed assertion sent to the token endpoint.
    pub fn sign_assertion(&self, now: DateTime<Utc>) -> Result<String> {
        let claims = AssertionClaims {
            iss: self.key.client_email.clone(),
            scope: self.scopes.join(" "),
            aud: self.key.token_uri.clone(),
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        let signing_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .map_err(|e| SheetsError::InvalidKey(e.to_string()))?;

        Ok(encode(&header, &claims, &signing_key)?)
    }

    /// Current access token, exchanging a fresh assertion when needed.
    pub async fn access_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        let now = Utc::now();

        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(now)) {
            return Ok(token.value.clone());
        }

        let assertion = self.sign_assertion(now)?;
        let resp = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "Service account token exchange failed");
            return Err(SheetsError::TokenExchange {
                status: status.as_u16(),
                message,
            });
        }

        let token: TokenResponse = resp.json().await?;
        tracing::debug!(
            client_email = %self.key.client_email,
            expires_in = token.expires_in,
            "Obtained service account access token"
        );

        let value = token.access_token.clone();
        *cached = Some(AccessToken {
            value: token.access_token,
            expires_at: now + Duration::seconds(token.expires_in),
        });
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, decode_header, DecodingKey, Validation};

    const FIXTURE: &str = include_str!("../tests/fixtures/service_account.json");

    #[test]
    fn test_key_debug_hides_private_key() {
        let key = ServiceAccountKey::from_json(FIXTURE).unwrap();
        let debug = format!("{:?}", key);

        assert!(!debug.contains("BEGIN PRIVATE KEY"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_token_uri_defaults() {
        let key = ServiceAccountKey::from_json(
            r#"{"client_email":"a@b.iam.gserviceaccount.com","private_key":"x"}"#,
        )
        .unwrap();

        assert_eq!(key.token_uri, "https://oauth2.googleapis.com/token");
    }

    #[test]
    fn test_assertion_claims() {
        let key = ServiceAccountKey::from_json(FIXTURE).unwrap();
        let auth = ServiceAccountAuth::new(key.clone(), &[SPREADSHEETS_SCOPE, DRIVE_SCOPE]);
        let now = Utc::now();

        let jwt = auth.sign_assertion(now).unwrap();

        let header = decode_header(&jwt).unwrap();
        assert_eq!(header.alg, Algorithm::RS256);
        assert_eq!(header.kid.as_deref(), Some("test-key-id"));

        // Signature checking needs the public half; only the claims matter here.
        let mut validation = Validation::new(Algorithm::RS256);
        validation.insecure_disable_signature_validation();
        validation.set_audience(&[key.token_uri.as_str()]);
        let claims = decode::<AssertionClaims>(&jwt, &DecodingKey::from_secret(&[]), &validation)
            .unwrap()
            .claims;

        assert_eq!(claims.iss, key.client_email);
        assert_eq!(claims.scope, format!("{} {}", SPREADSHEETS_SCOPE, DRIVE_SCOPE));
        assert_eq!(claims.exp - claims.iat, ASSERTION_LIFETIME_SECS);
    }

    #[test]
    fn test_garbage_private_key_is_invalid() {
        let key = ServiceAccountKey::from_json(
            r#"{"client_email":"a@b.iam.gserviceaccount.com","private_key":"not a pem"}"#,
        )
        .unwrap();
        let auth = ServiceAccountAuth::new(key, &[SPREADSHEETS_SCOPE]);

        assert!(matches!(
            auth.sign_assertion(Utc::now()),
            Err(SheetsError::InvalidKey(_))
        ));
    }
}
