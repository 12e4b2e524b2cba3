//! Service account credentials: OAuth2 access tokens for the Google REST APIs
//! and signed custom tokens for Firebase Auth.

use base64::Engine;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::utils::{AppError, AppResult, ExpiringCache};

const GOOGLE_SCOPES: &str =
    "https://www.googleapis.com/auth/cloud-platform https://www.googleapis.com/auth/identitytoolkit";
const CUSTOM_TOKEN_AUDIENCE: &str =
    "https://identitytoolkit.googleapis.com/google.identity.identitytoolkit.v1.IdentityToolkit";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccount {
    pub project_id: String,
    pub private_key: String,
    pub client_email: String,
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl ServiceAccount {
    /// Raw service account JSON kept base64 encoded in `FIREBASE_CONFIG_BASE64`.
    pub fn decode_base64(encoded: &str) -> Result<Vec<u8>, String> {
        base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| format!("Invalid FIREBASE_CONFIG_BASE64: {}", e))
    }

    pub fn from_json(json: &[u8]) -> Result<Self, String> {
        serde_json::from_slice(json).map_err(|e| format!("Invalid service account JSON: {}", e))
    }

}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Serialize)]
struct CustomTokenClaims<'a> {
    iss: &'a str,
    sub: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
    uid: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

pub struct GoogleCredentials {
    account: ServiceAccount,
    http: reqwest::Client,
    access_token: ExpiringCache<String>,
}

impl GoogleCredentials {
    pub fn new(account: ServiceAccount, http: reqwest::Client) -> Self {
        Self {
            account,
            http,
            access_token: ExpiringCache::new(),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.account.project_id
    }

    fn signing_key(&self) -> AppResult<EncodingKey> {
        EncodingKey::from_rsa_pem(self.account.private_key.as_bytes())
            .map_err(|e| AppError::Internal(format!("Invalid service account key: {}", e)))
    }

    fn sign<T: Serialize>(&self, claims: &T) -> AppResult<String> {
        encode(&Header::new(Algorithm::RS256), claims, &self.signing_key()?)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Bearer token for Google APIs, refreshed a minute before it expires.
    pub async fn access_token(&self) -> AppResult<String> {
        if let Some(token) = self.access_token.get().await {
            return Ok(token);
        }

        let token_uri = self.account.token_uri.as_deref().unwrap_or(DEFAULT_TOKEN_URI);
        let now = Utc::now().timestamp();
        let assertion = self.sign(&AssertionClaims {
            iss: &self.account.client_email,
            scope: GOOGLE_SCOPES,
            aud: token_uri,
            iat: now,
            exp: now + 3600,
        })?;

        log::debug!("🔑 Requesting Google access token for {}", self.account.client_email);

        let response = self
            .http
            .post(token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Google token endpoint error {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response.json().await?;
        let ttl = Duration::from_secs(token.expires_in.saturating_sub(60));
        self.access_token.set(token.access_token.clone(), ttl).await;

        Ok(token.access_token)
    }

    /// Firebase custom token the client can exchange for an ID token.
    pub fn custom_token(&self, uid: &str) -> AppResult<String> {
        let now = Utc::now().timestamp();
        self.sign(&CustomTokenClaims {
            iss: &self.account.client_email,
            sub: &self.account.client_email,
            aud: CUSTOM_TOKEN_AUDIENCE,
            iat: now,
            exp: now + 3600,
            uid,
        })
    }
}
