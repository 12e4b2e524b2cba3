//! Firebase Authentication: admin operations through the Identity Toolkit REST
//! API and verification of client ID tokens against Google's signing keys.

use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::google_oauth::GoogleCredentials;
use crate::utils::{AppError, AppResult, ExpiringCache};

const IDENTITY_TOOLKIT: &str = "https://identitytoolkit.googleapis.com/v1";
const SECURE_TOKEN_JWKS: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/// Account record held by the identity provider.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// Claims of a verified Firebase ID token. Role claims are set by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FirebaseClaims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub engineer: bool,
    #[serde(default)]
    pub teacher: bool,
    #[serde(default)]
    pub student: bool,
}

impl FirebaseClaims {
    pub fn uid(&self) -> &str {
        &self.sub
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn get_user(&self, uid: &str) -> AppResult<Option<AuthUser>>;
    async fn get_user_by_email(&self, email: &str) -> AppResult<Option<AuthUser>>;
    /// Creates a password-less account and returns its uid.
    async fn create_user(&self, email: &str, display_name: &str) -> AppResult<String>;
    async fn delete_user(&self, uid: &str) -> AppResult<()>;
    /// Replaces every custom claim of the account.
    async fn set_custom_claims(&self, uid: &str, claims: Value) -> AppResult<()>;
    async fn password_reset_link(&self, email: &str) -> AppResult<String>;
    async fn send_password_reset_email(&self, email: &str) -> AppResult<()>;
    async fn create_custom_token(&self, uid: &str) -> AppResult<String>;
}

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> AppResult<FirebaseClaims>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountInfo {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
}

impl From<AccountInfo> for AuthUser {
    fn from(info: AccountInfo) -> Self {
        Self {
            uid: info.local_id,
            email: info.email,
            display_name: info.display_name,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<AccountInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignUpResponse {
    local_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OobResponse {
    #[serde(default)]
    oob_link: Option<String>,
}

pub struct FirebaseAuth {
    credentials: Arc<GoogleCredentials>,
    http: reqwest::Client,
    project_id: String,
    api_key: String,
    continue_url: String,
}

impl FirebaseAuth {
    pub fn new(
        credentials: Arc<GoogleCredentials>,
        http: reqwest::Client,
        project_id: String,
        api_key: String,
        continue_url: String,
    ) -> Self {
        Self {
            credentials,
            http,
            project_id,
            api_key,
            continue_url,
        }
    }

    fn admin_url(&self, method: &str) -> String {
        format!("{}/projects/{}/{}", IDENTITY_TOOLKIT, self.project_id, method)
    }

    /// POSTs an admin request. A `USER_NOT_FOUND` answer comes back as `Ok(None)`.
    async fn admin_call(&self, method: &str, body: Value) -> AppResult<Option<Value>> {
        let token = self.credentials.access_token().await?;
        let response = self
            .http
            .post(self.admin_url(method))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let payload: Value = response.json().await.unwrap_or(Value::Null);

        if status.is_success() {
            return Ok(Some(payload));
        }

        let reason = payload["error"]["message"].as_str().unwrap_or("unknown error");
        if reason.starts_with("USER_NOT_FOUND") {
            return Ok(None);
        }

        Err(AppError::ExternalService(format!(
            "Identity Toolkit {} failed ({}): {}",
            method, status, reason
        )))
    }

    async fn lookup(&self, body: Value) -> AppResult<Option<AuthUser>> {
        let Some(payload) = self.admin_call("accounts:lookup", body).await? else {
            return Ok(None);
        };
        let lookup: LookupResponse = serde_json::from_value(payload).unwrap_or_default();
        Ok(lookup.users.into_iter().next().map(AuthUser::from))
    }
}

#[async_trait]
impl IdentityProvider for FirebaseAuth {
    async fn get_user(&self, uid: &str) -> AppResult<Option<AuthUser>> {
        self.lookup(json!({ "localId": [uid] })).await
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<Option<AuthUser>> {
        self.lookup(json!({ "email": [email] })).await
    }

    async fn create_user(&self, email: &str, display_name: &str) -> AppResult<String> {
        let payload = self
            .admin_call("accounts", json!({ "email": email, "displayName": display_name }))
            .await?
            .ok_or_else(|| AppError::ExternalService("Account creation returned no user".into()))?;

        let created: SignUpResponse = serde_json::from_value(payload)
            .map_err(|e| AppError::ExternalService(format!("Unexpected signup response: {}", e)))?;

        log::info!("👤 Created auth account {} for {}", created.local_id, email);
        Ok(created.local_id)
    }

    async fn delete_user(&self, uid: &str) -> AppResult<()> {
        match self.admin_call("accounts:delete", json!({ "localId": uid })).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!("No auth account for {}", uid))),
        }
    }

    async fn set_custom_claims(&self, uid: &str, claims: Value) -> AppResult<()> {
        let body = json!({
            "localId": uid,
            "customAttributes": claims.to_string(),
        });
        match self.admin_call("accounts:update", body).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!("No auth account for {}", uid))),
        }
    }

    async fn password_reset_link(&self, email: &str) -> AppResult<String> {
        let body = json!({
            "requestType": "PASSWORD_RESET",
            "email": email,
            "returnOobLink": true,
            "continueUrl": self.continue_url,
            "canHandleCodeInApp": true,
        });
        let payload = self
            .admin_call("accounts:sendOobCode", body)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        serde_json::from_value::<OobResponse>(payload)
            .ok()
            .and_then(|r| r.oob_link)
            .ok_or_else(|| AppError::Internal("Failed to generate password reset link".into()))
    }

    async fn send_password_reset_email(&self, email: &str) -> AppResult<()> {
        let url = format!("{}/accounts:sendOobCode?key={}", IDENTITY_TOOLKIT, self.api_key);
        let response = self
            .http
            .post(url)
            .json(&json!({ "requestType": "PASSWORD_RESET", "email": email }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Password reset email failed ({}): {}",
                status, body
            )));
        }

        log::info!("📧 Password reset email sent to {}", email);
        Ok(())
    }

    async fn create_custom_token(&self, uid: &str) -> AppResult<String> {
        self.credentials.custom_token(uid)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: String,
    n: String,
    e: String,
}

#[derive(Debug, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

/// Verifies Firebase ID tokens (RS256) with Google's rotating public keys.
pub struct FirebaseTokenVerifier {
    http: reqwest::Client,
    project_id: String,
    keys: ExpiringCache<HashMap<String, Jwk>>,
}

impl FirebaseTokenVerifier {
    pub fn new(http: reqwest::Client, project_id: String) -> Self {
        Self {
            http,
            project_id,
            keys: ExpiringCache::new(),
        }
    }

    async fn signing_keys(&self) -> AppResult<HashMap<String, Jwk>> {
        if let Some(keys) = self.keys.get().await {
            return Ok(keys);
        }

        let response = self.http.get(SECURE_TOKEN_JWKS).send().await?;
        let max_age = response
            .headers()
            .get(reqwest::header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok())
            .and_then(max_age_seconds)
            .unwrap_or(3600);

        let set: JwkSet = response.json().await?;
        let keys: HashMap<String, Jwk> = set.keys.into_iter().map(|k| (k.kid.clone(), k)).collect();

        log::debug!("🔑 Loaded {} token signing keys (max-age {}s)", keys.len(), max_age);
        self.keys.set(keys.clone(), Duration::from_secs(max_age)).await;

        Ok(keys)
    }
}

/// Extracts `max-age` from a Cache-Control header value.
fn max_age_seconds(header: &str) -> Option<u64> {
    header
        .split(',')
        .filter_map(|part| part.trim().strip_prefix("max-age="))
        .find_map(|v| v.parse().ok())
}

#[async_trait]
impl TokenVerifier for FirebaseTokenVerifier {
    async fn verify(&self, token: &str) -> AppResult<FirebaseClaims> {
        let header = decode_header(token)
            .map_err(|e| AppError::Unauthorized(format!("Malformed token: {}", e)))?;
        let kid = header
            .kid
            .ok_or_else(|| AppError::Unauthorized("Token has no key id".into()))?;

        let keys = self.signing_keys().await?;
        let jwk = keys
            .get(&kid)
            .ok_or_else(|| AppError::Unauthorized("Token signed with an unknown key".into()))?;

        let key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
            .map_err(|e| AppError::Internal(format!("Invalid signing key: {}", e)))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[format!("https://securetoken.google.com/{}", self.project_id)]);

        let data = decode::<FirebaseClaims>(token, &key, &validation)
            .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))?;

        if data.claims.sub.is_empty() {
            return Err(AppError::Unauthorized("Token has no subject".into()));
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_age_parsing() {
        assert_eq!(max_age_seconds("public, max-age=19302, must-revalidate"), Some(19302));
        assert_eq!(max_age_seconds("no-cache"), None);
    }

    #[test]
    fn test_claims_default_to_false() {
        let claims: FirebaseClaims =
            serde_json::from_value(json!({ "sub": "u1", "engineer": true })).unwrap();
        assert_eq!(claims.uid(), "u1");
        assert!(claims.engineer);
        assert!(!claims.admin);
        assert!(claims.email.is_none());
    }

    #[test]
    fn test_lookup_response_maps_to_auth_user() {
        let lookup: LookupResponse = serde_json::from_value(json!({
            "users": [{ "localId": "abc", "email": "a@b.com" }]
        }))
        .unwrap();
        let user = lookup.users.into_iter().next().map(AuthUser::from).unwrap();
        assert_eq!(user.uid, "abc");
        assert_eq!(user.email.as_deref(), Some("a@b.com"));
        assert!(user.display_name.is_none());
    }
}
