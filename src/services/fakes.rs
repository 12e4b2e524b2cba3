//! In-process stand-ins for the external backends, used by service and handler tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use super::{AuthUser, FileStorage, FirebaseClaims, IdentityProvider, Mailer, SearchIndex, TokenVerifier};
use crate::database::memory::InMemoryRepository;
use crate::models::{EngineerIndexRecord, IndexPage, IndexQuery};
use crate::state::AppState;
use crate::utils::{AppError, AppResult};

#[derive(Default)]
pub struct FakeIdentity {
    pub users: Mutex<HashMap<String, AuthUser>>,
    pub claims: Mutex<HashMap<String, Value>>,
    pub reset_emails: Mutex<Vec<String>>,
}

impl FakeIdentity {
    pub fn add_user(&self, uid: &str, email: &str) {
        self.users.lock().unwrap().insert(
            uid.to_string(),
            AuthUser {
                uid: uid.to_string(),
                email: Some(email.to_string()),
                display_name: None,
            },
        );
    }

    pub fn claims_of(&self, uid: &str) -> Option<Value> {
        self.claims.lock().unwrap().get(uid).cloned()
    }

    pub fn has_user(&self, uid: &str) -> bool {
        self.users.lock().unwrap().contains_key(uid)
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn get_user(&self, uid: &str) -> AppResult<Option<AuthUser>> {
        Ok(self.users.lock().unwrap().get(uid).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<Option<AuthUser>> {
        let users = self.users.lock().unwrap();
        Ok(users.values().find(|u| u.email.as_deref() == Some(email)).cloned())
    }

    async fn create_user(&self, email: &str, display_name: &str) -> AppResult<String> {
        let uid = uuid::Uuid::new_v4().to_string();
        self.users.lock().unwrap().insert(
            uid.clone(),
            AuthUser {
                uid: uid.clone(),
                email: Some(email.to_string()),
                display_name: Some(display_name.to_string()),
            },
        );
        Ok(uid)
    }

    async fn delete_user(&self, uid: &str) -> AppResult<()> {
        match self.users.lock().unwrap().remove(uid) {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!("No auth account for {}", uid))),
        }
    }

    async fn set_custom_claims(&self, uid: &str, claims: Value) -> AppResult<()> {
        self.claims.lock().unwrap().insert(uid.to_string(), claims);
        Ok(())
    }

    async fn password_reset_link(&self, email: &str) -> AppResult<String> {
        Ok(format!("https://example.com/reset?email={}", email))
    }

    async fn send_password_reset_email(&self, email: &str) -> AppResult<()> {
        self.reset_emails.lock().unwrap().push(email.to_string());
        Ok(())
    }

    async fn create_custom_token(&self, uid: &str) -> AppResult<String> {
        Ok(format!("custom-token-{}", uid))
    }
}

#[derive(Default)]
pub struct FakeIndex {
    pub records: Mutex<BTreeMap<String, EngineerIndexRecord>>,
    pub queries: Mutex<Vec<IndexQuery>>,
    pub response: Mutex<IndexPage>,
}

impl FakeIndex {
    pub fn record(&self, uid: &str) -> Option<EngineerIndexRecord> {
        self.records.lock().unwrap().get(uid).cloned()
    }

    pub fn last_query(&self) -> Option<IndexQuery> {
        self.queries.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl SearchIndex for FakeIndex {
    async fn save_engineer(&self, record: &EngineerIndexRecord) -> AppResult<()> {
        self.records.lock().unwrap().insert(record.object_id.clone(), record.clone());
        Ok(())
    }

    async fn delete_engineer(&self, uid: &str) -> AppResult<()> {
        self.records.lock().unwrap().remove(uid);
        Ok(())
    }

    async fn search(&self, query: &IndexQuery) -> AppResult<IndexPage> {
        self.queries.lock().unwrap().push(query.clone());
        Ok(self.response.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct FakeStorage {
    pub files: Mutex<Vec<String>>,
}

#[async_trait]
impl FileStorage for FakeStorage {
    async fn delete_prefix(&self, prefix: &str) -> AppResult<u64> {
        let mut files = self.files.lock().unwrap();
        let before = files.len();
        files.retain(|f| !f.starts_with(prefix));
        Ok((before - files.len()) as u64)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Records every message; fails all sends once `fail` is set.
#[derive(Default)]
pub struct FakeMailer {
    pub sent: Mutex<Vec<SentEmail>>,
    pub fail: Mutex<bool>,
}

#[async_trait]
impl Mailer for FakeMailer {
    async fn send(&self, to: &str, subject: &str, html: String) -> AppResult<()> {
        if *self.fail.lock().unwrap() {
            return Err(AppError::ExternalService("SMTP send failed: connection refused".into()));
        }
        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            html,
        });
        Ok(())
    }
}

/// Accepts `Bearer <token>` for every token registered with `allow`.
#[derive(Default)]
pub struct FakeVerifier {
    tokens: Mutex<HashMap<String, FirebaseClaims>>,
}

impl FakeVerifier {
    pub fn allow(&self, token: &str, claims: FirebaseClaims) {
        self.tokens.lock().unwrap().insert(token.to_string(), claims);
    }
}

#[async_trait]
impl TokenVerifier for FakeVerifier {
    async fn verify(&self, token: &str) -> AppResult<FirebaseClaims> {
        self.tokens
            .lock()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Invalid token".into()))
    }
}

/// Fakes wired into an `AppState`, with typed handles kept for assertions.
pub struct TestContext {
    pub repo: Arc<InMemoryRepository>,
    pub identity: Arc<FakeIdentity>,
    pub index: Arc<FakeIndex>,
    pub storage: Arc<FakeStorage>,
    pub mailer: Arc<FakeMailer>,
    pub state: AppState,
}

impl TestContext {
    pub fn new() -> Self {
        let repo = Arc::new(InMemoryRepository::new());
        let identity = Arc::new(FakeIdentity::default());
        let index = Arc::new(FakeIndex::default());
        let storage = Arc::new(FakeStorage::default());
        let mailer = Arc::new(FakeMailer::default());
        let state = AppState {
            repo: repo.clone(),
            identity: identity.clone(),
            index: index.clone(),
            storage: storage.clone(),
            mailer: mailer.clone(),
        };
        Self {
            repo,
            identity,
            index,
            storage,
            mailer,
            state,
        }
    }
}
