use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use super::google_oauth::GoogleCredentials;
use crate::utils::{AppError, AppResult};

const STORAGE_API: &str = "https://storage.googleapis.com/storage/v1";

/// Object storage holding each user's uploads under `{uid}/`.
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Deletes every object whose name starts with `prefix`. Returns how many were deleted.
    async fn delete_prefix(&self, prefix: &str) -> AppResult<u64>;
}

#[derive(Debug, Deserialize)]
struct StorageObject {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectList {
    #[serde(default)]
    items: Vec<StorageObject>,
    #[serde(default)]
    next_page_token: Option<String>,
}

pub struct FirebaseStorage {
    credentials: Arc<GoogleCredentials>,
    http: reqwest::Client,
    bucket: String,
}

impl FirebaseStorage {
    pub fn new(credentials: Arc<GoogleCredentials>, http: reqwest::Client, bucket: String) -> Self {
        Self {
            credentials,
            http,
            bucket,
        }
    }

    async fn list(&self, prefix: &str, page_token: Option<&str>) -> AppResult<ObjectList> {
        let token = self.credentials.access_token().await?;
        let mut query = vec![("prefix", prefix)];
        if let Some(page_token) = page_token {
            query.push(("pageToken", page_token));
        }

        let response = self
            .http
            .get(format!("{}/b/{}/o", STORAGE_API, self.bucket))
            .bearer_auth(token)
            .query(&query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "Listing storage objects failed: {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }

    async fn delete_object(&self, name: &str) -> AppResult<()> {
        let token = self.credentials.access_token().await?;
        let url = format!("{}/b/{}/o/{}", STORAGE_API, self.bucket, urlencoding::encode(name));
        let response = self.http.delete(url).bearer_auth(token).send().await?;

        // Already gone is fine
        if response.status().is_success() || response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }

        Err(AppError::ExternalService(format!(
            "Deleting storage object {} failed: {}",
            name,
            response.status()
        )))
    }
}

#[async_trait]
impl FileStorage for FirebaseStorage {
    async fn delete_prefix(&self, prefix: &str) -> AppResult<u64> {
        let mut deleted = 0;
        let mut page_token: Option<String> = None;

        loop {
            let page = self.list(prefix, page_token.as_deref()).await?;
            for object in &page.items {
                self.delete_object(&object.name).await?;
                deleted += 1;
            }
            match page.next_page_token {
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        log::info!("🗑️  Deleted {} stored files under {}", deleted, prefix);
        Ok(deleted)
    }
}
