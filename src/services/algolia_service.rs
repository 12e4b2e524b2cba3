use async_trait::async_trait;
use serde_json::json;

use crate::models::{EngineerIndexRecord, IndexPage, IndexQuery};
use crate::utils::{AppError, AppResult};

/// Search index mirroring verified engineer profiles.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    async fn save_engineer(&self, record: &EngineerIndexRecord) -> AppResult<()>;
    async fn delete_engineer(&self, uid: &str) -> AppResult<()>;
    async fn search(&self, query: &IndexQuery) -> AppResult<IndexPage>;
}

pub struct AlgoliaClient {
    http: reqwest::Client,
    app_id: String,
    api_key: String,
    index: String,
}

impl AlgoliaClient {
    pub fn new(http: reqwest::Client, app_id: String, api_key: String, index: String) -> Self {
        Self {
            http,
            app_id,
            api_key,
            index,
        }
    }

    fn object_url(&self, object_id: &str) -> String {
        format!(
            "https://{}.algolia.net/1/indexes/{}/{}",
            self.app_id,
            urlencoding::encode(&self.index),
            urlencoding::encode(object_id)
        )
    }

    fn query_url(&self) -> String {
        format!(
            "https://{}-dsn.algolia.net/1/indexes/{}/query",
            self.app_id,
            urlencoding::encode(&self.index)
        )
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header("X-Algolia-Application-Id", &self.app_id)
            .header("X-Algolia-API-Key", &self.api_key)
    }

    async fn check(response: reqwest::Response, action: &str) -> AppResult<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        log::error!("❌ Algolia {} failed ({}): {}", action, status, body);
        Err(AppError::ExternalService(format!("Algolia {} failed: {}", action, status)))
    }
}

#[async_trait]
impl SearchIndex for AlgoliaClient {
    async fn save_engineer(&self, record: &EngineerIndexRecord) -> AppResult<()> {
        let response = self
            .request(reqwest::Method::PUT, self.object_url(&record.object_id))
            .json(record)
            .send()
            .await?;
        Self::check(response, "save").await?;
        log::info!("🔎 Indexed engineer {}", record.object_id);
        Ok(())
    }

    async fn delete_engineer(&self, uid: &str) -> AppResult<()> {
        let response = self
            .request(reqwest::Method::DELETE, self.object_url(uid))
            .send()
            .await?;
        Self::check(response, "delete").await?;
        log::info!("🔎 Removed engineer {} from index", uid);
        Ok(())
    }

    async fn search(&self, query: &IndexQuery) -> AppResult<IndexPage> {
        let mut body = json!({
            "query": query.text,
            "page": query.page,
            "hitsPerPage": query.hits_per_page,
        });
        if let Some(filters) = &query.filters {
            body["filters"] = json!(filters);
        }

        let response = self
            .request(reqwest::Method::POST, self.query_url())
            .json(&body)
            .send()
            .await?;
        let response = Self::check(response, "search").await?;

        Ok(response.json().await?)
    }
}
