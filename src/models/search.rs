use serde::{Deserialize, Serialize};

use super::engineer::{Engineer, EngineerCardDto};

/// Object mirrored into the search index for every verified engineer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineerIndexRecord {
    #[serde(rename = "objectID")]
    pub object_id: String,
    pub name: String,
    pub location: String,
    pub position: String,
    pub organisation: String,
    /// Topic display names
    pub topics: Vec<String>,
    pub events: Vec<String>,
    pub bio: String,
    #[serde(rename = "imageURL")]
    pub image_url: String,
}

impl EngineerIndexRecord {
    pub fn from_engineer(engineer: &Engineer, topic_names: Vec<String>) -> Self {
        Self {
            object_id: engineer.uid.clone(),
            name: engineer.full_name(),
            location: engineer.location(),
            position: engineer.position.clone(),
            organisation: engineer.organisation.clone(),
            topics: topic_names,
            events: engineer.events.clone(),
            bio: engineer.biography.clone(),
            image_url: engineer.profile_picture_url.clone(),
        }
    }
}

/// Body of `POST /search`. Page and limit may arrive as numbers or numeric strings.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    #[schema(value_type = Option<i64>)]
    pub page_number: Option<serde_json::Value>,
    #[serde(default)]
    #[schema(value_type = Option<i64>)]
    pub limit: Option<serde_json::Value>,
    #[serde(default)]
    pub general_search: String,
    #[serde(default)]
    pub specialisations: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
}

/// Query sent to the search index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexQuery {
    pub text: String,
    pub filters: Option<String>,
    pub page: u32,
    pub hits_per_page: u32,
}

/// One hit as returned by the index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexHit {
    #[serde(rename = "objectID")]
    pub object_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub organisation: String,
    #[serde(rename = "imageURL", default)]
    pub image_url: String,
}

impl From<IndexHit> for EngineerCardDto {
    fn from(hit: IndexHit) -> Self {
        Self {
            uid: hit.object_id,
            name: hit.name,
            location: hit.location,
            specialisation: hit.topics,
            position: hit.position,
            organisation: hit.organisation,
            image_url: hit.image_url,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexPage {
    #[serde(default)]
    pub hits: Vec<IndexHit>,
    #[serde(default)]
    pub nb_pages: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults {
    pub total_pages: u32,
    pub engineers: Vec<EngineerCardDto>,
}
