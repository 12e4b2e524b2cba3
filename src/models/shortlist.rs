use serde::{Deserialize, Serialize};

/// Per-user favourites (`shortlist/{uid}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shortlist {
    #[serde(alias = "_firestore_id", skip_serializing, default)]
    pub uid: String,
    #[serde(default)]
    pub articles: Vec<String>,
    #[serde(default)]
    pub engineers: Vec<String>,
}

impl Shortlist {
    pub fn empty(uid: &str) -> Self {
        Self {
            uid: uid.to_string(),
            articles: vec![],
            engineers: vec![],
        }
    }
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavouriteRequest {
    pub engineer_id: String,
}

/// Paging of `GET /users/favourites/{id}`
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct FavouritesQuery {
    pub start_after: Option<String>,
    pub limit: Option<String>,
}
