use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Admin review comments for an engineer (`feedback/{engineerUid}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewFeedback {
    pub feedback: String,
    #[serde(default)]
    pub sections_to_change: Vec<bool>,
}

/// Site feedback left by a visitor (`userFeedback/{id}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFeedback {
    #[serde(alias = "_firestore_id", skip_serializing, default)]
    pub id: String,
    pub email: String,
    pub name: String,
    pub feedback_type: String,
    pub feedback: String,
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub uid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserFeedbackDto {
    pub email: String,
    pub feedback: String,
    /// e.g. `Mon Jan 15 2024`
    pub time: String,
    pub uid: Option<String>,
    pub name: String,
    pub feedback_type: String,
    pub feedback_id: String,
}

impl From<UserFeedback> for UserFeedbackDto {
    fn from(item: UserFeedback) -> Self {
        let time = item.time.format("%a %b %d %Y").to_string();
        Self {
            email: item.email,
            feedback: item.feedback,
            time,
            uid: item.uid,
            name: item.name,
            feedback_type: item.feedback_type,
            feedback_id: item.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct MonthlyFeedback {
    pub month: String,
    pub feedback: Vec<UserFeedbackDto>,
}

#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitUserFeedbackRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub feedback_type: String,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub uid: Option<String>,
}
