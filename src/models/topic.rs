use serde::{Deserialize, Serialize};

/// Topic document (`topics/{key}`), keeps the reverse references to engineers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    #[serde(alias = "_firestore_id", skip_serializing, default)]
    pub key: String,
    pub topic_name: String,
    #[serde(default)]
    pub engineers: Vec<String>,
    #[serde(default)]
    pub articles: Vec<String>,
}

impl Topic {
    pub fn new(key: &str, display_name: &str, engineer_uid: &str) -> Self {
        Self {
            key: key.to_string(),
            topic_name: display_name.to_string(),
            engineers: vec![engineer_uid.to_string()],
            articles: vec![],
        }
    }
}

/// Event document (`events/{lowercase name}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDoc {
    #[serde(alias = "_firestore_id", skip_serializing, default)]
    pub key: String,
    #[serde(default)]
    pub engineers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct TopicDto {
    #[serde(rename = "topicDBName")]
    pub topic_db_name: String,
    #[serde(rename = "topicDisplayName")]
    pub topic_display_name: String,
}

impl From<Topic> for TopicDto {
    fn from(topic: Topic) -> Self {
        Self {
            topic_db_name: topic.key,
            topic_display_name: topic.topic_name,
        }
    }
}
