use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fields the admin listing may be ordered by.
pub const ENGINEER_SORT_FIELDS: &[&str] = &["firstName", "lastName", "city", "suburb", "verified"];

/// Review state of an engineer profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum ProfileState {
    #[serde(rename = "to-be-reviewed")]
    ToBeReviewed,
    #[serde(rename = "verified")]
    Verified,
    #[serde(rename = "request-changes")]
    RequestChanges,
}

impl ProfileState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileState::ToBeReviewed => "to-be-reviewed",
            ProfileState::Verified => "verified",
            ProfileState::RequestChanges => "request-changes",
        }
    }
}

impl fmt::Display for ProfileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed set of events an engineer can sign up for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
pub enum Event {
    Outreach,
    Collaboration,
    Conference,
    Committees,
    Mentoring,
}

impl Event {
    pub const ALL: [Event; 5] = [
        Event::Outreach,
        Event::Collaboration,
        Event::Conference,
        Event::Committees,
        Event::Mentoring,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Event::Outreach => "Outreach",
            Event::Collaboration => "Collaboration",
            Event::Conference => "Conference",
            Event::Committees => "Committees",
            Event::Mentoring => "Mentoring",
        }
    }

    /// Id of the document in the `events` collection.
    pub fn doc_id(&self) -> String {
        self.as_str().to_lowercase()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Event {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Event::ALL
            .iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("Invalid event type: {}", s.to_uppercase()))
    }
}

/// Engineer document (`engineers/{uid}`). The uid is the document id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Engineer {
    #[serde(alias = "_firestore_id", skip_serializing, default)]
    pub uid: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub biography: String,
    #[serde(default)]
    pub linkedin: String,
    #[serde(default)]
    pub personal_website: String,
    #[serde(default)]
    pub organisation: String,
    /// Topic document ids
    #[serde(default)]
    pub topics: Vec<String>,
    /// Event display names
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub suburb: String,
    pub verified: ProfileState,
    #[serde(rename = "profilePictureURL", default)]
    pub profile_picture_url: String,
    #[serde(rename = "introductionVideoURL", default, skip_serializing_if = "Option::is_none")]
    pub introduction_video_url: Option<String>,
}

impl Engineer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn location(&self) -> String {
        format!("{}, {}", self.suburb, self.city)
    }

    /// Value of a sortable field, used for cursor pagination.
    pub fn sort_value(&self, field: &str) -> Option<String> {
        match field {
            "firstName" => Some(self.first_name.clone()),
            "lastName" => Some(self.last_name.clone()),
            "city" => Some(self.city.clone()),
            "suburb" => Some(self.suburb.clone()),
            "verified" => Some(self.verified.as_str().to_string()),
            _ => None,
        }
    }

    pub fn parsed_events(&self) -> Result<Vec<Event>, String> {
        self.events.iter().map(|e| e.parse()).collect()
    }
}

/// Full engineer profile as returned to clients.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EngineerDto {
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub user_id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_website: Option<String>,
    pub verified: ProfileState,
    /// Topic display names
    pub topics: Vec<String>,
    pub events: Vec<Event>,
    pub organisation: String,
    pub position: String,
    pub city: String,
    pub suburb: String,
    #[serde(rename = "profilePictureURL")]
    pub profile_picture_url: String,
    #[serde(rename = "introductionVideoURL", skip_serializing_if = "Option::is_none")]
    pub introduction_video_url: Option<String>,
}

impl EngineerDto {
    pub fn new(engineer: Engineer, topics: Vec<String>, events: Vec<Event>) -> Self {
        Self {
            first_name: engineer.first_name,
            last_name: engineer.last_name,
            bio: engineer.biography,
            user_id: engineer.uid,
            email: engineer.email,
            linkedin: non_empty(engineer.linkedin),
            personal_website: non_empty(engineer.personal_website),
            verified: engineer.verified,
            topics,
            events,
            organisation: engineer.organisation,
            position: engineer.position,
            city: engineer.city,
            suburb: engineer.suburb,
            profile_picture_url: engineer.profile_picture_url,
            introduction_video_url: engineer.introduction_video_url,
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Row of the admin engineer table.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminEngineerItem {
    pub uid: String,
    pub first_name: String,
    pub last_name: String,
    pub professional_title: String,
    pub email: String,
    #[serde(rename = "profilePictureURL")]
    pub profile_picture_url: String,
}

impl From<Engineer> for AdminEngineerItem {
    fn from(engineer: Engineer) -> Self {
        Self {
            uid: engineer.uid,
            first_name: engineer.first_name,
            last_name: engineer.last_name,
            professional_title: engineer.position,
            email: engineer.email,
            profile_picture_url: engineer.profile_picture_url,
        }
    }
}

/// Compact engineer card used by search results and favourites.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EngineerCardDto {
    pub uid: String,
    pub name: String,
    pub location: String,
    pub specialisation: Vec<String>,
    pub position: String,
    pub organisation: String,
    #[serde(rename = "imageURL")]
    pub image_url: String,
}

impl EngineerCardDto {
    pub fn from_engineer(engineer: &Engineer, topic_names: Vec<String>) -> Self {
        Self {
            uid: engineer.uid.clone(),
            name: engineer.full_name(),
            location: engineer.location(),
            specialisation: topic_names,
            position: engineer.position.clone(),
            organisation: engineer.organisation.clone(),
            image_url: engineer.profile_picture_url.clone(),
        }
    }
}

/// Body of `POST /engineers/signup`
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupEngineerRequest {
    pub uid: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub biography: String,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub personal_website: Option<String>,
    #[serde(default)]
    pub organisation: String,
    /// Existing topic ids
    #[serde(default)]
    pub topics: Vec<String>,
    /// Free-text topics that may not exist yet
    #[serde(default)]
    pub new_topics_display_name: Vec<String>,
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub suburb: String,
    #[serde(rename = "profilePictureURL", default)]
    pub profile_picture_url: String,
    #[serde(rename = "introductionVideoURL", default)]
    pub introduction_video_url: Option<String>,
}

/// Body of the edit and resubmit endpoints. `topics` holds display names.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EngineerProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub suburb: String,
    #[serde(default)]
    pub biography: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub personal_website: Option<String>,
    #[serde(rename = "profilePictureURL", default)]
    pub profile_picture_url: String,
    #[serde(rename = "introductionVideoURL", default)]
    pub introduction_video_url: Option<String>,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub organisation: String,
}

/// Body of `POST /engineers/review-engineer-feedback`
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub uid: String,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub sections: Vec<bool>,
    pub verified: ProfileState,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FeedbackQuery {
    /// Engineer uid, defaults to the caller
    pub uid: Option<String>,
}
