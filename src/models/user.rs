use serde::{Deserialize, Serialize};
use std::fmt;

pub const USER_SORT_FIELDS: &[&str] = &["firstName", "lastName", "role"];

/// Role stored on the user document. Teachers are persisted as `Reacher`,
/// the value existing data already carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum Role {
    #[serde(rename = "Admin", alias = "admin")]
    Admin,
    #[serde(rename = "Student", alias = "student")]
    Student,
    #[serde(rename = "Reacher", alias = "Teacher", alias = "teacher")]
    Teacher,
}

impl Role {
    /// Parses the role name sent by the signup form, case-insensitively.
    pub fn from_input(role: &str) -> Option<Role> {
        match role.trim().to_uppercase().as_str() {
            "ADMIN" => Some(Role::Admin),
            "STUDENT" => Some(Role::Student),
            "TEACHER" => Some(Role::Teacher),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Student => "Student",
            Role::Teacher => "Reacher",
        }
    }

    /// Name of the custom auth claim granted to this role.
    pub fn claim(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Student => "student",
            Role::Teacher => "teacher",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User document (`users/{uid}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(alias = "_firestore_id", skip_serializing, default)]
    pub uid: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub school: String,
}

impl User {
    pub fn sort_value(&self, field: &str) -> Option<String> {
        match field {
            "firstName" => Some(self.first_name.clone()),
            "lastName" => Some(self.last_name.clone()),
            "role" => Some(self.role.as_str().to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileDto {
    pub first_name: String,
    pub last_name: String,
    pub school: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for UserProfileDto {
    fn from(user: User) -> Self {
        Self {
            first_name: user.first_name,
            last_name: user.last_name,
            school: user.school,
            email: user.email,
            role: user.role,
        }
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserItem {
    pub uid: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for AdminUserItem {
    fn from(user: User) -> Self {
        Self {
            uid: user.uid,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            role: user.role,
        }
    }
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupUserRequest {
    pub uid: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub school: String,
    pub role: String,
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupAdminRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct PasswordResetRequest {
    pub email: String,
}

/// Body of `POST /users/contact`. `email` is the engineer being contacted.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub your_email: String,
    #[serde(default, alias = "reason")]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub email_message: String,
}

/// Body of `POST /testing/changeuserclaim`
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeClaimRequest {
    pub id: String,
    #[serde(default)]
    pub user_type: String,
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct UserIdRequest {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_input() {
        assert_eq!(Role::from_input("student"), Some(Role::Student));
        assert_eq!(Role::from_input("Teacher"), Some(Role::Teacher));
        assert_eq!(Role::from_input("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::from_input("engineer"), None);
    }

    #[test]
    fn test_teacher_is_stored_as_reacher() {
        assert_eq!(serde_json::to_string(&Role::Teacher).unwrap(), "\"Reacher\"");
        let parsed: Role = serde_json::from_str("\"Teacher\"").unwrap();
        assert_eq!(parsed, Role::Teacher);
        assert_eq!(Role::Teacher.claim(), "teacher");
    }
}
