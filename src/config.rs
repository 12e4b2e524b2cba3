use std::env;

/// Runtime configuration read from the environment (and `.env` via dotenv).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Base64 encoded Google service account JSON
    pub firebase_config_base64: String,
    pub firebase_project_id: Option<String>,
    pub firebase_storage_bucket: String,
    pub firebase_api_key: String,
    pub frontend_url: String,
    pub algolia_app_id: String,
    pub algolia_admin_key: String,
    pub algolia_engineer_index: String,
    /// Mailbox the contact form sends from
    pub email_user: String,
    pub email_password: String,
    pub smtp_host: String,
    pub enable_testing_routes: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            host: optional("HOST", "0.0.0.0"),
            port: optional("PORT", "8000")
                .parse()
                .map_err(|e| format!("Invalid PORT value: {}", e))?,
            firebase_config_base64: required("FIREBASE_CONFIG_BASE64")?,
            firebase_project_id: env::var("FIREBASE_PROJECT_ID").ok().filter(|v| !v.is_empty()),
            firebase_storage_bucket: required("FIREBASE_STORAGE_BUCKET")?,
            firebase_api_key: required("FB_AUTH_API_KEY")?,
            frontend_url: optional("FRONTEND_URL", "http://localhost:5173"),
            algolia_app_id: required("ALGOLIA_APP_ID")?,
            algolia_admin_key: required("ALGOLIA_ADMIN_API")?,
            algolia_engineer_index: optional("ALGOLIA_ENGINEER_INDEX", "engineers"),
            email_user: required("EMAIL_USER")?,
            email_password: required("EMAIL_PASSWORD")?,
            smtp_host: optional("SMTP_HOST", "smtp-mail.outlook.com"),
            enable_testing_routes: flag(&optional("ENABLE_TESTING_ROUTES", "false")),
        })
    }
}

fn required(key: &str) -> Result<String, String> {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| format!("{} must be set", key))
}

fn optional(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        log::debug!("{} not set, using default: {}", key, default);
        default.to_string()
    })
}

fn flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
