pub mod repository;

#[cfg(test)]
pub mod memory;

pub use repository::{RefCollection, Repository};

use firestore::FirestoreDb;
use std::env;
use std::error::Error;
use std::path::PathBuf;

pub const ENGINEERS: &str = "engineers";
pub const TOPICS: &str = "topics";
pub const EVENTS: &str = "events";
pub const USERS: &str = "users";
pub const SHORTLIST: &str = "shortlist";
pub const FEEDBACK: &str = "feedback";
pub const USER_FEEDBACK: &str = "userFeedback";

const CREDENTIALS_VAR: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Firestore database holding every collection the directory uses.
#[derive(Clone)]
pub struct Firestore {
    db: FirestoreDb,
}

impl Firestore {
    /// Connects with the service account JSON, unless `GOOGLE_APPLICATION_CREDENTIALS`
    /// already points at a key file.
    pub async fn new(project_id: &str, service_account_json: &[u8]) -> Result<Self, Box<dyn Error>> {
        if env::var(CREDENTIALS_VAR).map_or(true, |path| path.trim().is_empty()) {
            let path = write_key_file(service_account_json)?;
            log::info!("🔑 Using service account key at {}", path.display());
            env::set_var(CREDENTIALS_VAR, &path);
        }

        let db = FirestoreDb::new(project_id).await?;

        // Test connection
        db.fluent().select().from(EVENTS).limit(1).query().await?;

        Ok(Self { db })
    }
}

fn key_file_path() -> PathBuf {
    env::temp_dir().join("wie-directory-service-account.json")
}

fn write_key_file(service_account_json: &[u8]) -> std::io::Result<PathBuf> {
    let path = key_file_path();
    std::fs::write(&path, service_account_json)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_file_written_to_temp_dir() {
        let path = write_key_file(br#"{"project_id":"wie-test"}"#).unwrap();
        assert!(path.starts_with(env::temp_dir()));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), r#"{"project_id":"wie-test"}"#);
    }

    #[tokio::test]
    #[ignore] // Requires Firestore credentials
    async fn test_firestore_connection() {
        dotenv::dotenv().ok();
        let project_id = env::var("FIREBASE_PROJECT_ID").unwrap_or_else(|_| "wie-test".to_string());

        let db = Firestore::new(&project_id, b"").await;
        assert!(db.is_ok());
    }
}
