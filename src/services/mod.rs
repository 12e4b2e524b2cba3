pub mod algolia_service;
pub mod engineer_service;
pub mod firebase_auth;
pub mod google_oauth;
pub mod mail_service;
pub mod pagination;
pub mod search_service;
pub mod storage_service;
pub mod testing_service;
pub mod topic_service;
pub mod user_service;

#[cfg(test)]
pub mod fakes;

pub use algolia_service::*;
pub use firebase_auth::*;
pub use google_oauth::*;
pub use mail_service::*;
pub use storage_service::*;
