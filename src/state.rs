use std::sync::Arc;

use crate::database::Repository;
use crate::services::{FileStorage, IdentityProvider, Mailer, SearchIndex};

/// Backends shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn Repository>,
    pub identity: Arc<dyn IdentityProvider>,
    pub index: Arc<dyn SearchIndex>,
    pub storage: Arc<dyn FileStorage>,
    pub mailer: Arc<dyn Mailer>,
}
