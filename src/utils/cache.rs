// Expiring single-value cache for credentials fetched from Google
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

struct Entry<T> {
    value: T,
    expires_at: Instant,
}

pub struct ExpiringCache<T: Clone> {
    entry: RwLock<Option<Entry<T>>>,
}

impl<T: Clone> Default for ExpiringCache<T> {
    fn default() -> Self {
        Self { entry: RwLock::new(None) }
    }
}

impl<T: Clone> ExpiringCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value if it has not expired yet.
    pub async fn get(&self) -> Option<T> {
        let entry = self.entry.read().await;
        entry
            .as_ref()
            .filter(|e| e.expires_at > Instant::now())
            .map(|e| e.value.clone())
    }

    pub async fn set(&self, value: T, ttl: Duration) {
        let mut entry = self.entry.write().await;
        *entry = Some(Entry {
            value,
            expires_at: Instant::now() + ttl,
        });
    }
}
