use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use super::SessionStore;
use crate::cache::PersistentCache;
use crate::error::TripmateError;

/// Session storage that survives restarts, for command line use
pub struct PersistentSessionStore {
    cache: PersistentCache,
    ttl: Duration,
}

impl PersistentSessionStore {
    pub fn open(path: &Path, ttl: Duration) -> Result<Self, TripmateError> {
        std::fs::create_dir_all(path)?;
        let cache = PersistentCache::open(path).map_err(|e| {
            TripmateError::storage(format!(
                "Failed to open session store at {}: {e}",
                path.display()
            ))
        })?;
        Ok(Self { cache, ttl })
    }
}

fn storage_error(e: anyhow::Error) -> TripmateError {
    TripmateError::storage(e.to_string())
}

#[async_trait]
impl SessionStore for PersistentSessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, TripmateError> {
        self.cache.get(key).await.map_err(storage_error)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), TripmateError> {
        self.cache.put(key, value, self.ttl).await.map_err(storage_error)
    }

    async fn remove(&self, key: &str) -> Result<(), TripmateError> {
        self.cache.remove(key).await.map_err(storage_error)
    }
}
