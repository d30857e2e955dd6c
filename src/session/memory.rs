use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::SessionStore;
use crate::error::TripmateError;

/// Process-lifetime session storage
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    values: RwLock<HashMap<String, String>>,
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, TripmateError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), TripmateError> {
        self.values.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), TripmateError> {
        self.values.write().await.remove(key);
        Ok(())
    }
}
