//! Session state: tokens and the cached user
//!
//! `Session` is the explicit, injectable replacement for a global auth
//! context. It owns nothing but a handle to a [`SessionStore`]; clones share
//! the same storage.

pub mod memory;
pub mod persistent;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::error::TripmateError;
use crate::models::{AuthResponse, User};

pub use memory::MemorySessionStore;
pub use persistent::PersistentSessionStore;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const USER_KEY: &str = "user";

const ALL_KEYS: [&str; 3] = [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY];

/// String key/value storage behind a [`Session`]
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, TripmateError>;
    async fn set(&self, key: &str, value: String) -> Result<(), TripmateError>;
    async fn remove(&self, key: &str) -> Result<(), TripmateError>;
}

#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Session that lives as long as the process
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::default()))
    }

    /// Build the session store selected by configuration
    pub fn from_config(config: &SessionConfig) -> Result<Self, TripmateError> {
        if config.is_persistent() {
            let location = config.resolved_location();
            let ttl = Duration::from_secs(u64::from(config.ttl_hours) * 60 * 60);
            debug!("Opening persistent session at {}", location.display());
            let store = PersistentSessionStore::open(&location, ttl)?;
            Ok(Self::new(Arc::new(store)))
        } else {
            Ok(Self::in_memory())
        }
    }

    pub async fn access_token(&self) -> Result<Option<String>, TripmateError> {
        self.store.get(ACCESS_TOKEN_KEY).await
    }

    pub async fn refresh_token(&self) -> Result<Option<String>, TripmateError> {
        self.store.get(REFRESH_TOKEN_KEY).await
    }

    /// Cached user; an undecodable entry counts as absent
    pub async fn user(&self) -> Result<Option<User>, TripmateError> {
        let Some(raw) = self.store.get(USER_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                debug!("Discarding unreadable cached user: {}", e);
                self.store.remove(USER_KEY).await?;
                Ok(None)
            }
        }
    }

    /// Store tokens and user from a login or registration
    pub async fn store_auth(&self, auth: &AuthResponse) -> Result<(), TripmateError> {
        self.store_access_token(&auth.access).await?;
        self.store_refresh_token(&auth.refresh).await?;
        self.store_user(&auth.user).await?;
        info!("Signed in as {}", auth.user.email);
        Ok(())
    }

    pub async fn store_access_token(&self, token: &str) -> Result<(), TripmateError> {
        self.store.set(ACCESS_TOKEN_KEY, token.to_string()).await
    }

    pub async fn store_refresh_token(&self, token: &str) -> Result<(), TripmateError> {
        self.store.set(REFRESH_TOKEN_KEY, token.to_string()).await
    }

    pub async fn store_user(&self, user: &User) -> Result<(), TripmateError> {
        self.store.set(USER_KEY, serde_json::to_string(user)?).await
    }

    /// Remove every session key
    pub async fn clear(&self) -> Result<(), TripmateError> {
        for key in ALL_KEYS {
            self.store.remove(key).await?;
        }
        debug!("Session cleared");
        Ok(())
    }

    pub async fn is_authenticated(&self) -> Result<bool, TripmateError> {
        Ok(self.access_token().await?.is_some() || self.refresh_token().await?.is_some())
    }

    /// Cached user, or `Unauthenticated` for a signed-out session
    pub async fn require_user(&self) -> Result<User, TripmateError> {
        self.user().await?.ok_or(TripmateError::Unauthenticated)
    }
}
