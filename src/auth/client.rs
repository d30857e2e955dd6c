//! Bearer-authenticated requests with transparent token refresh

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use tracing::{debug, instrument, warn};

use super::refresh::RefreshCoordinator;
use super::token;
use crate::config::AuthConfig;
use crate::error::TripmateError;
use crate::http::{ApiRequest, ApiResponse, HttpTransport};
use crate::session::Session;

/// Wraps a transport so every request carries a valid bearer token.
///
/// - A token inside the expiry buffer is refreshed before sending.
/// - A 401 triggers one refresh and exactly one retry.
/// - Concurrent refreshes collapse into one (see [`RefreshCoordinator`]).
/// - A failed refresh clears the session and fails every waiter.
#[derive(Clone)]
pub struct AuthenticatedClient {
    transport: Arc<dyn HttpTransport>,
    session: Session,
    refresher: Arc<RefreshCoordinator>,
    expiry_buffer: TimeDelta,
}

impl AuthenticatedClient {
    pub fn new(transport: Arc<dyn HttpTransport>, session: Session, expiry_buffer: Duration) -> Self {
        let expiry_buffer = TimeDelta::from_std(expiry_buffer).unwrap_or_else(|_| TimeDelta::zero());
        let refresher = Arc::new(RefreshCoordinator::new(
            transport.clone(),
            session.clone(),
            expiry_buffer,
        ));
        Self {
            transport,
            session,
            refresher,
            expiry_buffer,
        }
    }

    pub fn from_config(
        transport: Arc<dyn HttpTransport>,
        session: Session,
        config: &AuthConfig,
    ) -> Self {
        Self::new(
            transport,
            session,
            Duration::from_secs(config.expiry_buffer_seconds.into()),
        )
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn refresher(&self) -> &RefreshCoordinator {
        &self.refresher
    }

    /// Send without credentials, for public endpoints
    pub async fn send_anonymous(&self, request: ApiRequest) -> Result<ApiResponse, TripmateError> {
        self.transport.execute(request).await
    }

    /// Send with the session's bearer token
    #[instrument(name = "authenticated_request", level = "debug", skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TripmateError> {
        let token = self.usable_access_token().await?;

        let response = self
            .transport
            .execute(request.clone().with_bearer(&token))
            .await?;
        if !response.is_unauthorized() {
            return Ok(response);
        }

        warn!("Access token rejected, refreshing and retrying once");
        let fresh = self.refresher.refresh(Some(&token)).await?;
        let retried = self.transport.execute(request.with_bearer(&fresh)).await?;
        if retried.is_unauthorized() {
            warn!("Refreshed token rejected as well, ending session");
            self.session.clear().await?;
            return Err(TripmateError::SessionExpired);
        }
        Ok(retried)
    }

    /// Current token, refreshed first when missing or about to expire
    async fn usable_access_token(&self) -> Result<String, TripmateError> {
        match self.session.access_token().await? {
            Some(token) if token::expires_within(&token, self.expiry_buffer, Utc::now()) => {
                debug!("Access token expires within buffer, refreshing before send");
                Ok(self.refresher.refresh(Some(&token)).await?)
            }
            Some(token) => Ok(token),
            None if self.session.refresh_token().await?.is_some() => {
                debug!("No access token, refreshing from stored refresh token");
                Ok(self.refresher.refresh(None).await?)
            }
            None => {
                self.session.clear().await?;
                Err(TripmateError::Unauthenticated)
            }
        }
    }
}
