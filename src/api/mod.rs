//! Typed client for the Tripmate REST API
//!
//! Operations are grouped by backend resource in the submodules; all of them
//! hang off [`TripmateClient`]. Public reads go out without credentials,
//! everything else through the [`AuthenticatedClient`].

mod auth;
mod offers;
mod profiles;
mod trip_requests;
mod vacancies;

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::auth::AuthenticatedClient;
use crate::config::{AuthConfig, TripmateConfig};
use crate::error::TripmateError;
use crate::http::{ApiRequest, HttpTransport, ReqwestTransport};
use crate::session::Session;

pub const API_PREFIX: &str = "/api/v1";

/// Build an absolute API path from a resource-relative one
pub(crate) fn endpoint(resource: &str) -> String {
    format!("{API_PREFIX}/{}", resource.trim_start_matches('/'))
}

#[derive(Clone)]
pub struct TripmateClient {
    http: AuthenticatedClient,
}

impl TripmateClient {
    pub fn new(http: AuthenticatedClient) -> Self {
        Self { http }
    }

    /// Client for the configured backend
    pub fn from_config(config: &TripmateConfig, session: Session) -> Result<Self, TripmateError> {
        let transport = ReqwestTransport::new(&config.api)?;
        Ok(Self::with_transport(Arc::new(transport), session, &config.auth))
    }

    /// Client over any transport, e.g. the in-memory mock server
    pub fn with_transport(
        transport: Arc<dyn HttpTransport>,
        session: Session,
        auth: &AuthConfig,
    ) -> Self {
        Self::new(AuthenticatedClient::from_config(transport, session, auth))
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        self.http.session()
    }

    #[must_use]
    pub fn http(&self) -> &AuthenticatedClient {
        &self.http
    }

    async fn public<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, TripmateError> {
        self.http.send_anonymous(request).await?.into_json()
    }

    async fn authed<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, TripmateError> {
        self.http.send(request).await?.into_json()
    }

    async fn authed_empty(&self, request: ApiRequest) -> Result<(), TripmateError> {
        self.http.send(request).await?.into_empty()
    }
}
