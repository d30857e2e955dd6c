//! HTTP transport seam and its reqwest implementation

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument, warn};

use super::{ApiRequest, ApiResponse, Method};
use crate::config::ApiConfig;
use crate::error::TripmateError;

/// Sends one request and returns whatever status the backend answered with.
///
/// Implementations never interpret statuses; only transport failures are
/// errors.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TripmateError>;
}

/// Transport talking to the real backend
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Create a new transport from the API configuration
    pub fn new(config: &ApiConfig) -> Result<Self, TripmateError> {
        let timeout = Duration::from_secs(config.timeout_seconds.into());

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| TripmateError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, request: &ApiRequest) -> String {
        format!("{}{}", self.base_url, request.path_and_query())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(name = "http_request", level = "debug", skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TripmateError> {
        let url = self.url_for(&request);
        let start_time = Instant::now();

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Patch => self.client.patch(&url),
            Method::Delete => self.client.delete(&url),
        };
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            warn!("Request to {} failed: {}", url, e);
            TripmateError::network(e.to_string())
        })?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TripmateError::network(format!("Failed to read response body: {e}")))?;

        let elapsed = start_time.elapsed();
        debug!("{} {} -> {} in {:.3}s", request.method, request.path, status, elapsed.as_secs_f64());
        if elapsed.as_secs() > 5 {
            warn!("Slow API response detected: {:.3}s", elapsed.as_secs_f64());
        }

        Ok(ApiResponse::new(status, body))
    }
}
