//! Single-flight access token refresh
//!
//! All callers that need a new access token while a refresh is running
//! await the same shared future. The slot is tagged with a generation so a
//! late waiter never clears a newer refresh. The refresh itself runs on its
//! own task, so it completes and stores rotated tokens even when every
//! waiter is dropped.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{TimeDelta, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

use super::token;
use crate::error::{RefreshError, TripmateError};
use crate::http::{ApiRequest, HttpTransport};
use crate::models::{RefreshRequest, RefreshResponse};
use crate::session::Session;

pub const REFRESH_PATH: &str = "/api/v1/auth/token/refresh/";

type PendingRefresh = Shared<BoxFuture<'static, Result<String, RefreshError>>>;

struct InFlight {
    generation: u64,
    pending: PendingRefresh,
}

pub struct RefreshCoordinator {
    transport: Arc<dyn HttpTransport>,
    session: Session,
    expiry_buffer: TimeDelta,
    in_flight: Mutex<Option<InFlight>>,
    generations: AtomicU64,
}

fn storage_failure(e: TripmateError) -> RefreshError {
    RefreshError::Storage {
        message: e.to_string(),
    }
}

impl RefreshCoordinator {
    pub fn new(transport: Arc<dyn HttpTransport>, session: Session, expiry_buffer: TimeDelta) -> Self {
        Self {
            transport,
            session,
            expiry_buffer,
            in_flight: Mutex::new(None),
            generations: AtomicU64::new(0),
        }
    }

    /// Obtain a fresh access token.
    ///
    /// `failed_token` is the token the caller found unusable, or `None` when
    /// the caller found no access token at all. If the session now holds a
    /// different, non-expiring token, another caller has refreshed in the
    /// meantime and that token is returned without a new refresh call.
    #[instrument(name = "token_refresh", level = "debug", skip_all)]
    pub async fn refresh(&self, failed_token: Option<&str>) -> Result<String, RefreshError> {
        let (generation, pending) = {
            let mut slot = self.in_flight.lock().await;
            // A finished refresh can linger when all of its waiters were dropped
            let running = slot.as_ref().filter(|f| f.pending.peek().is_none());
            if let Some(in_flight) = running {
                debug!("Joining in-flight token refresh");
                (in_flight.generation, in_flight.pending.clone())
            } else {
                if let Some(current) = self.superseding_token(failed_token).await? {
                    debug!("Access token already replaced, skipping refresh");
                    return Ok(current);
                }
                let generation = self.generations.fetch_add(1, Ordering::Relaxed) + 1;
                let pending = tokio::spawn(perform_refresh(
                    self.transport.clone(),
                    self.session.clone(),
                ))
                .map(|joined| {
                    joined.unwrap_or_else(|e| {
                        Err(RefreshError::Transport {
                            message: format!("refresh task ended abnormally: {e}"),
                        })
                    })
                })
                .boxed()
                .shared();
                *slot = Some(InFlight {
                    generation,
                    pending: pending.clone(),
                });
                (generation, pending)
            }
        };

        let outcome = pending.await;

        let mut slot = self.in_flight.lock().await;
        if slot.as_ref().is_some_and(|f| f.generation == generation) {
            *slot = None;
        }
        outcome
    }

    /// Number of refresh operations started so far
    #[must_use]
    pub fn refreshes_started(&self) -> u64 {
        self.generations.load(Ordering::Relaxed)
    }

    async fn superseding_token(
        &self,
        failed_token: Option<&str>,
    ) -> Result<Option<String>, RefreshError> {
        let current = self.session.access_token().await.map_err(storage_failure)?;
        Ok(current.filter(|current| {
            failed_token != Some(current.as_str())
                && !token::expires_within(current, self.expiry_buffer, Utc::now())
        }))
    }
}

/// Run one refresh; on any failure the whole session is cleared
async fn perform_refresh(
    transport: Arc<dyn HttpTransport>,
    session: Session,
) -> Result<String, RefreshError> {
    let result = request_new_token(transport.as_ref(), &session).await;
    if let Err(e) = &result {
        warn!("Token refresh failed, clearing session: {}", e);
        if let Err(clear_error) = session.clear().await {
            error!("Failed to clear session after refresh failure: {}", clear_error);
        }
    }
    result
}

async fn request_new_token(
    transport: &dyn HttpTransport,
    session: &Session,
) -> Result<String, RefreshError> {
    let refresh = session
        .refresh_token()
        .await
        .map_err(storage_failure)?
        .ok_or(RefreshError::MissingRefreshToken)?;

    let request = ApiRequest::post(REFRESH_PATH)
        .json(&RefreshRequest { refresh })
        .map_err(|e| RefreshError::InvalidResponse {
            message: e.to_string(),
        })?;
    let response = transport
        .execute(request)
        .await
        .map_err(|e| RefreshError::Transport {
            message: e.to_string(),
        })?;

    if !response.is_success() {
        return Err(RefreshError::Rejected {
            status: response.status,
        });
    }

    let tokens: RefreshResponse =
        serde_json::from_str(&response.body).map_err(|e| RefreshError::InvalidResponse {
            message: e.to_string(),
        })?;

    session
        .store_access_token(&tokens.access)
        .await
        .map_err(storage_failure)?;
    if let Some(rotated) = &tokens.refresh {
        session
            .store_refresh_token(rotated)
            .await
            .map_err(storage_failure)?;
    }

    info!("Access token refreshed");
    Ok(tokens.access)
}
