//! Token refresh protocol against a scripted backend

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use futures::future::join_all;
use serde_json::json;
use tripmate::auth::REFRESH_PATH;
use tripmate::mock::tokens::{self, Claims, TokenKind};
use tripmate::session::{MemorySessionStore, REFRESH_TOKEN_KEY};
use tripmate::{
    ApiRequest, ApiResponse, AuthenticatedClient, HttpTransport, RefreshError, Session,
    SessionStore, TripmateError,
};

const PROTECTED: &str = "/api/v1/offers/mine/";

/// Backend that accepts exactly one access token and counts refreshes
struct ScriptedBackend {
    valid_token: Mutex<String>,
    refresh_calls: AtomicUsize,
    refresh_succeeds: bool,
    always_unauthorized: bool,
    refresh_delay: Duration,
    log: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    fn new(valid_token: &str) -> Self {
        Self {
            valid_token: Mutex::new(valid_token.to_string()),
            refresh_calls: AtomicUsize::new(0),
            refresh_succeeds: true,
            always_unauthorized: false,
            refresh_delay: Duration::from_millis(50),
            log: Mutex::new(Vec::new()),
        }
    }

    fn failing_refresh(mut self) -> Self {
        self.refresh_succeeds = false;
        self
    }

    fn always_unauthorized(mut self) -> Self {
        self.always_unauthorized = true;
        self
    }

    fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for ScriptedBackend {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TripmateError> {
        if request.path == REFRESH_PATH {
            let call = self.refresh_calls.fetch_add(1, Ordering::SeqCst) + 1;
            self.log.lock().unwrap().push("refresh".to_string());
            tokio::time::sleep(self.refresh_delay).await;
            if !self.refresh_succeeds {
                return Ok(ApiResponse::new(401, r#"{"detail":"Token is invalid or expired"}"#));
            }
            let access = format!("fresh-{call}");
            *self.valid_token.lock().unwrap() = access.clone();
            return ApiResponse::json(200, &json!({ "access": access, "refresh": format!("refresh-{}", call + 1) }));
        }

        let bearer = request.bearer.unwrap_or_default();
        self.log
            .lock()
            .unwrap()
            .push(format!("{} {} {}", request.method, request.path, bearer));
        let accepted = !self.always_unauthorized && bearer == *self.valid_token.lock().unwrap();
        if accepted {
            ApiResponse::json(200, &json!([]))
        } else {
            Ok(ApiResponse::new(401, r#"{"detail":"Given token not valid for any token type"}"#))
        }
    }
}

/// Session storage that stalls one chosen read of the refresh token
struct StallingStore {
    inner: MemorySessionStore,
    refresh_reads: AtomicUsize,
    stalled_read: usize,
    stall: Duration,
}

#[async_trait]
impl SessionStore for StallingStore {
    async fn get(&self, key: &str) -> Result<Option<String>, TripmateError> {
        if key == REFRESH_TOKEN_KEY {
            let read = self.refresh_reads.fetch_add(1, Ordering::SeqCst) + 1;
            if read == self.stalled_read {
                tokio::time::sleep(self.stall).await;
            }
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), TripmateError> {
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), TripmateError> {
        self.inner.remove(key).await
    }
}

async fn session_with(access: Option<&str>, refresh: Option<&str>) -> Session {
    let session = Session::in_memory();
    if let Some(access) = access {
        session.store_access_token(access).await.unwrap();
    }
    if let Some(refresh) = refresh {
        session.store_refresh_token(refresh).await.unwrap();
    }
    session
}

fn client(backend: &Arc<ScriptedBackend>, session: Session) -> AuthenticatedClient {
    AuthenticatedClient::new(backend.clone(), session, Duration::from_secs(60))
}

fn token_expiring_in(seconds: i64) -> String {
    tokens::mint(&Claims {
        sub: 1,
        exp: (Utc::now() + TimeDelta::seconds(seconds)).timestamp(),
        typ: TokenKind::Access,
        jti: 99,
    })
    .unwrap()
}

#[tokio::test]
async fn test_concurrent_unauthorized_requests_share_one_refresh() {
    let backend = Arc::new(ScriptedBackend::new("server-side-only"));
    let session = session_with(Some("stale"), Some("refresh-1")).await;
    let client = client(&backend, session.clone());

    let requests = (0..8).map(|_| client.send(ApiRequest::get(PROTECTED)));
    let results = join_all(requests).await;

    for result in results {
        assert_eq!(result.unwrap().status, 200);
    }
    assert_eq!(backend.refresh_calls(), 1);
    assert_eq!(client.refresher().refreshes_started(), 1);
    assert_eq!(session.access_token().await.unwrap().as_deref(), Some("fresh-1"));
    assert_eq!(session.refresh_token().await.unwrap().as_deref(), Some("refresh-2"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_burst_across_threads() {
    let backend = Arc::new(ScriptedBackend::new("server-side-only"));
    let session = session_with(Some("stale"), Some("refresh-1")).await;
    let client = client(&backend, session);

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.send(ApiRequest::get(PROTECTED)).await })
        })
        .collect();
    for handle in handles {
        assert!(handle.await.unwrap().unwrap().is_success());
    }
    assert_eq!(backend.refresh_calls(), 1);
}

#[tokio::test]
async fn test_concurrent_expiring_tokens_share_one_refresh() {
    let expiring = token_expiring_in(10);
    let backend = Arc::new(ScriptedBackend::new(&expiring));
    let session = session_with(Some(&expiring), Some("refresh-1")).await;
    let client = client(&backend, session);

    let results = join_all((0..8).map(|_| client.send(ApiRequest::get(PROTECTED)))).await;

    for result in results {
        assert_eq!(result.unwrap().status, 200);
    }
    assert_eq!(backend.refresh_calls(), 1);
    let sent: Vec<_> = backend
        .log()
        .into_iter()
        .filter(|line| line.starts_with("GET"))
        .collect();
    assert_eq!(sent.len(), 8);
    assert!(sent.iter().all(|line| line.ends_with(" fresh-1")), "{sent:?}");
}

#[tokio::test]
async fn test_concurrent_requests_with_only_refresh_token_share_one_refresh() {
    let backend = Arc::new(ScriptedBackend::new("server-side-only"));
    let session = session_with(None, Some("refresh-1")).await;
    let client = client(&backend, session);

    let results = join_all((0..8).map(|_| client.send(ApiRequest::get(PROTECTED)))).await;

    for result in results {
        assert_eq!(result.unwrap().status, 200);
    }
    assert_eq!(backend.refresh_calls(), 1);
}

#[tokio::test]
async fn test_late_caller_without_access_token_reuses_finished_refresh() {
    let backend = Arc::new(ScriptedBackend::new("server-side-only"));
    // The second caller stalls between seeing no access token and asking for a
    // refresh, long enough for the first refresh to finish and leave the slot.
    let store = StallingStore {
        inner: MemorySessionStore::default(),
        refresh_reads: AtomicUsize::new(0),
        stalled_read: 2,
        stall: Duration::from_millis(300),
    };
    let session = Session::new(Arc::new(store));
    session.store_refresh_token("refresh-1").await.unwrap();
    let client = client(&backend, session.clone());

    let results = join_all((0..2).map(|_| client.send(ApiRequest::get(PROTECTED)))).await;

    for result in results {
        assert_eq!(result.unwrap().status, 200);
    }
    assert_eq!(backend.refresh_calls(), 1);
    assert_eq!(session.access_token().await.unwrap().as_deref(), Some("fresh-1"));

    let reused = client.refresher().refresh(None).await.unwrap();
    assert_eq!(reused, "fresh-1");
    assert_eq!(backend.refresh_calls(), 1);
}

#[tokio::test]
async fn test_refresh_completes_when_every_waiter_is_dropped() {
    let backend = Arc::new(ScriptedBackend::new("server-side-only"));
    let session = session_with(Some("stale"), Some("refresh-1")).await;
    let client = client(&backend, session.clone());

    let abandoned =
        tokio::time::timeout(Duration::from_millis(10), client.send(ApiRequest::get(PROTECTED)))
            .await;
    assert!(abandoned.is_err());

    tokio::time::sleep(Duration::from_millis(150)).await;

    assert_eq!(backend.refresh_calls(), 1);
    assert_eq!(session.access_token().await.unwrap().as_deref(), Some("fresh-1"));
    assert_eq!(session.refresh_token().await.unwrap().as_deref(), Some("refresh-2"));

    let response = client.send(ApiRequest::get(PROTECTED)).await.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(backend.refresh_calls(), 1);

    // The abandoned refresh is finished, so a new failure starts a new one
    let next = client.refresher().refresh(Some("fresh-1")).await.unwrap();
    assert_eq!(next, "fresh-2");
    assert_eq!(backend.refresh_calls(), 2);
}

#[tokio::test]
async fn test_failed_refresh_rejects_every_waiter_and_clears_session() {
    let backend = Arc::new(ScriptedBackend::new("server-side-only").failing_refresh());
    let session = session_with(Some("stale"), Some("refresh-1")).await;
    session
        .store_user(&tripmate::models::User {
            id: 1,
            email: "demo@tripmate.test".to_string(),
            first_name: "Alex".to_string(),
            last_name: "Demo".to_string(),
        })
        .await
        .unwrap();
    let client = client(&backend, session.clone());

    let results = join_all((0..8).map(|_| client.send(ApiRequest::get(PROTECTED)))).await;

    for result in results {
        let err = result.unwrap_err();
        assert!(err.is_auth_failure(), "unexpected error {err:?}");
    }
    assert_eq!(backend.refresh_calls(), 1);
    assert!(session.access_token().await.unwrap().is_none());
    assert!(session.refresh_token().await.unwrap().is_none());
    assert!(session.user().await.unwrap().is_none());
}

#[tokio::test]
async fn test_rejected_refresh_error_carries_status() {
    let backend = Arc::new(ScriptedBackend::new("server-side-only").failing_refresh());
    let session = session_with(Some("stale"), Some("refresh-1")).await;
    let client = client(&backend, session);

    let err = client.send(ApiRequest::get(PROTECTED)).await.unwrap_err();
    assert!(matches!(
        err,
        TripmateError::Refresh(RefreshError::Rejected { status: 401 })
    ));
}

#[tokio::test]
async fn test_expiring_token_is_refreshed_before_sending() {
    let expiring = token_expiring_in(10);
    // The backend would still accept the old token; the refresh must come first anyway
    let backend = Arc::new(ScriptedBackend::new(&expiring));
    let session = session_with(Some(&expiring), Some("refresh-1")).await;
    let client = client(&backend, session);

    let response = client.send(ApiRequest::get(PROTECTED)).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(
        backend.log(),
        vec!["refresh".to_string(), format!("GET {PROTECTED} fresh-1")]
    );
}

#[tokio::test]
async fn test_token_outside_buffer_is_sent_as_is() {
    let valid = token_expiring_in(600);
    let backend = Arc::new(ScriptedBackend::new(&valid));
    let session = session_with(Some(&valid), Some("refresh-1")).await;
    let client = client(&backend, session);

    client.send(ApiRequest::get(PROTECTED)).await.unwrap();
    assert_eq!(backend.refresh_calls(), 0);
    assert_eq!(backend.log(), vec![format!("GET {PROTECTED} {valid}")]);
}

#[tokio::test]
async fn test_retry_happens_once_then_session_expires() {
    let backend = Arc::new(ScriptedBackend::new("server-side-only").always_unauthorized());
    let session = session_with(Some("stale"), Some("refresh-1")).await;
    let client = client(&backend, session.clone());

    let err = client.send(ApiRequest::get(PROTECTED)).await.unwrap_err();

    assert!(matches!(err, TripmateError::SessionExpired));
    assert_eq!(backend.refresh_calls(), 1);
    assert_eq!(
        backend.log(),
        vec![
            format!("GET {PROTECTED} stale"),
            "refresh".to_string(),
            format!("GET {PROTECTED} fresh-1"),
        ]
    );
    assert!(!session.is_authenticated().await.unwrap());
}

#[tokio::test]
async fn test_without_tokens_nothing_is_sent() {
    let backend = Arc::new(ScriptedBackend::new("server-side-only"));
    let client = client(&backend, Session::in_memory());

    let err = client.send(ApiRequest::get(PROTECTED)).await.unwrap_err();

    assert!(matches!(err, TripmateError::Unauthenticated));
    assert!(backend.log().is_empty());
}

#[tokio::test]
async fn test_refresh_token_alone_restores_access() {
    let backend = Arc::new(ScriptedBackend::new("server-side-only"));
    let session = session_with(None, Some("refresh-1")).await;
    let client = client(&backend, session);

    client.send(ApiRequest::get(PROTECTED)).await.unwrap();
    assert_eq!(
        backend.log(),
        vec!["refresh".to_string(), format!("GET {PROTECTED} fresh-1")]
    );
}

#[tokio::test]
async fn test_anonymous_requests_skip_auth() {
    let backend = Arc::new(ScriptedBackend::new("server-side-only"));
    let client = client(&backend, Session::in_memory());

    let response = client
        .send_anonymous(ApiRequest::get("/api/v1/trip-vacancies/"))
        .await
        .unwrap();
    assert_eq!(response.status, 401);
    assert_eq!(backend.refresh_calls(), 0);
}
