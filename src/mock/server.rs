//! `HttpTransport` that answers from the in-memory store

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, TimeDelta, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use super::store::{MockResult, MockStore, Rejection};
use super::tokens::{self, Claims, TokenKind};
use crate::api::API_PREFIX;
use crate::error::TripmateError;
use crate::filters::{TripRequestFilter, VacancyFilter};
use crate::http::{ApiRequest, ApiResponse, HttpTransport, Method};
use crate::models::{
    AuthResponse, Credentials, OfferPayload, ProfileUpdate, RefreshRequest, RefreshResponse,
    Registration, TripRequestPayload, UserId, VacancyPayload,
};

pub const DEFAULT_ACCESS_TTL_MINUTES: i64 = 15;
pub const DEFAULT_REFRESH_TTL_DAYS: i64 = 7;

const INVALID_TOKEN: &str = "Given token not valid for any token type";

/// In-process stand-in for the REST backend
pub struct MockServer {
    store: Mutex<MockStore>,
    access_ttl: TimeDelta,
    refresh_ttl: TimeDelta,
    last_jti: AtomicU64,
    refreshes: AtomicUsize,
}

impl std::fmt::Debug for MockServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockServer")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

fn respond<T: Serialize + ?Sized>(status: u16, value: &T) -> MockResult<ApiResponse> {
    ApiResponse::json(status, value).map_err(|e| Rejection::Internal(e.to_string()))
}

fn body<T: DeserializeOwned>(request: &ApiRequest) -> MockResult<T> {
    let value = request
        .body
        .clone()
        .ok_or_else(|| Rejection::form("No data provided."))?;
    serde_json::from_value(value).map_err(|e| Rejection::form(&format!("Malformed request: {e}")))
}

fn parse_id(segment: &str) -> MockResult<u64> {
    segment
        .parse()
        .map_err(|_| Rejection::NotFound("Not found.".to_string()))
}

impl MockServer {
    pub fn new(store: MockStore) -> Self {
        Self {
            store: Mutex::new(store),
            access_ttl: TimeDelta::minutes(DEFAULT_ACCESS_TTL_MINUTES),
            refresh_ttl: TimeDelta::days(DEFAULT_REFRESH_TTL_DAYS),
            last_jti: AtomicU64::new(0),
            refreshes: AtomicUsize::new(0),
        }
    }

    /// Server over the seed data, with trips dated relative to `today`
    #[must_use]
    pub fn seeded(today: NaiveDate) -> Self {
        Self::new(MockStore::seeded(today))
    }

    /// Lifetime of newly issued access tokens
    #[must_use]
    pub fn with_access_ttl(mut self, ttl: TimeDelta) -> Self {
        self.access_ttl = ttl;
        self
    }

    /// Number of successful token refreshes served
    pub fn refreshes_served(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    fn mint(&self, user_id: UserId, typ: TokenKind, ttl: TimeDelta) -> MockResult<String> {
        let claims = Claims {
            sub: user_id,
            exp: (Utc::now() + ttl).timestamp(),
            typ,
            jti: self.last_jti.fetch_add(1, Ordering::SeqCst) + 1,
        };
        tokens::mint(&claims).map_err(|e| Rejection::Internal(e.to_string()))
    }

    fn issue_access(&self, user_id: UserId) -> MockResult<String> {
        self.mint(user_id, TokenKind::Access, self.access_ttl)
    }

    fn issue_refresh(&self, user_id: UserId) -> MockResult<String> {
        self.mint(user_id, TokenKind::Refresh, self.refresh_ttl)
    }

    /// Resolve the bearer token to a known user
    fn authenticate(&self, store: &MockStore, request: &ApiRequest) -> MockResult<UserId> {
        let token = request.bearer.as_deref().ok_or_else(|| {
            Rejection::Unauthorized("Authentication credentials were not provided.".to_string())
        })?;
        tokens::decode(token)
            .filter(|claims| claims.typ == TokenKind::Access && !claims.is_expired(Utc::now()))
            .filter(|claims| store.user(claims.sub).is_some())
            .map(|claims| claims.sub)
            .ok_or_else(|| Rejection::Unauthorized(INVALID_TOKEN.to_string()))
    }

    fn sign_in(&self, store: &MockStore, user_id: UserId) -> MockResult<ApiResponse> {
        let user = store
            .user(user_id)
            .cloned()
            .ok_or_else(|| Rejection::Unauthorized(INVALID_TOKEN.to_string()))?;
        let auth = AuthResponse {
            access: self.issue_access(user_id)?,
            refresh: self.issue_refresh(user_id)?,
            user,
        };
        respond(200, &auth)
    }

    /// Exchange a refresh token, rotating it
    fn refresh(&self, store: &mut MockStore, request: &RefreshRequest) -> MockResult<ApiResponse> {
        let claims = tokens::decode(&request.refresh)
            .filter(|claims| claims.typ == TokenKind::Refresh && !claims.is_expired(Utc::now()))
            .filter(|_| !store.is_revoked(&request.refresh))
            .filter(|claims| store.user(claims.sub).is_some())
            .ok_or_else(|| Rejection::Unauthorized("Token is invalid or expired".to_string()))?;
        store.revoke(&request.refresh);
        let response = RefreshResponse {
            access: self.issue_access(claims.sub)?,
            refresh: Some(self.issue_refresh(claims.sub)?),
        };
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        respond(200, &response)
    }

    async fn route(&self, request: &ApiRequest) -> MockResult<ApiResponse> {
        let path = request
            .path
            .strip_prefix(API_PREFIX)
            .ok_or_else(|| Rejection::NotFound("Not found.".to_string()))?;
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut store = self.store.lock().await;

        match (request.method, segments.as_slice()) {
            // Auth
            (Method::Post, ["auth", "login"]) => {
                let credentials: Credentials = body(request)?;
                let user = store.authenticate(&credentials.email, &credentials.password)?;
                self.sign_in(&store, user.id)
            }
            (Method::Post, ["auth", "register"]) => {
                let registration: Registration = body(request)?;
                let user = store.register(&registration)?;
                let mut response = self.sign_in(&store, user.id)?;
                response.status = 201;
                Ok(response)
            }
            (Method::Post, ["auth", "token", "refresh"]) => {
                let refresh: RefreshRequest = body(request)?;
                self.refresh(&mut store, &refresh)
            }
            (Method::Post, ["auth", "logout"]) => {
                self.authenticate(&store, request)?;
                let refresh: RefreshRequest = body(request)?;
                store.revoke(&refresh.refresh);
                Ok(ApiResponse::new(205, ""))
            }
            (Method::Get, ["auth", "me"]) => {
                let user_id = self.authenticate(&store, request)?;
                respond(200, &store.user(user_id))
            }

            // Profiles and option catalogs
            (Method::Get, ["profiles", "languages"]) => respond(200, store.languages()),
            (Method::Get, ["profiles", "interests"]) => respond(200, store.interests()),
            (Method::Get, ["profiles", "travel-styles"]) => respond(200, store.travel_styles()),
            (Method::Get, ["profiles", "me"]) => {
                let user_id = self.authenticate(&store, request)?;
                respond(200, &store.profile(user_id)?)
            }
            (Method::Patch, ["profiles", "me"]) => {
                let user_id = self.authenticate(&store, request)?;
                let update: ProfileUpdate = body(request)?;
                respond(200, &store.update_profile(user_id, &update)?)
            }
            (Method::Get, ["profiles", id]) => {
                self.authenticate(&store, request)?;
                respond(200, &store.profile(parse_id(id)?)?)
            }

            // Trip vacancies
            (Method::Get, ["trip-vacancies"]) => {
                let filter = VacancyFilter::from_query(&request.query)
                    .map_err(|e| Rejection::Invalid(e.form_errors().cloned().unwrap_or_default()))?;
                respond(200, &store.list_vacancies(&filter, &request.path)?)
            }
            (Method::Post, ["trip-vacancies"]) => {
                let user_id = self.authenticate(&store, request)?;
                let payload: VacancyPayload = body(request)?;
                respond(201, &store.create_vacancy(user_id, &payload)?)
            }
            (Method::Get, ["trip-vacancies", "mine"]) => {
                let user_id = self.authenticate(&store, request)?;
                respond(200, &store.vacancies_of(user_id))
            }
            (Method::Get, ["trip-vacancies", id]) => respond(200, &store.vacancy(parse_id(id)?)?),
            (Method::Patch, ["trip-vacancies", id]) => {
                let user_id = self.authenticate(&store, request)?;
                let payload: VacancyPayload = body(request)?;
                respond(200, &store.update_vacancy(user_id, parse_id(id)?, &payload)?)
            }
            (Method::Delete, ["trip-vacancies", id]) => {
                let user_id = self.authenticate(&store, request)?;
                store.delete_vacancy(user_id, parse_id(id)?)?;
                Ok(ApiResponse::new(204, ""))
            }
            (Method::Get, ["trip-vacancies", id, "offers"]) => {
                let user_id = self.authenticate(&store, request)?;
                respond(200, &store.offers_for_vacancy(user_id, parse_id(id)?)?)
            }

            // Trip requests
            (Method::Get, ["trip-requests"]) => {
                let filter = TripRequestFilter::from_query(&request.query)
                    .map_err(|e| Rejection::Invalid(e.form_errors().cloned().unwrap_or_default()))?;
                respond(200, &store.list_trip_requests(&filter, &request.path)?)
            }
            (Method::Post, ["trip-requests"]) => {
                let user_id = self.authenticate(&store, request)?;
                let payload: TripRequestPayload = body(request)?;
                respond(201, &store.create_trip_request(user_id, &payload)?)
            }
            (Method::Get, ["trip-requests", "mine"]) => {
                let user_id = self.authenticate(&store, request)?;
                respond(200, &store.trip_requests_of(user_id))
            }
            (Method::Delete, ["trip-requests", id]) => {
                let user_id = self.authenticate(&store, request)?;
                store.delete_trip_request(user_id, parse_id(id)?)?;
                Ok(ApiResponse::new(204, ""))
            }

            // Offers
            (Method::Post, ["offers"]) => {
                let user_id = self.authenticate(&store, request)?;
                let payload: OfferPayload = body(request)?;
                respond(201, &store.submit_offer(user_id, &payload)?)
            }
            (Method::Get, ["offers", "mine"]) => {
                let user_id = self.authenticate(&store, request)?;
                respond(200, &store.offers_from(user_id))
            }
            (Method::Post, ["offers", id, action]) => {
                let user_id = self.authenticate(&store, request)?;
                let id = parse_id(id)?;
                let offer = match *action {
                    "accept" => store.decide_offer(user_id, id, true)?,
                    "reject" => store.decide_offer(user_id, id, false)?,
                    "withdraw" => store.withdraw_offer(user_id, id)?,
                    _ => return Err(Rejection::NotFound("Not found.".to_string())),
                };
                respond(200, &offer)
            }

            _ => Err(Rejection::NotFound("Not found.".to_string())),
        }
    }
}

#[async_trait]
impl HttpTransport for MockServer {
    #[instrument(name = "mock_request", level = "debug", skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TripmateError> {
        match self.route(&request).await {
            Ok(response) => Ok(response),
            Err(rejection) => {
                debug!("Mock backend rejected request with {}", rejection.status());
                Ok(ApiResponse::new(rejection.status(), rejection.body().to_string()))
            }
        }
    }
}
