//! Bearer token inspection
//!
//! Tokens are JWTs. Only the `exp` claim is read, and the signature is never
//! checked: the backend stays the authority on validity.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ExpiryClaim {
    exp: Option<i64>,
}

/// Expiry time encoded in the token, if it can be read
#[must_use]
pub fn decode_expiry(token: &str) -> Option<DateTime<Utc>> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    let claim: ExpiryClaim = serde_json::from_slice(&bytes).ok()?;
    DateTime::from_timestamp(claim.exp?, 0)
}

/// True when the token expires at or before `now + buffer`.
///
/// Tokens without a readable expiry are never considered expiring; a 401
/// from the backend is the fallback signal for those.
#[must_use]
pub fn expires_within(token: &str, buffer: TimeDelta, now: DateTime<Utc>) -> bool {
    decode_expiry(token).is_some_and(|expiry| expiry <= now + buffer)
}
