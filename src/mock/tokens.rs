//! Unsigned JWT-shaped tokens for the mock backend
//!
//! Tokens carry `{sub, exp, typ, jti}` in a base64url payload so the real
//! expiry decoding in [`crate::auth::token`] works against them. There is no
//! signature; the mock trusts whatever it minted.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TripmateError;
use crate::models::UserId;

const HEADER: &str = r#"{"alg":"none","typ":"JWT"}"#;
const SIGNATURE: &str = "mock";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: UserId,
    pub exp: i64,
    pub typ: TokenKind,
    /// Makes every minted token unique, so rotation and revocation work
    pub jti: u64,
}

impl Claims {
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }
}

pub fn mint(claims: &Claims) -> Result<String, TripmateError> {
    let payload = serde_json::to_vec(claims)?;
    Ok(format!(
        "{}.{}.{}",
        URL_SAFE_NO_PAD.encode(HEADER),
        URL_SAFE_NO_PAD.encode(payload),
        SIGNATURE
    ))
}

/// Claims of a token minted by [`mint`]; `None` for anything else
#[must_use]
pub fn decode(token: &str) -> Option<Claims> {
    let mut parts = token.split('.');
    let (_, payload, signature) = (parts.next()?, parts.next()?, parts.next()?);
    if signature != SIGNATURE || parts.next().is_some() {
        return None;
    }
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}
