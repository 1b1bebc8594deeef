//! Signed session cookie handling.
//!
//! A session is just a user id carried in a cookie whose value is
//! `<user_id>.<hex HMAC-SHA256(secret, user_id)>`. A cookie that is missing,
//! malformed, or fails verification is treated as no session at all.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use parley_types::chat::UserId;

use crate::http::error::AppError;
use crate::state::AppState;

type HmacSha256 = Hmac<Sha256>;

/// Issues and verifies session cookies.
///
/// Does not derive Debug; it holds the keyed MAC state.
#[derive(Clone)]
pub struct SessionSigner {
    mac: HmacSha256,
    cookie_name: String,
}

impl SessionSigner {
    pub fn new(secret: &SecretString, cookie_name: impl Into<String>) -> anyhow::Result<Self> {
        let mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
            .map_err(|e| anyhow::anyhow!("invalid session secret: {e}"))?;
        Ok(Self {
            mac,
            cookie_name: cookie_name.into(),
        })
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Cookie value for `user_id`: the id followed by its hex signature.
    pub fn sign(&self, user_id: &UserId) -> String {
        let mut mac = self.mac.clone();
        mac.update(user_id.as_str().as_bytes());
        format!("{}.{:x}", user_id, mac.finalize().into_bytes())
    }

    /// Recover the user id from a cookie value, if the signature checks out.
    pub fn verify(&self, value: &str) -> Option<UserId> {
        let (user_id, signature_hex) = value.rsplit_once('.')?;
        if user_id.is_empty() {
            return None;
        }
        let signature = hex_decode(signature_hex).ok()?;

        let mut mac = self.mac.clone();
        mac.update(user_id.as_bytes());
        mac.verify_slice(&signature).ok()?;
        Some(UserId::from(user_id))
    }

    /// Full `Set-Cookie` header value establishing a session for `user_id`.
    pub fn set_cookie(&self, user_id: &UserId) -> String {
        format!(
            "{}={}; HttpOnly; Path=/; SameSite=Lax",
            self.cookie_name,
            self.sign(user_id)
        )
    }

    /// `Cookie` request header value carrying a session for `user_id`.
    pub fn cookie_header(&self, user_id: &UserId) -> String {
        format!("{}={}", self.cookie_name, self.sign(user_id))
    }

    /// Find and verify the session cookie among the request's `Cookie` headers.
    pub fn user_from_headers(&self, headers: &HeaderMap) -> Option<UserId> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|raw| raw.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .filter(|(name, _)| *name == self.cookie_name)
            .find_map(|(_, value)| self.verify(value))
    }
}

/// Decode a hex string into bytes.
fn hex_decode(hex: &str) -> Result<Vec<u8>, String> {
    if hex.len() % 2 != 0 {
        return Err("odd-length hex string".to_string());
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            hex.get(i..i + 2)
                .ok_or_else(|| "invalid hex".to_string())
                .and_then(|pair| u8::from_str_radix(pair, 16).map_err(|e| e.to_string()))
        })
        .collect()
}

/// Verified session identity. Rejects with 401 when absent.
pub struct Session(pub UserId);

impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        state
            .sessions
            .user_from_headers(&parts.headers)
            .map(Session)
            .ok_or(AppError::SessionExpired)
    }
}

/// Session identity if present; never rejects.
pub struct MaybeSession(pub Option<UserId>);

impl FromRequestParts<AppState> for MaybeSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeSession(state.sessions.user_from_headers(&parts.headers)))
    }
}
