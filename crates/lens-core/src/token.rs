//! Bearer token model and the ports that persist and acquire it.

use crate::error::Result;
use base64::Engine;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use serde_json::Value;
use std::fmt;

/// Extracts the `exp` claim (seconds since epoch) from a JWT-shaped token.
///
/// Returns `None` for anything that is not `<header>.<payload>[.<sig>]` with a
/// base64 JSON payload carrying a numeric `exp`. Fractional claims are rounded
/// up, so `exp > now` keeps its meaning for integer `now`. Never panics.
pub fn decode_expiry(token: &str) -> Option<i64> {
    let mut segments = token.split('.');
    let _header = segments.next()?;
    let payload = segments.next()?.trim_end_matches('=');

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD_NO_PAD.decode(payload))
        .ok()?;
    let claims: Value = serde_json::from_slice(&bytes).ok()?;

    let exp = claims.get("exp")?;
    exp.as_i64()
        .or_else(|| exp.as_f64().filter(|secs| secs.is_finite()).map(|secs| secs.ceil() as i64))
}

/// An opaque bearer credential issued by the auth endpoint.
///
/// Tokens are superseded, never mutated: a fresh acquisition produces a new
/// value that overwrites the stored one.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Embedded expiry, if the payload can be decoded.
    pub fn expires_at(&self) -> Option<i64> {
        decode_expiry(&self.0)
    }

    /// A token is usable only if its expiry is strictly after `now`.
    /// Undecodable tokens are never valid.
    pub fn is_valid_at(&self, now: i64) -> bool {
        matches!(self.expires_at(), Some(exp) if exp > now)
    }
}

// Keep credentials out of logs and panic messages.
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionToken").field(&"<redacted>").finish()
    }
}

/// Durable single-slot storage for the last acquired token.
///
/// This is a pure key-value surface: no expiry logic lives here. Implementations
/// must survive process restarts (the page-reload equivalent) unless they are
/// explicitly ephemeral.
#[async_trait::async_trait]
pub trait TokenStore: Send + Sync {
    /// Returns the last persisted token, or `None` if none was ever stored.
    async fn read(&self) -> Result<Option<String>>;

    /// Persists `token`, overwriting any previous value.
    async fn write(&self, token: &str) -> Result<()>;
}

/// The token acquisition endpoint.
#[async_trait::async_trait]
pub trait TokenProvider: Send + Sync {
    /// Requests a fresh token. Sends no payload.
    ///
    /// # Errors
    ///
    /// `LensError::TokenAcquisition` if the endpoint is unreachable, answers
    /// with a non-success status, or returns no usable token.
    async fn acquire_token(&self) -> Result<SessionToken>;
}
