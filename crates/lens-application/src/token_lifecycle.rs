//! Bearer token lifecycle.
//!
//! Decides whether the stored token is still usable and, if not, acquires and
//! persists a fresh one. Pre-warming on view load and the submit-time check go
//! through the same [`TokenLifecycleManager::ensure_valid_token`] path.

use lens_core::{Clock, LensError, Result, SessionToken, TokenProvider, TokenStore};
use std::sync::Arc;

pub struct TokenLifecycleManager {
    store: Arc<dyn TokenStore>,
    provider: Arc<dyn TokenProvider>,
    clock: Arc<dyn Clock>,
}

impl TokenLifecycleManager {
    pub fn new(
        store: Arc<dyn TokenStore>,
        provider: Arc<dyn TokenProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            provider,
            clock,
        }
    }

    /// Returns a token that is valid at the moment of return.
    ///
    /// The stored token is returned unchanged if its expiry is strictly in the
    /// future. Otherwise (absent, undecodable, or expired) a new token is
    /// acquired, persisted and returned.
    ///
    /// # Errors
    ///
    /// `LensError::TokenAcquisition` if acquisition or persistence fails.
    /// Nothing is retried here.
    pub async fn ensure_valid_token(&self) -> Result<SessionToken> {
        if let Some(token) = self.usable_stored_token().await {
            tracing::debug!("[TokenLifecycle] Reusing stored token");
            return Ok(token);
        }

        self.acquire().await
    }

    /// Opportunistic `ensure_valid_token` for view load. Failures are logged
    /// and dropped; the submit path will try again.
    pub async fn prewarm(&self) {
        if let Err(e) = self.ensure_valid_token().await {
            tracing::warn!(error.kind = e.kind(), "[TokenLifecycle] Pre-warm failed: {}", e);
        }
    }

    async fn usable_stored_token(&self) -> Option<SessionToken> {
        let stored = match self.store.read().await {
            Ok(stored) => stored?,
            Err(e) => {
                tracing::warn!("[TokenLifecycle] Token store read failed, treating as absent: {}", e);
                return None;
            }
        };

        let token = SessionToken::new(stored);
        let now = self.clock.now();
        match token.expires_at() {
            Some(exp) if exp > now => Some(token),
            Some(exp) => {
                tracing::debug!(exp, now, "[TokenLifecycle] Stored token expired");
                None
            }
            None => {
                tracing::debug!(
                    error.kind = LensError::MalformedToken.kind(),
                    "[TokenLifecycle] Stored token is undecodable"
                );
                None
            }
        }
    }

    async fn acquire(&self) -> Result<SessionToken> {
        tracing::info!("[TokenLifecycle] Acquiring new token");

        let token = self.provider.acquire_token().await?;
        if token.as_str().trim().is_empty() {
            return Err(LensError::token_acquisition("auth endpoint returned an empty token"));
        }

        self.store.write(token.as_str()).await.map_err(|e| {
            LensError::token_acquisition(format!("failed to persist token: {}", e))
        })?;

        tracing::info!(exp = token.expires_at(), "[TokenLifecycle] Token acquired");
        Ok(token)
    }
}
