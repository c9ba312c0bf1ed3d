//! Shared-password access gate.
//!
//! Until the gate is passed the input surface is inert. Passing it sets the
//! session's access grant, which then stays true for the rest of the session.

use crate::session::SessionContext;
use lens_core::{LensError, PasswordVerifier, Result};
use std::sync::Arc;
use tokio::sync::RwLock;

pub const INCORRECT_PASSWORD_MESSAGE: &str = "Incorrect password. Please try again.";
pub const VERIFICATION_FAILED_MESSAGE: &str =
    "Could not verify the password right now. Please try again.";

pub struct AccessGate {
    context: Arc<SessionContext>,
    verifier: Arc<dyn PasswordVerifier>,
    error: RwLock<Option<String>>,
}

impl AccessGate {
    pub fn new(context: Arc<SessionContext>, verifier: Arc<dyn PasswordVerifier>) -> Self {
        Self {
            context,
            verifier,
            error: RwLock::new(None),
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.context.is_access_granted()
    }

    /// Whether the rest of the UI should accept input.
    pub fn is_interactive(&self) -> bool {
        self.is_unlocked()
    }

    /// The message to show under the password field, if any.
    pub async fn error(&self) -> Option<String> {
        self.error.read().await.clone()
    }

    /// Verifies `candidate` against the backend.
    ///
    /// On success the grant is set and any previous error cleared. On a
    /// negative answer the grant stays false and an error message is set.
    /// Attempts are not limited. Once unlocked, further calls return
    /// immediately without contacting the backend.
    ///
    /// # Errors
    ///
    /// - `LensError::AccessDenied` if the password was rejected
    /// - `LensError::Transport` if the check could not be completed
    pub async fn check_password(&self, candidate: &str) -> Result<()> {
        if self.is_unlocked() {
            return Ok(());
        }

        match self.verifier.verify_password(candidate).await {
            Ok(true) => {
                self.context.grant_access();
                *self.error.write().await = None;
                tracing::info!("[AccessGate] Access granted");
                Ok(())
            }
            Ok(false) => {
                self.set_error_unless_unlocked(INCORRECT_PASSWORD_MESSAGE).await;
                tracing::info!("[AccessGate] Password rejected");
                Err(LensError::AccessDenied)
            }
            Err(e) => {
                self.set_error_unless_unlocked(VERIFICATION_FAILED_MESSAGE).await;
                tracing::warn!(error.kind = e.kind(), "[AccessGate] Password check failed: {}", e);
                Err(e)
            }
        }
    }

    // A concurrent check may have unlocked the gate while this one was pending.
    async fn set_error_unless_unlocked(&self, message: &str) {
        let mut error = self.error.write().await;
        if !self.is_unlocked() {
            *error = Some(message.to_string());
        }
    }
}
