//! Shared-password verification port.

use crate::error::Result;

/// The password-verification endpoint behind the access gate.
#[async_trait::async_trait]
pub trait PasswordVerifier: Send + Sync {
    /// Sends `candidate` for verification.
    ///
    /// # Returns
    ///
    /// - `Ok(true)`: the backend accepted the password
    /// - `Ok(false)`: the backend rejected it
    /// - `Err(LensError::Transport)`: the check could not be completed
    async fn verify_password(&self, candidate: &str) -> Result<bool>;
}
