//! Ephemeral token slot.

use async_trait::async_trait;
use lens_core::TokenStore;
use tokio::sync::RwLock;

/// A [`TokenStore`] that lives only as long as the process.
///
/// Used for tests and for sessions that must not leave credentials on disk.
#[derive(Default)]
pub struct InMemoryTokenStore {
    slot: RwLock<Option<String>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: RwLock::new(Some(token.into())),
        }
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn read(&self) -> lens_core::Result<Option<String>> {
        Ok(self.slot.read().await.clone())
    }

    async fn write(&self, token: &str) -> lens_core::Result<()> {
        *self.slot.write().await = Some(token.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn last_write_wins() {
        let store = InMemoryTokenStore::with_token("old");
        store.write("new").await.unwrap();
        assert_eq!(store.read().await.unwrap(), Some("new".to_string()));
    }
}
