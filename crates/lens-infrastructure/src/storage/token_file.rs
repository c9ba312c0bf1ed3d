//! File-backed token slot.
//!
//! Persists the last acquired bearer token as `{"token": "..."}` so it
//! survives restarts. Writes go through a temporary file and an atomic rename.

use async_trait::async_trait;
use lens_core::{LensError, TokenStore};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Errors that can occur while accessing the token file.
#[derive(Debug)]
pub enum TokenFileError {
    /// File I/O error.
    IoError(std::io::Error),
    /// JSON serialization error.
    SerializeError(serde_json::Error),
}

impl std::fmt::Display for TokenFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenFileError::IoError(e) => write!(f, "I/O error: {}", e),
            TokenFileError::SerializeError(e) => write!(f, "JSON serialization error: {}", e),
        }
    }
}

impl std::error::Error for TokenFileError {}

impl From<std::io::Error> for TokenFileError {
    fn from(e: std::io::Error) -> Self {
        TokenFileError::IoError(e)
    }
}

impl From<serde_json::Error> for TokenFileError {
    fn from(e: serde_json::Error) -> Self {
        TokenFileError::SerializeError(e)
    }
}

impl From<TokenFileError> for LensError {
    fn from(e: TokenFileError) -> Self {
        LensError::storage(e.to_string())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenSlot {
    token: String,
}

/// Durable single-slot [`TokenStore`].
///
/// Responsibilities:
/// - Read the slot, treating a missing, empty or unreadable file as "no token"
/// - Overwrite the slot atomically (tmp file + fsync + rename)
///
/// Does NOT:
/// - Decode tokens or reason about expiry
/// - Delete the slot (tokens are only ever superseded)
pub struct FileTokenStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Option<String>, TokenFileError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        match serde_json::from_str::<TokenSlot>(&content) {
            Ok(slot) if !slot.token.is_empty() => Ok(Some(slot.token)),
            Ok(_) => Ok(None),
            Err(e) => {
                tracing::warn!(
                    "[TokenStore] Ignoring unreadable token slot at {}: {}",
                    self.path.display(),
                    e
                );
                Ok(None)
            }
        }
    }

    async fn save(&self, token: &str) -> Result<(), TokenFileError> {
        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let body = serde_json::to_vec(&TokenSlot {
            token: token.to_string(),
        })?;

        let tmp_path = self.path.with_extension("json.tmp");
        let result = self.replace_with(&tmp_path, &body).await;
        if result.is_err() {
            let _ = fs::remove_file(&tmp_path).await;
        }
        result
    }

    async fn replace_with(&self, tmp_path: &Path, body: &[u8]) -> Result<(), TokenFileError> {
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        // The token must never be readable by other users, not even briefly.
        #[cfg(unix)]
        options.mode(0o600);

        // A leftover temp file would keep its old permissions.
        let _ = fs::remove_file(tmp_path).await;
        let mut tmp_file = options.open(tmp_path).await?;
        tmp_file.write_all(body).await?;
        tmp_file.sync_all().await?;
        drop(tmp_file);

        fs::rename(tmp_path, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn read(&self) -> lens_core::Result<Option<String>> {
        Ok(self.load().await?)
    }

    async fn write(&self, token: &str) -> lens_core::Result<()> {
        self.save(token).await?;
        tracing::debug!("[TokenStore] Token slot updated at {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_file_reads_as_absent() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path().join("session_token.json"));
        assert_eq!(store.read().await.unwrap(), None);
    }

    #[tokio::test]
    async fn write_then_read_returns_token() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path().join("session_token.json"));

        store.write("first").await.unwrap();
        store.write("second").await.unwrap();

        assert_eq!(store.read().await.unwrap(), Some("second".to_string()));
    }

    #[tokio::test]
    async fn token_survives_reopening_the_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session_token.json");

        FileTokenStore::new(path.clone()).write("persisted").await.unwrap();

        let reopened = FileTokenStore::new(path);
        assert_eq!(reopened.read().await.unwrap(), Some("persisted".to_string()));
    }

    #[tokio::test]
    async fn corrupt_or_empty_slot_reads_as_absent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session_token.json");
        let store = FileTokenStore::new(path.clone());

        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(store.read().await.unwrap(), None);

        std::fs::write(&path, "   ").unwrap();
        assert_eq!(store.read().await.unwrap(), None);

        std::fs::write(&path, r#"{"token":""}"#).unwrap();
        assert_eq!(store.read().await.unwrap(), None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn slot_is_private_to_the_user() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session_token.json");
        FileTokenStore::new(path.clone()).write("t").await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn failed_write_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session_token.json");
        // A non-empty directory in the slot's place makes the final rename fail.
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("occupied"), "x").unwrap();

        let err = FileTokenStore::new(path.clone()).write("t").await.unwrap_err();

        assert_eq!(err.kind(), "storage");
        assert!(!path.with_extension("json.tmp").exists());
    }
}
