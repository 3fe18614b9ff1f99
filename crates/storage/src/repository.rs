use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("schema error: {0}")]
    Schema(String),
}

/// Opaque blob storage that survives process restarts.
///
/// Implementations hold a single value; callers own its format.
#[async_trait]
pub trait PersistentStore: Send + Sync {
    /// Read the stored blob.
    ///
    /// Returns `Ok(None)` when nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn load(&self) -> Result<Option<Vec<u8>>, StorageError>;

    /// Replace the stored blob.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn save(&self, bytes: &[u8]) -> Result<(), StorageError>;
}

/// Simple in-memory store for testing and prototyping.
///
/// Clones share the same blob, so a test can keep a handle and inspect what
/// was written.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    blob: Arc<Mutex<Option<Vec<u8>>>>,
    fail_saves: Arc<AtomicBool>,
    fail_loads: Arc<AtomicBool>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `bytes`.
    #[must_use]
    pub fn with_blob(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            blob: Arc::new(Mutex::new(Some(bytes.into()))),
            ..Self::default()
        }
    }

    /// Make every subsequent `save` fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `load` fail (or succeed again).
    pub fn set_fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    /// Current contents, bypassing the async trait.
    #[must_use]
    pub fn snapshot(&self) -> Option<Vec<u8>> {
        self.blob.lock().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl PersistentStore for InMemoryStore {
    async fn load(&self) -> Result<Option<Vec<u8>>, StorageError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(StorageError::Connection("store is unavailable".into()));
        }
        let guard = self
            .blob
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save(&self, bytes: &[u8]) -> Result<(), StorageError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::Connection("store is read-only".into()));
        }
        let mut guard = self
            .blob
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_store_loads_none() {
        let store = InMemoryStore::new();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_replaces_blob_and_is_shared_by_clones() {
        let store = InMemoryStore::with_blob(b"old".to_vec());
        let handle = store.clone();
        store.save(b"new").await.unwrap();

        assert_eq!(handle.load().await.unwrap().as_deref(), Some(&b"new"[..]));
        assert_eq!(handle.snapshot().as_deref(), Some(&b"new"[..]));
    }

    #[tokio::test]
    async fn failing_store_keeps_previous_blob() {
        let store = InMemoryStore::with_blob(b"kept".to_vec());
        store.set_fail_saves(true);

        let err = store.save(b"lost").await.unwrap_err();
        assert!(matches!(err, StorageError::Connection(_)));
        assert_eq!(store.snapshot().as_deref(), Some(&b"kept"[..]));

        store.set_fail_saves(false);
        store.save(b"written").await.unwrap();
        assert_eq!(store.snapshot().as_deref(), Some(&b"written"[..]));
    }

    #[tokio::test]
    async fn failing_loads_can_be_switched_off() {
        let store = InMemoryStore::with_blob(b"kept".to_vec());
        store.set_fail_loads(true);
        assert!(matches!(
            store.load().await,
            Err(StorageError::Connection(_))
        ));

        store.set_fail_loads(false);
        assert_eq!(store.load().await.unwrap().as_deref(), Some(&b"kept"[..]));
    }
}
