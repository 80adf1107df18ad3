//! In-memory storage backend.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{CartStorage, StorageError};

/// An in-memory implementation of [`CartStorage`].
///
/// Used by tests and examples. Clones share the same slot, and writes can be
/// switched to fail for exercising durability-failure paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<String>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStorage {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot pre-seeded with a payload, as if a previous session
    /// had written it.
    #[must_use]
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(payload.into()))),
            fail_writes: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make subsequent `store` calls fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// The current payload, for assertions.
    pub async fn payload(&self) -> Option<String> {
        self.slot.lock().await.clone()
    }
}

#[async_trait]
impl CartStorage for MemoryStorage {
    async fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.slot.lock().await.clone())
    }

    async fn store(&self, payload: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(
                "write failure injected".to_string(),
            ));
        }
        *self.slot.lock().await = Some(payload.to_string());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_empty_slot() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_store_then_load() {
        let storage = MemoryStorage::new();
        storage.store("[]").await.unwrap();
        assert_eq!(storage.load().await.unwrap(), Some("[]".to_string()));
    }

    #[tokio::test]
    async fn test_store_replaces_previous_payload() {
        let storage = MemoryStorage::with_payload("old");
        storage.store("new").await.unwrap();
        assert_eq!(storage.load().await.unwrap(), Some("new".to_string()));
    }

    #[tokio::test]
    async fn test_injected_write_failure() {
        let storage = MemoryStorage::with_payload("old");
        storage.set_fail_writes(true);

        let result = storage.store("new").await;
        assert!(matches!(result, Err(StorageError::Unavailable(_))));
        // Previous payload untouched
        assert_eq!(storage.payload().await, Some("old".to_string()));
    }
}
