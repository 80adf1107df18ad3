//! Integration tests for GoMarketplace.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p gomarket-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_store` - Cart operations end-to-end over real files
//! - `cart_persistence` - Hydration, durability, and payload compatibility
//!
//! Tests run against a [`FileStorage`] slot in a fresh temp directory per
//! test, via [`TestContext`]; nothing touches a real device's storage.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::sync::Arc;

use gomarket_cart::{CartStore, FileStorage};

/// One isolated storage slot for a test, deleted on drop.
pub struct TestContext {
    dir: tempfile::TempDir,
}

impl TestContext {
    /// Create a fresh temp directory holding the slot.
    ///
    /// # Panics
    ///
    /// Panics if the temp directory cannot be created; tests cannot proceed
    /// without one.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// The file-backed storage slot, keyed like the shipping app's slot.
    #[must_use]
    pub fn storage(&self) -> FileStorage {
        FileStorage::scoped(self.dir.path(), "@GoMarketPlace:product")
    }

    /// Open a store over this context's slot.
    pub async fn open(&self) -> CartStore {
        CartStore::open(Arc::new(self.storage())).await
    }

    /// Path of the slot file.
    #[must_use]
    pub fn slot_path(&self) -> PathBuf {
        self.storage().path().to_path_buf()
    }

    /// Read the raw slot payload, if any.
    #[must_use]
    pub fn read_slot(&self) -> Option<String> {
        std::fs::read_to_string(self.slot_path()).ok()
    }

    /// Seed the raw slot payload, as if a previous session had written it.
    ///
    /// # Panics
    ///
    /// Panics if the payload cannot be written.
    #[allow(clippy::unwrap_used)]
    pub fn write_slot(&self, payload: &str) {
        std::fs::write(self.slot_path(), payload).unwrap();
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
