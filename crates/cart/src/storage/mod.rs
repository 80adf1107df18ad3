//! Persistence seam for the cart.
//!
//! Storage is a single key-value slot holding the string-serialized cart.
//! Backends implement [`CartStorage`]; the store never needs to know whether
//! the underlying write is atomic, only that a `store` call replaces the
//! previous payload from its point of view.

use async_trait::async_trait;

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// The slot key used by the app since its first release. Payloads written
/// under this key must keep hydrating, so it doubles as the default file
/// stem for [`FileStorage`].
pub const DEFAULT_STORAGE_KEY: &str = "@GoMarketPlace:product";

/// Errors from a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading or writing the underlying slot failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend refused the operation (e.g. a test backend set to fail).
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

/// A single persistent key-value slot for the serialized cart.
///
/// Implementations must be cheap to share across tasks (`Send + Sync`) and
/// must return `Ok(None)` from `load` when the slot was never written, as
/// opposed to erroring.
#[async_trait]
pub trait CartStorage: Send + Sync {
    /// Read the stored payload, or `None` if the slot was never written.
    async fn load(&self) -> Result<Option<String>, StorageError>;

    /// Replace the stored payload, atomically from the caller's point of view.
    async fn store(&self, payload: &str) -> Result<(), StorageError>;
}
