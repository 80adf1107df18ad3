//! Unified error handling for cart operations.

use thiserror::Error;

use gomarket_core::ProductId;

use crate::storage::StorageError;

/// Errors returned by [`CartStore`](crate::CartStore) operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// No line item with the given id exists in the cart. The cart was left
    /// untouched and nothing was written to storage.
    #[error("no line item with id {0} in cart")]
    ItemNotFound(ProductId),

    /// Writing the updated cart to storage failed. The in-memory mutation
    /// was applied and published before the write was attempted.
    #[error("cart storage error: {0}")]
    Storage(#[from] StorageError),

    /// The cart could not be serialized for persistence.
    #[error("cart serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
