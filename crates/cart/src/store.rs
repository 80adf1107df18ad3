//! The cart state container.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tracing::instrument;

use gomarket_core::ProductId;

use crate::error::CartError;
use crate::item::{Cart, NewLineItem};
use crate::storage::CartStorage;

/// Cart state container with write-through persistence.
///
/// The store owns the authoritative cart for the process lifetime. It is an
/// explicitly constructed handle: build it once at startup with
/// [`CartStore::open`] and pass clones to whichever component needs it
/// (clones are cheap and share state via `Arc`).
///
/// # Mutation model
///
/// All mutations funnel through one async mutex. Each operation reads the
/// current cart under the lock, applies its change, publishes the new
/// snapshot to readers, and completes the storage write before releasing the
/// lock. Back-to-back mutations therefore always observe each other and
/// their storage writes land in mutation order; there is no window where a
/// stale snapshot can clobber a newer one.
///
/// # Persistence outcome
///
/// The in-memory update is published *before* the write, so from a
/// consumer's perspective mutations take effect immediately. The returned
/// `Result` reports durability: an `Err` from a mutation means the cart
/// changed in memory but the write to storage failed (also logged).
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    storage: Arc<dyn CartStorage>,
    /// Authoritative state; every mutation holds this across its write.
    state: Mutex<Cart>,
    /// Latest published snapshot for readers and subscribers.
    publisher: watch::Sender<Cart>,
}

impl CartStore {
    /// Open a store over the given storage slot, hydrating the cart from it.
    ///
    /// An absent slot yields an empty cart. An unreadable or malformed
    /// payload also yields an empty cart, with a warning logged; a corrupt
    /// slot must not keep the app from starting.
    pub async fn open(storage: Arc<dyn CartStorage>) -> Self {
        let cart = hydrate(storage.as_ref()).await;
        let (publisher, _) = watch::channel(cart.clone());

        Self {
            inner: Arc::new(CartStoreInner {
                storage,
                state: Mutex::new(cart),
                publisher,
            }),
        }
    }

    /// The current cart snapshot.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.inner.publisher.borrow().clone()
    }

    /// Subscribe to cart changes.
    ///
    /// The receiver yields a replaced [`Cart`] snapshot on every mutation;
    /// the value is never mutated in place. The receiver also holds the
    /// current value at subscription time.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.inner.publisher.subscribe()
    }

    /// Add a product to the cart.
    ///
    /// If an entry with the same id exists, its quantity grows by one and
    /// its title, image and price are refreshed to the incoming values;
    /// otherwise the product is appended with quantity 1.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] or [`CartError::Serialize`] if the
    /// updated cart could not be persisted. The in-memory update stands.
    #[instrument(skip(self, product), fields(id = %product.id))]
    pub async fn add(&self, product: NewLineItem) -> Result<Cart, CartError> {
        self.mutate(|cart| {
            cart.upsert(product);
            Ok(())
        })
        .await
    }

    /// Grow the quantity of an existing line item by one.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if no item has this id; the cart
    /// is left untouched and nothing is written. Returns
    /// [`CartError::Storage`] or [`CartError::Serialize`] if persisting the
    /// updated cart failed.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn increment(&self, id: &ProductId) -> Result<Cart, CartError> {
        self.mutate(|cart| {
            if cart.increment(id) {
                Ok(())
            } else {
                Err(CartError::ItemNotFound(id.clone()))
            }
        })
        .await
    }

    /// Shrink the quantity of an existing line item by one, removing the
    /// item entirely when its quantity is 1.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if no item has this id; the cart
    /// is left untouched and nothing is written. Returns
    /// [`CartError::Storage`] or [`CartError::Serialize`] if persisting the
    /// updated cart failed.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn decrement(&self, id: &ProductId) -> Result<Cart, CartError> {
        self.mutate(|cart| {
            if cart.decrement(id) {
                Ok(())
            } else {
                Err(CartError::ItemNotFound(id.clone()))
            }
        })
        .await
    }

    /// Apply a mutation under the write lock, publish the new snapshot,
    /// and write it through to storage before releasing the lock.
    async fn mutate<F>(&self, apply: F) -> Result<Cart, CartError>
    where
        F: FnOnce(&mut Cart) -> Result<(), CartError>,
    {
        let mut state = self.inner.state.lock().await;
        apply(&mut state)?;

        let snapshot = state.clone();
        // Publish first: the visible effect does not wait on storage.
        self.inner.publisher.send_replace(snapshot.clone());

        let payload = serde_json::to_string(&snapshot)?;
        if let Err(e) = self.inner.storage.store(&payload).await {
            tracing::warn!("failed to persist cart: {e}");
            return Err(e.into());
        }

        Ok(snapshot)
    }
}

/// Read the slot once at startup, degrading to an empty cart on any problem.
async fn hydrate(storage: &dyn CartStorage) -> Cart {
    match storage.load().await {
        Ok(Some(payload)) => match serde_json::from_str::<Cart>(&payload) {
            Ok(cart) => {
                tracing::info!(items = cart.len(), "hydrated cart from storage");
                cart
            }
            Err(e) => {
                tracing::warn!("stored cart payload is malformed, starting empty: {e}");
                Cart::new()
            }
        },
        Ok(None) => {
            tracing::debug!("no stored cart, starting empty");
            Cart::new()
        }
        Err(e) => {
            tracing::warn!("failed to read stored cart, starting empty: {e}");
            Cart::new()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::item::LineItem;
    use crate::storage::MemoryStorage;
    use gomarket_core::Price;
    use rust_decimal::Decimal;

    fn product(id: &str) -> NewLineItem {
        NewLineItem {
            id: ProductId::parse(id).unwrap(),
            title: format!("Product {id}"),
            image_url: format!("https://cdn.example.com/{id}.png"),
            price: Price::new(Decimal::new(1000, 2)).unwrap(),
        }
    }

    fn id(s: &str) -> ProductId {
        ProductId::parse(s).unwrap()
    }

    async fn store_with(storage: MemoryStorage) -> CartStore {
        CartStore::open(Arc::new(storage)).await
    }

    #[tokio::test]
    async fn test_open_empty_slot_starts_empty() {
        let store = store_with(MemoryStorage::new()).await;
        assert!(store.cart().is_empty());
    }

    #[tokio::test]
    async fn test_open_hydrates_existing_payload() {
        let payload =
            r#"[{"id":"a","title":"T","image_url":"u","price":2.5,"quantity":3}]"#;
        let store = store_with(MemoryStorage::with_payload(payload)).await;

        let cart = store.cart();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(&id("a")).unwrap().quantity, 3);
    }

    #[tokio::test]
    async fn test_open_malformed_payload_starts_empty() {
        let store = store_with(MemoryStorage::with_payload("{not json")).await;
        assert!(store.cart().is_empty());
    }

    #[tokio::test]
    async fn test_open_invariant_violating_payload_starts_empty() {
        // Duplicate ids violate the cart invariant even though it parses as JSON
        let payload = r#"[
            {"id":"a","title":"T","image_url":"u","price":1.0,"quantity":1},
            {"id":"a","title":"T","image_url":"u","price":1.0,"quantity":1}
        ]"#;
        let store = store_with(MemoryStorage::with_payload(payload)).await;
        assert!(store.cart().is_empty());
    }

    #[tokio::test]
    async fn test_add_persists_whole_cart() {
        let storage = MemoryStorage::new();
        let store = store_with(storage.clone()).await;

        store.add(product("a")).await.unwrap();

        let persisted = storage.payload().await.unwrap();
        assert_eq!(persisted, serde_json::to_string(&store.cart()).unwrap());
    }

    #[tokio::test]
    async fn test_add_same_id_grows_single_entry() {
        let store = store_with(MemoryStorage::new()).await;

        for _ in 0..4 {
            store.add(product("a")).await.unwrap();
        }

        let cart = store.cart();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(&id("a")).unwrap().quantity, 4);
    }

    #[tokio::test]
    async fn test_increment_unknown_id_is_not_found_and_writes_nothing() {
        let storage = MemoryStorage::new();
        let store = store_with(storage.clone()).await;

        let result = store.increment(&id("ghost")).await;
        assert!(matches!(result, Err(CartError::ItemNotFound(_))));
        assert!(store.cart().is_empty());
        assert_eq!(storage.payload().await, None);
    }

    #[tokio::test]
    async fn test_decrement_unknown_id_is_not_found() {
        let store = store_with(MemoryStorage::new()).await;
        store.add(product("a")).await.unwrap();

        let result = store.decrement(&id("ghost")).await;
        assert!(matches!(result, Err(CartError::ItemNotFound(_))));
        assert_eq!(store.cart().get(&id("a")).unwrap().quantity, 1);
    }

    #[tokio::test]
    async fn test_decrement_at_quantity_one_removes_item() {
        let store = store_with(MemoryStorage::new()).await;
        store.add(product("a")).await.unwrap();

        let cart = store.decrement(&id("a")).await.unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_decrement_then_add_yields_fresh_entry() {
        let store = store_with(MemoryStorage::new()).await;
        store.add(product("a")).await.unwrap();

        store.decrement(&id("a")).await.unwrap();
        let cart = store.add(product("a")).await.unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(&id("a")).unwrap().quantity, 1);
    }

    #[tokio::test]
    async fn test_increment_updates_persisted_payload() {
        let storage = MemoryStorage::new();
        let store = store_with(storage.clone()).await;
        store.add(product("a")).await.unwrap();

        let cart = store.increment(&id("a")).await.unwrap();

        assert_eq!(cart.get(&id("a")).unwrap().quantity, 2);
        let persisted = storage.payload().await.unwrap();
        assert_eq!(persisted, serde_json::to_string(&cart).unwrap());
    }

    #[tokio::test]
    async fn test_write_failure_keeps_in_memory_effect() {
        let storage = MemoryStorage::new();
        let store = store_with(storage.clone()).await;
        store.add(product("a")).await.unwrap();

        storage.set_fail_writes(true);
        let result = store.increment(&id("a")).await;

        assert!(matches!(result, Err(CartError::Storage(_))));
        // Visible state advanced even though durability failed
        assert_eq!(store.cart().get(&id("a")).unwrap().quantity, 2);
        // Storage still holds the last successful write
        let persisted: Vec<LineItem> =
            serde_json::from_str(&storage.payload().await.unwrap()).unwrap();
        assert_eq!(persisted.first().unwrap().quantity, 1);
    }

    #[tokio::test]
    async fn test_subscribe_sees_replaced_snapshots() {
        let store = store_with(MemoryStorage::new()).await;
        let mut receiver = store.subscribe();

        assert!(receiver.borrow().is_empty());

        store.add(product("a")).await.unwrap();
        receiver.changed().await.unwrap();
        assert_eq!(receiver.borrow().total_quantity(), 1);

        store.increment(&id("a")).await.unwrap();
        receiver.changed().await.unwrap();
        assert_eq!(receiver.borrow().total_quantity(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_mutations_are_not_lost() {
        let storage = MemoryStorage::new();
        let store = store_with(storage.clone()).await;
        store.add(product("a")).await.unwrap();

        // Issue a burst of increments from separate tasks; every one must
        // observe the increments before it.
        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.increment(&id("a")).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.cart().get(&id("a")).unwrap().quantity, 17);
        let persisted: Vec<LineItem> =
            serde_json::from_str(&storage.payload().await.unwrap()).unwrap();
        assert_eq!(persisted.first().unwrap().quantity, 17);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = store_with(MemoryStorage::new()).await;
        let other = store.clone();

        store.add(product("a")).await.unwrap();
        assert_eq!(other.cart().total_quantity(), 1);
    }
}
