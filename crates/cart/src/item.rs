//! Cart data model.
//!
//! The persisted wire format is a JSON array of line item objects with the
//! field names `id`, `title`, `image_url`, `price`, `quantity`. Payloads
//! written by earlier versions of the app hydrate unchanged, so field names
//! and ordering here must not drift.

use gomarket_core::{Price, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single product entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Stable product identifier; the cart holds at most one entry per id.
    pub id: ProductId,
    /// Product title at the time it was added.
    pub title: String,
    /// Product image URL at the time it was added.
    pub image_url: String,
    /// Unit price.
    pub price: Price,
    /// Number of units, always at least 1.
    pub quantity: u32,
}

/// A product to add to the cart, before a quantity is assigned.
///
/// Adding assigns quantity 1 for a new entry, or grows an existing entry by
/// one while refreshing its title, image and price to these values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLineItem {
    /// Stable product identifier.
    pub id: ProductId,
    /// Product title.
    pub title: String,
    /// Product image URL.
    pub image_url: String,
    /// Unit price.
    pub price: Price,
}

/// Errors for cart payloads that violate the cart's invariants.
#[derive(thiserror::Error, Debug, Clone)]
pub enum CartIntegrityError {
    /// Two line items share the same product id.
    #[error("duplicate line item id {0}")]
    DuplicateId(ProductId),
    /// A line item has quantity 0; such items must be removed, not retained.
    #[error("line item {0} has quantity 0")]
    ZeroQuantity(ProductId),
}

/// An ordered collection of line items, unique by product id.
///
/// Insertion order is preserved on add and stable under in-place quantity
/// updates. Invariants: no two items share an id, and every quantity is at
/// least 1 (an item reaching 0 is removed rather than retained).
///
/// Carts are value snapshots: mutations go through
/// [`CartStore`](crate::CartStore), which publishes a replaced `Cart` on
/// every change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// The line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a line item by product id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Total number of units across all line items.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Sum of price times quantity across all line items.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items
            .iter()
            .map(|item| item.price.extend(item.quantity))
            .sum()
    }

    /// Add a product: grow an existing entry by one (refreshing its title,
    /// image and price), or append a fresh entry with quantity 1.
    pub(crate) fn upsert(&mut self, product: NewLineItem) {
        match self.items.iter_mut().find(|item| item.id == product.id) {
            Some(existing) => {
                existing.title = product.title;
                existing.image_url = product.image_url;
                existing.price = product.price;
                existing.quantity += 1;
            }
            None => self.items.push(LineItem {
                id: product.id,
                title: product.title,
                image_url: product.image_url,
                price: product.price,
                quantity: 1,
            }),
        }
    }

    /// Grow an existing entry by one. Returns `false` if the id is unknown.
    pub(crate) fn increment(&mut self, id: &ProductId) -> bool {
        match self.items.iter_mut().find(|item| &item.id == id) {
            Some(item) => {
                item.quantity += 1;
                true
            }
            None => false,
        }
    }

    /// Shrink an existing entry by one, removing it at quantity 1.
    /// Returns `false` if the id is unknown.
    pub(crate) fn decrement(&mut self, id: &ProductId) -> bool {
        let Some(position) = self.items.iter().position(|item| &item.id == id) else {
            return false;
        };
        let remove = match self.items.get_mut(position) {
            Some(item) if item.quantity > 1 => {
                item.quantity -= 1;
                false
            }
            _ => true,
        };
        if remove {
            self.items.remove(position);
        }
        true
    }
}

impl TryFrom<Vec<LineItem>> for Cart {
    type Error = CartIntegrityError;

    fn try_from(items: Vec<LineItem>) -> Result<Self, Self::Error> {
        for (index, item) in items.iter().enumerate() {
            if item.quantity == 0 {
                return Err(CartIntegrityError::ZeroQuantity(item.id.clone()));
            }
            if items
                .iter()
                .take(index)
                .any(|earlier| earlier.id == item.id)
            {
                return Err(CartIntegrityError::DuplicateId(item.id.clone()));
            }
        }
        Ok(Self { items })
    }
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let items = Vec::<LineItem>::deserialize(deserializer)?;
        Self::try_from(items).map_err(serde::de::Error::custom)
    }
}
