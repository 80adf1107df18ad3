//! Cart inspection and mutation commands.
//!
//! Every command opens the store against the configured storage slot,
//! performs one operation, and reports the resulting cart. The store
//! persists after each mutation, so consecutive invocations see each
//! other's changes.

use std::path::PathBuf;
use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;

use gomarket_cart::storage::DEFAULT_STORAGE_KEY;
use gomarket_cart::{Cart, CartConfig, CartError, CartStore, ConfigError, NewLineItem};
use gomarket_core::{Price, PriceError, ProductId, ProductIdError};

/// Errors that can occur while running a cart command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Storage configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The given product id is not valid.
    #[error("Invalid product id: {0}")]
    ProductId(#[from] ProductIdError),

    /// The given price is not valid.
    #[error("Invalid price: {0}")]
    Price(#[from] PriceError),

    /// The cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),
}

/// Open the store over the configured (or overridden) storage directory.
async fn open_store(dir: Option<PathBuf>) -> Result<CartStore, CliError> {
    let config = match dir {
        Some(dir) => CartConfig::new(dir, DEFAULT_STORAGE_KEY),
        None => CartConfig::from_env()?,
    };
    Ok(CartStore::open(Arc::new(config.storage())).await)
}

/// Log the cart, one line per item, with totals.
fn report(cart: &Cart) {
    if cart.is_empty() {
        tracing::info!("Cart is empty");
        return;
    }

    for item in cart.items() {
        tracing::info!(
            "  {} x{} @ {} - {}",
            item.id,
            item.quantity,
            item.price,
            item.title
        );
    }
    tracing::info!(
        "{} item(s), {} unit(s), subtotal {:.2}",
        cart.len(),
        cart.total_quantity(),
        cart.subtotal()
    );
}

/// Show the current cart.
pub async fn show(dir: Option<PathBuf>) -> Result<(), CliError> {
    let store = open_store(dir).await?;
    report(&store.cart());
    Ok(())
}

/// Add a product to the cart.
pub async fn add(
    dir: Option<PathBuf>,
    id: &str,
    title: String,
    image_url: String,
    price: Decimal,
) -> Result<(), CliError> {
    let store = open_store(dir).await?;

    let product = NewLineItem {
        id: ProductId::parse(id)?,
        title,
        image_url,
        price: Price::new(price)?,
    };

    let cart = store.add(product).await?;
    tracing::info!("Added {id}");
    report(&cart);
    Ok(())
}

/// Increase a line item's quantity by one.
pub async fn increment(dir: Option<PathBuf>, id: &str) -> Result<(), CliError> {
    let store = open_store(dir).await?;
    let id = ProductId::parse(id)?;

    let cart = store.increment(&id).await?;
    tracing::info!("Incremented {id}");
    report(&cart);
    Ok(())
}

/// Decrease a line item's quantity by one, removing it at quantity 1.
pub async fn decrement(dir: Option<PathBuf>, id: &str) -> Result<(), CliError> {
    let store = open_store(dir).await?;
    let id = ProductId::parse(id)?;

    let cart = store.decrement(&id).await?;
    tracing::info!("Decremented {id}");
    report(&cart);
    Ok(())
}
