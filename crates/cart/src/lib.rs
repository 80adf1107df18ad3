//! GoMarketplace Cart - cart state container with local persistence.
//!
//! This crate owns the shopper's cart for the lifetime of the process. The
//! [`CartStore`] holds an ordered collection of line items, exposes the three
//! cart mutations (add, increment, decrement), and rewrites the persisted
//! slot after every mutation so the cart survives restarts.
//!
//! # Architecture
//!
//! - [`item`] - The cart data model ([`Cart`], [`LineItem`])
//! - [`storage`] - The persistence seam: one key-value slot behind
//!   [`CartStorage`], with file-backed and in-memory implementations
//! - [`store`] - [`CartStore`], the single-writer state container
//! - [`config`] - Environment-driven composition for binaries
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use gomarket_cart::{CartStore, FileStorage, NewLineItem};
//!
//! let storage = Arc::new(FileStorage::new("/data/@GoMarketPlace:product.json"));
//! let store = CartStore::open(storage).await;
//!
//! store.add(item).await?;
//! let cart = store.cart();
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod item;
pub mod storage;
pub mod store;

pub use config::{CartConfig, ConfigError};
pub use error::CartError;
pub use item::{Cart, CartIntegrityError, LineItem, NewLineItem};
pub use storage::{CartStorage, FileStorage, MemoryStorage, StorageError};
pub use store::CartStore;
