//! Cart storage configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CART_STORAGE_DIR` - Writable directory for the persisted cart (on
//!   mobile this is the app's documents directory)
//!
//! ## Optional
//! - `CART_STORAGE_KEY` - Slot key, also the file stem
//!   (default: `@GoMarketPlace:product`)

use std::path::PathBuf;

use thiserror::Error;

use crate::storage::{DEFAULT_STORAGE_KEY, FileStorage};

/// Configuration errors that can occur during loading.
///
/// These are fatal to the composing code path: without a valid storage
/// location there is no cart store to operate on, so callers should fail
/// fast rather than retry.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart persistence configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Directory holding the persisted cart file
    pub storage_dir: PathBuf,
    /// Slot key the cart is stored under
    pub storage_key: String,
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `CART_STORAGE_DIR` is missing or blank, or
    /// if `CART_STORAGE_KEY` is set to a blank string.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let storage_dir = get_required_env("CART_STORAGE_DIR")?;
        if storage_dir.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "CART_STORAGE_DIR".to_string(),
                "must not be blank".to_string(),
            ));
        }

        let storage_key = get_env_or_default("CART_STORAGE_KEY", DEFAULT_STORAGE_KEY);
        if storage_key.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "CART_STORAGE_KEY".to_string(),
                "must not be blank".to_string(),
            ));
        }

        Ok(Self {
            storage_dir: PathBuf::from(storage_dir),
            storage_key,
        })
    }

    /// Build a config directly, bypassing the environment.
    #[must_use]
    pub fn new(storage_dir: impl Into<PathBuf>, storage_key: impl Into<String>) -> Self {
        Self {
            storage_dir: storage_dir.into(),
            storage_key: storage_key.into(),
        }
    }

    /// The file-backed storage slot this configuration describes.
    #[must_use]
    pub fn storage(&self) -> FileStorage {
        FileStorage::scoped(&self.storage_dir, &self.storage_key)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
