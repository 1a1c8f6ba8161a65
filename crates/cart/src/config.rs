//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CART_DATA_DIR` - Directory holding persisted snapshots (default: .shopfront)
//! - `CART_STORAGE_KEY` - Name of the snapshot slot (default: cart-storage)
//! - `CART_CURRENCY` - ISO 4217 code used for totals (default: USD)

use std::path::PathBuf;

use shopfront_core::CurrencyCode;
use thiserror::Error;

use crate::storage::FileStorage;
use crate::store::DEFAULT_STORAGE_KEY;

const DEFAULT_DATA_DIR: &str = ".shopfront";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Directory snapshots are written to
    pub data_dir: PathBuf,
    /// Slot name inside `data_dir`
    pub storage_key: String,
    /// Currency used when displaying totals and building orders
    pub currency: CurrencyCode,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            currency: CurrencyCode::default(),
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = PathBuf::from(get_or_default(&lookup, "CART_DATA_DIR", DEFAULT_DATA_DIR));
        let storage_key = get_or_default(&lookup, "CART_STORAGE_KEY", DEFAULT_STORAGE_KEY);
        validate_storage_key(&storage_key)?;

        let currency = get_or_default(&lookup, "CART_CURRENCY", CurrencyCode::default().code())
            .parse::<CurrencyCode>()
            .map_err(|e| ConfigError::InvalidEnvVar("CART_CURRENCY".to_string(), e.to_string()))?;

        Ok(Self {
            data_dir,
            storage_key,
            currency,
        })
    }

    /// File storage rooted at `data_dir`.
    #[must_use]
    pub fn storage(&self) -> FileStorage {
        FileStorage::new(&self.data_dir)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a variable with a default value. Empty values count as unset.
fn get_or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// The key becomes a file name, so it must not escape the data directory.
fn validate_storage_key(key: &str) -> Result<(), ConfigError> {
    if key.contains(['/', '\\']) || key == "." || key == ".." {
        return Err(ConfigError::InvalidEnvVar(
            "CART_STORAGE_KEY".to_string(),
            format!("'{key}' is not a valid slot name"),
        ));
    }
    Ok(())
}
