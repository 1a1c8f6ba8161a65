//! Shopfront Cart library.
//!
//! A single-client shopping cart that survives restarts. UI collaborators
//! (product page, cart page, header badge, checkout) call into a
//! [`CartStore`]; the store keeps line items keyed by
//! `(product id, size, color)`, maintains a short "recently added" log,
//! writes a snapshot to durable storage after every mutation, and notifies
//! subscribers.
//!
//! # Modules
//!
//! - [`store`] - The cart store, its snapshot format, and clocks
//! - [`storage`] - Durable key-value slots (in-memory and on-disk)
//! - [`checkout`] - Order payload assembly from cart lines
//! - [`config`] - Environment configuration
//! - [`error`] - Storage error type

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod config;
pub mod error;
pub mod storage;
pub mod store;

pub use checkout::{CheckoutError, OrderDraft, OrderLine};
pub use config::{CartConfig, ConfigError};
pub use error::StorageError;
pub use storage::{CartStorage, FileStorage, MemoryStorage};
pub use store::{
    CartSnapshot, CartStore, Clock, ManualClock, RECENTLY_ADDED_LIMIT, SubscriptionId,
    SystemClock,
};
