//! Integration tests for Shopfront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - Restart round-trips through on-disk snapshots
//! - `cart_checkout` - Order payloads built from persisted carts
//!
//! The helpers below open stores against a throwaway directory so each test
//! gets its own "device".

use std::path::Path;

use rust_decimal::Decimal;
use shopfront_cart::{CartStore, FileStorage, ManualClock};
use shopfront_core::NewLineItem;

/// Slot name used by the tests.
pub const TEST_KEY: &str = "cart-storage";

/// Fixed start time for deterministic `addedAt` stamps.
pub const T0: i64 = 1_700_000_000_000;

/// Open the cart stored in `dir`, as a fresh process would.
#[must_use]
pub fn open_cart(dir: &Path, clock: ManualClock) -> CartStore<FileStorage, ManualClock> {
    CartStore::with_clock(FileStorage::new(dir), TEST_KEY, clock)
}

/// A catalog item with a size variant.
#[must_use]
pub fn sized(id: i64, name: &str, cents: i64, size: &str) -> NewLineItem {
    NewLineItem::new(id, name, Decimal::new(cents, 2))
        .with_size(size)
        .with_sku(format!("SKU-{id}-{size}"))
}
