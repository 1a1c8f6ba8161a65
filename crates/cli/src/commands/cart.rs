//! Cart mutation and inspection commands.
//!
//! These play the part of the storefront views: they validate input the way
//! the product and cart pages do before calling into the store.

use rust_decimal::Decimal;
use shopfront_cart::{CartStorage, CartStore, Clock};
use shopfront_core::{CurrencyCode, LineKey, NewLineItem, Price};
use thiserror::Error;
use tracing::info;

/// Input rejected before it reaches the store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Price cannot be negative (got {0})")]
    NegativePrice(Decimal),

    #[error("Quantity must be at least 1")]
    QuantityBelowOne,
}

/// Add an item to the cart.
///
/// # Errors
///
/// Returns `CommandError::NegativePrice` for a negative unit price.
pub fn add<S: CartStorage, C: Clock>(
    store: &mut CartStore<S, C>,
    input: NewLineItem,
    currency: CurrencyCode,
) -> Result<(), CommandError> {
    if input.price < Decimal::ZERO {
        return Err(CommandError::NegativePrice(input.price));
    }

    let key = input.key();
    store.add_item(input);

    info!(
        "Added {key}: now {} in cart, {} items totalling {}",
        store.item_quantity(&key),
        store.total_items(),
        Price::new(store.total_price(), currency)
    );
    Ok(())
}

/// Remove a line from the cart.
pub fn remove<S: CartStorage, C: Clock>(store: &mut CartStore<S, C>, key: &LineKey) {
    if store.is_in_cart(key) {
        store.remove_item(key);
        info!("Removed {key}");
    } else {
        info!("{key} is not in the cart");
    }
}

/// Set the quantity of a line.
///
/// # Errors
///
/// Returns `CommandError::QuantityBelowOne` for a quantity of 0; use
/// `remove` to drop a line.
pub fn update<S: CartStorage, C: Clock>(
    store: &mut CartStore<S, C>,
    key: &LineKey,
    quantity: u32,
) -> Result<(), CommandError> {
    if quantity < 1 {
        return Err(CommandError::QuantityBelowOne);
    }

    if store.is_in_cart(key) {
        store.update_quantity(key, quantity);
        info!("Set {key} to {quantity}");
    } else {
        info!("{key} is not in the cart");
    }
    Ok(())
}

/// Empty the cart.
pub fn clear<S: CartStorage, C: Clock>(store: &mut CartStore<S, C>) {
    store.clear_cart();
    info!("Cart cleared");
}

/// Log every line and the totals.
pub fn show<S: CartStorage, C: Clock>(store: &CartStore<S, C>, currency: CurrencyCode) {
    if store.is_empty() {
        info!("Cart is empty");
        return;
    }

    info!("Cart");
    info!("====");
    for line in store.items() {
        info!(
            "  {} x{} {} @ {} = {}",
            line.key(),
            line.quantity,
            line.name,
            Price::new(line.price, currency),
            Price::new(line.line_total(), currency)
        );
    }
    info!("Items: {}", store.total_items());
    info!("Total: {}", Price::new(store.total_price(), currency));
}

/// Log the recently added lines, most recent first.
pub fn recent<S: CartStorage, C: Clock>(store: &CartStore<S, C>, count: usize) {
    let recent = store.recently_added(count);
    if recent.is_empty() {
        info!("Nothing added recently");
        return;
    }

    for line in recent {
        info!("  {} x{} {}", line.key(), line.quantity, line.name);
    }
}
