//! Checkout command.

use shopfront_cart::{CartStorage, CartStore, CheckoutError, Clock};
use shopfront_core::CurrencyCode;
use tracing::info;

/// Print the order payload as JSON on stdout, then clear the cart.
///
/// The cart is left untouched if the payload cannot be built.
///
/// # Errors
///
/// Returns an error if the cart is empty, holds a zero-quantity line, or the
/// payload cannot be serialized.
#[allow(clippy::print_stdout)] // The payload is the command's output
pub fn run<S: CartStorage, C: Clock>(
    store: &mut CartStore<S, C>,
    currency: CurrencyCode,
) -> Result<(), Box<dyn std::error::Error>> {
    let draft = match store.checkout_draft(currency) {
        Ok(draft) => draft,
        Err(CheckoutError::EmptyCart) => {
            return Err("Nothing to check out: the cart is empty".into());
        }
        Err(e) => return Err(e.into()),
    };

    let payload = serde_json::to_string_pretty(&draft)?;
    println!("{payload}");

    info!(
        lines = draft.lines.len(),
        items = draft.item_count,
        subtotal = %draft.subtotal,
        "Order payload ready"
    );

    store.clear_cart();
    Ok(())
}
