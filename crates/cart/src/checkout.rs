//! Order payload assembly.
//!
//! The checkout view posts an order built from the cart's lines to the
//! order-creation endpoint. This module only builds that payload; sending it
//! and handling the response belong to the caller.

use rust_decimal::Decimal;
use serde::Serialize;
use shopfront_core::{CartLineItem, CurrencyCode, LineKey, Price, ProductId};
use thiserror::Error;

/// Reasons a cart cannot be turned into an order.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Line {0} has zero quantity")]
    ZeroQuantity(LineKey),
}

/// One line of an order payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub sku: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl From<&CartLineItem> for OrderLine {
    fn from(item: &CartLineItem) -> Self {
        Self {
            product_id: item.id.clone(),
            name: item.name.clone(),
            sku: item.sku.clone(),
            quantity: item.quantity,
            unit_price: item.price,
            line_total: item.line_total(),
            size: item.size.clone(),
            color: item.color.clone(),
        }
    }
}

/// Order payload assembled from cart lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub lines: Vec<OrderLine>,
    pub item_count: u64,
    pub subtotal: Price,
}

impl OrderDraft {
    /// Build a draft from lines in display order.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` when there are no lines, and
    /// `CheckoutError::ZeroQuantity` for the first line whose quantity was
    /// set to zero.
    pub fn from_items<'a, I>(items: I, currency: CurrencyCode) -> Result<Self, CheckoutError>
    where
        I: IntoIterator<Item = &'a CartLineItem>,
    {
        let mut lines = Vec::new();
        for item in items {
            if item.quantity == 0 {
                return Err(CheckoutError::ZeroQuantity(item.key()));
            }
            lines.push(OrderLine::from(item));
        }

        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let item_count = lines.iter().map(|line| u64::from(line.quantity)).sum();
        let subtotal = lines
            .iter()
            .map(|line| line.line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add);

        Ok(Self {
            lines,
            item_count,
            subtotal: Price::new(subtotal, currency),
        })
    }
}
