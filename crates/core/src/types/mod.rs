//! Core types for Shopfront.
//!
//! This module provides type-safe wrappers for the cart domain.

pub mod id;
pub mod line_item;
pub mod price;

pub use id::{LineKey, ProductId};
pub use line_item::{CartLineItem, NewLineItem};
pub use price::{CurrencyCode, CurrencyCodeError, Price};
