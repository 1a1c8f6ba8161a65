//! Shopfront Core - Shared types library.
//!
//! This crate provides the types shared by the Shopfront components:
//! - `cart` - The durable client-side shopping cart store
//! - `cli` - Command-line front end for driving a local cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no persistence, no clocks.
//! Timestamps are supplied by callers, which keeps everything here
//! deterministic and usable anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product ids, prices, the line identity tuple, and cart line items

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
