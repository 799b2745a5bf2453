//! Samovar Core - Shared types library.
//!
//! This crate provides common types used across all Samovar components:
//! - `storefront` - Telegram Mini App client engine (cart, delivery, checkout)
//! - `integration-tests` - cross-store flow tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no network access, no
//! storage. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, statuses, and the catalog/cart/order
//!   domain model

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
