//! Samovar storefront engine.
//!
//! The client-side core of the Telegram Mini App storefront: cart state and
//! pricing, delivery/fulfillment preferences, and order submission against
//! the Samovar REST backend. UI rendering, routing, and the Telegram WebApp
//! bridge live in the Mini App shell; this crate is everything underneath.
//!
//! # Architecture
//!
//! - [`storage`] - local durable key-value snapshots (the localStorage
//!   analogue) for instant rehydration between sessions
//! - [`api`] - REST client for profile, addresses, and orders
//! - [`pricing`] - pure option-price resolution and selection validation
//! - [`cart`] - the cart store: single-restaurant line items with frozen
//!   unit prices
//! - [`delivery`] - delivery-vs-pickup preference, addresses, branches
//! - [`checkout`] - totals math, bonus redemption cap, order submission
//!
//! Stores are explicit context objects handed to callers, not globals, so
//! tests and concurrent sessions get isolated state.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod delivery;
pub mod pricing;
pub mod storage;
