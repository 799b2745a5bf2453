//! Core types for Samovar.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod catalog;
pub mod fulfillment;
pub mod id;
pub mod order;
pub mod price;
pub mod status;

pub use cart::{Cart, CartLine, SelectedOption};
pub use catalog::{OptionMode, OptionValue, Product, ProductOption};
pub use fulfillment::{Address, Branch, DeliveryPreference};
pub use id::*;
pub use order::{CallPreference, ContactDetails, Order, OrderAdjustments, OrderDraft, OrderLine};
pub use price::Price;
pub use status::{FulfillmentMode, OrderStatus};
