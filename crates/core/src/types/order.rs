//! Order types: the submission draft sent to the backend and the finalized
//! order snapshot it returns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cart::SelectedOption;
use super::catalog::Product;
use super::fulfillment::{Address, Branch};
use super::id::{OrderId, ProductId, RestaurantId, UserId};
use super::price::Price;
use super::status::{FulfillmentMode, OrderStatus};

/// How the restaurant should reach the customer about the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallPreference {
    #[default]
    Call,
    Message,
    None,
}

/// Contact details attached to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default)]
    pub call_preference: CallPreference,
}

/// One ordered line: the cart line minus its local identity.
///
/// `unit_price` carries the price frozen when the line entered the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub product: Product,
    pub quantity: u32,
    pub selected_options: Vec<SelectedOption>,
    pub unit_price: Price,
}

impl OrderLine {
    /// Line total at the frozen unit price.
    #[must_use]
    pub fn total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// Client-side promo and bonus adjustments attached to a submission.
///
/// Advisory only - the backend recomputes the authoritative amounts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAdjustments {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,
    #[serde(default)]
    pub discount_amount: Price,
    /// Bonus points redeemed against this order.
    #[serde(default)]
    pub bonus_used: u64,
}

/// The order submission payload for `POST /orders/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub restaurant_id: RestaurantId,
    pub items: Vec<OrderLine>,
    pub subtotal: Price,
    #[serde(flatten)]
    pub adjustments: OrderAdjustments,
    pub delivery_fee: Price,
    /// Client-side advisory total; the server recomputes.
    pub final_amount: Price,
    #[serde(rename = "type")]
    pub fulfillment: FulfillmentMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<Branch>,
    #[serde(flatten)]
    pub contact: ContactDetails,
}

/// A finalized order as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub restaurant_id: RestaurantId,
    pub items: Vec<OrderLine>,
    pub total_amount: Price,
    #[serde(default)]
    pub bonus_used: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_code_applied: Option<String>,
    #[serde(default)]
    pub discount_amount: Price,
    #[serde(default)]
    pub delivery_fee: Price,
    pub final_amount: Price,
    #[serde(rename = "type")]
    pub fulfillment: FulfillmentMode,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<Branch>,
    pub contact_name: String,
    pub contact_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default)]
    pub call_preferences: CallPreference,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
