//! Checkout: order totals, bonus-point redemption, draft assembly and
//! submission, and order history.
//!
//! All amounts computed here are advisory. The backend recomputes every
//! total from its own catalog and rejects drafts it disagrees with; the
//! client-side numbers exist so the confirmation screen can show the user
//! what to expect.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;
use tracing::instrument;

use samovar_core::{
    Cart, ContactDetails, DeliveryPreference, FulfillmentMode, Order, OrderAdjustments,
    OrderDraft, OrderLine, OrderStatus, Price,
};

use crate::api::{ApiClient, ApiError};
use crate::config::CheckoutPolicy;

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cannot check out an empty cart")]
    EmptyCart,

    #[error("no fulfillment mode selected")]
    NoFulfillmentMode,

    #[error("delivery order has no address selected")]
    MissingAddress,

    #[error("pickup order has no branch selected")]
    MissingBranch,

    #[error("requested {requested} bonus points but only {cap} are redeemable")]
    BonusCapExceeded { requested: u64, cap: u64 },

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// The redeemable-point ceiling for an order: the lesser of the user's
/// balance and the policy cap (a fraction of the order total, floored to
/// whole points at the configured point value).
#[must_use]
pub fn max_redeemable_points(balance: u64, order_total: Price, policy: &CheckoutPolicy) -> u64 {
    if policy.point_value <= Decimal::ZERO {
        return 0;
    }
    let cap_money = order_total.amount() * policy.bonus_cap_ratio;
    let cap_points = (cap_money / policy.point_value)
        .floor()
        .to_u64()
        .unwrap_or(0);
    balance.min(cap_points)
}

/// The advisory money breakdown shown on the confirmation screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: Price,
    pub delivery_fee: Price,
    pub promo_discount: Price,
    pub bonus_value: Price,
    pub final_amount: Price,
}

impl OrderTotals {
    /// Compute the final amount: subtotal plus delivery fee, minus promo
    /// discount and redeemed bonus value, clamped at zero.
    #[must_use]
    pub fn compute(
        subtotal: Price,
        delivery_fee: Price,
        promo_discount: Price,
        bonus_points: u64,
        point_value: Decimal,
    ) -> Self {
        let bonus_value = Price::from(Decimal::from(bonus_points) * point_value);
        let final_amount = (subtotal + delivery_fee)
            .saturating_sub(promo_discount)
            .saturating_sub(bonus_value);
        Self {
            subtotal,
            delivery_fee,
            promo_discount,
            bonus_value,
            final_amount,
        }
    }
}

/// Assemble a submittable draft from the current cart and delivery state.
///
/// # Errors
///
/// Rejects empty carts, a missing fulfillment mode, delivery without a
/// selected address, pickup without a selected branch, and bonus
/// redemption beyond [`max_redeemable_points`].
pub fn build_draft(
    cart: &Cart,
    preference: &DeliveryPreference,
    contact: ContactDetails,
    adjustments: OrderAdjustments,
    delivery_fee: Price,
    bonus_balance: u64,
    policy: &CheckoutPolicy,
) -> Result<OrderDraft, CheckoutError> {
    let Some(restaurant_id) = cart.restaurant_id.clone() else {
        return Err(CheckoutError::EmptyCart);
    };
    if cart.items.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    let Some(fulfillment) = preference.mode else {
        return Err(CheckoutError::NoFulfillmentMode);
    };

    let (address, branch) = match fulfillment {
        FulfillmentMode::Delivery => {
            let Some(address) = preference.selected_address.clone() else {
                return Err(CheckoutError::MissingAddress);
            };
            (Some(address), None)
        }
        FulfillmentMode::Pickup => {
            let Some(branch) = preference.selected_branch.clone() else {
                return Err(CheckoutError::MissingBranch);
            };
            (None, Some(branch))
        }
    };

    let subtotal = cart.computed_subtotal();
    let cap = max_redeemable_points(bonus_balance, subtotal + delivery_fee, policy);
    if adjustments.bonus_used > cap {
        return Err(CheckoutError::BonusCapExceeded {
            requested: adjustments.bonus_used,
            cap,
        });
    }

    let totals = OrderTotals::compute(
        subtotal,
        delivery_fee,
        adjustments.discount_amount,
        adjustments.bonus_used,
        policy.point_value,
    );

    let items = cart
        .items
        .iter()
        .map(|line| OrderLine {
            product_id: line.product_id.clone(),
            product: line.product.clone(),
            quantity: line.quantity,
            selected_options: line.selected_options.clone(),
            unit_price: line.unit_price,
        })
        .collect();

    Ok(OrderDraft {
        restaurant_id,
        items,
        subtotal,
        adjustments,
        delivery_fee,
        final_amount: totals.final_amount,
        fulfillment,
        address,
        branch,
        contact,
    })
}

/// Submit a draft to the backend.
///
/// The cart is deliberately NOT cleared here. Clearing before the server
/// confirms would lose the cart on a failed submission, so the caller
/// clears it only after this returns `Ok`.
///
/// # Errors
///
/// Propagates transport and backend failures as [`CheckoutError::Api`].
#[instrument(skip_all, fields(restaurant = %draft.restaurant_id, items = draft.items.len()))]
pub async fn submit(api: &ApiClient, draft: &OrderDraft) -> Result<Order, CheckoutError> {
    Ok(api.create_order(draft).await?)
}

/// Fetch the user's full order history, newest first per the backend.
///
/// # Errors
///
/// Propagates transport and backend failures as [`CheckoutError::Api`].
pub async fn fetch_history(api: &ApiClient) -> Result<Vec<Order>, CheckoutError> {
    Ok(api.list_orders().await?)
}

/// Split a history into (active, completed) by terminal status.
#[must_use]
pub fn partition_history(orders: Vec<Order>) -> (Vec<Order>, Vec<Order>) {
    orders.into_iter().partition(|o| !o.status.is_terminal())
}

/// Total money spent across delivered orders.
#[must_use]
pub fn total_spent(orders: &[Order]) -> Price {
    orders
        .iter()
        .filter(|o| o.status == OrderStatus::Delivered)
        .map(|o| o.final_amount)
        .sum()
}
