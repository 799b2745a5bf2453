//! Cart data model: lines, option selections, and derived totals.
//!
//! The mutation logic lives in the storefront crate's `CartStore`; this
//! module only defines the shapes and the cheap derived reads so they can be
//! serialized to local storage and shared with order assembly.

use serde::{Deserialize, Serialize};

use super::catalog::Product;
use super::id::{CartLineId, OptionId, OptionValueId, ProductId, RestaurantId};
use super::price::Price;

/// A recorded option choice: which value of which option.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedOption {
    pub option_id: OptionId,
    pub value_id: OptionValueId,
}

impl SelectedOption {
    #[must_use]
    pub fn new(option_id: impl Into<OptionId>, value_id: impl Into<OptionValueId>) -> Self {
        Self {
            option_id: option_id.into(),
            value_id: value_id.into(),
        }
    }
}

/// One purchasable cart line.
///
/// The identity is generated locally per add-to-cart action, so the same
/// product with different option selections produces distinct lines.
/// `unit_price` is frozen at insertion time and never re-resolved, even if
/// the catalog product changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: CartLineId,
    pub product_id: ProductId,
    /// Snapshot of the product at insertion time.
    pub product: Product,
    pub quantity: u32,
    pub selected_options: Vec<SelectedOption>,
    /// Unit price with option deltas applied, frozen at insertion.
    pub unit_price: Price,
}

impl CartLine {
    /// Line total: frozen unit price times quantity.
    #[must_use]
    pub fn total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }

    /// Canonical selection key used for line merging: the sorted multiset of
    /// (option, value) pairs. Selection order is irrelevant.
    #[must_use]
    pub fn selection_key(&self) -> Vec<(OptionId, OptionValueId)> {
        selection_key(&self.selected_options)
    }
}

/// Sorted (option, value) pairs for order-insensitive selection comparison.
#[must_use]
pub fn selection_key(selections: &[SelectedOption]) -> Vec<(OptionId, OptionValueId)> {
    let mut key: Vec<_> = selections
        .iter()
        .map(|s| (s.option_id.clone(), s.value_id.clone()))
        .collect();
    key.sort();
    key
}

/// The shopping cart: an ordered sequence of lines from a single restaurant.
///
/// Invariants:
/// - all lines share `restaurant_id`;
/// - `restaurant_id` is `None` exactly when the cart is empty;
/// - `subtotal` is denormalized and recomputed on every mutation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub items: Vec<CartLine>,
    pub restaurant_id: Option<RestaurantId>,
    pub subtotal: Price,
}

impl Cart {
    /// An empty cart: no lines, no restaurant, zero subtotal.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities across all lines (cart badge, checkout gating).
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }

    /// Recompute the denormalized subtotal from the lines.
    #[must_use]
    pub fn computed_subtotal(&self) -> Price {
        self.items.iter().map(CartLine::total).sum()
    }
}
