//! Catalog types: products and their configurable options.
//!
//! Products are read-only reference data from the cart's perspective. The
//! cart embeds a snapshot of the product at the moment it is added; later
//! catalog changes do not flow into existing cart lines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CategoryId, OptionId, OptionValueId, ProductId, RestaurantId};
use super::price::Price;

/// A purchasable menu item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Base unit price before option deltas.
    pub price: Price,
    /// Pre-discount price, shown struck through when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_price: Option<Price>,
    pub category_id: CategoryId,
    pub restaurant_id: RestaurantId,
    #[serde(default)]
    pub options: Vec<ProductOption>,
}

impl Product {
    /// Look up an option definition by id.
    #[must_use]
    pub fn option(&self, id: &OptionId) -> Option<&ProductOption> {
        self.options.iter().find(|o| &o.id == id)
    }
}

/// How many values an option admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionMode {
    /// Exactly one value (radio).
    Single,
    /// Up to `max_choices` values (checkbox).
    Multiple,
}

/// A configurable product attribute, e.g. size or extra toppings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOption {
    pub id: OptionId,
    pub name: String,
    #[serde(rename = "type")]
    pub mode: OptionMode,
    /// A required `single` option must have a value selected before the item
    /// is purchasable. Enforced by the UI layer, not the cart store.
    #[serde(default)]
    pub required: bool,
    /// Upper bound on selections for `multiple` options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_choices: Option<u32>,
    pub values: Vec<OptionValue>,
}

impl ProductOption {
    /// Look up a value by id.
    #[must_use]
    pub fn value(&self, id: &OptionValueId) -> Option<&OptionValue> {
        self.values.iter().find(|v| &v.id == id)
    }
}

/// One selectable value of a [`ProductOption`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionValue {
    pub id: OptionValueId,
    pub name: String,
    /// Signed amount added to the unit price when this value is selected.
    pub price_delta: Decimal,
    #[serde(default)]
    pub is_default: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size_option() -> ProductOption {
        ProductOption {
            id: OptionId::new("opt_size"),
            name: "Size".to_owned(),
            mode: OptionMode::Single,
            required: true,
            max_choices: None,
            values: vec![
                OptionValue {
                    id: OptionValueId::new("val_small"),
                    name: "Small".to_owned(),
                    price_delta: Decimal::ZERO,
                    is_default: true,
                },
                OptionValue {
                    id: OptionValueId::new("val_medium"),
                    name: "Medium".to_owned(),
                    price_delta: Decimal::from(100),
                    is_default: false,
                },
            ],
        }
    }

    #[test]
    fn test_option_and_value_lookup() {
        let option = size_option();
        let value = option.value(&OptionValueId::new("val_medium")).unwrap();
        assert_eq!(value.price_delta, Decimal::from(100));
        assert!(option.value(&OptionValueId::new("val_missing")).is_none());
    }

    #[test]
    fn test_option_mode_serde_uses_type_field() {
        let option = size_option();
        let json = serde_json::to_value(&option).unwrap();
        assert_eq!(json["type"], "single");
        let back: ProductOption = serde_json::from_value(json).unwrap();
        assert_eq!(back.mode, OptionMode::Single);
    }
}
