//! Fulfillment types: saved addresses, pickup branches, and the delivery
//! preference mirrored between local storage and the remote profile.

use serde::{Deserialize, Serialize};

use super::id::{AddressId, BranchId, RestaurantId};
use super::status::FulfillmentMode;

/// A saved delivery address. Free-text fields; the courier reads them as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    pub street: String,
    pub building: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apartment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intercom: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Display label, e.g. "Home" or "Work".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// At most one address per user should be the default. The store keeps
    /// this locally; the server is not consulted for uniqueness.
    #[serde(default)]
    pub is_default: bool,
}

/// A restaurant branch a pickup order can be collected from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: BranchId,
    pub restaurant_id: RestaurantId,
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub work_time: String,
}

/// The delivery-vs-pickup choice plus the matching selection.
///
/// Persisted to local storage and mirrored to the remote profile; the two
/// copies may transiently disagree. `version` is a monotonic token bumped on
/// every local mutation so reconciliation is last-writer-wins by version
/// rather than by arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPreference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<FulfillmentMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_branch: Option<Branch>,
    #[serde(default)]
    pub version: u64,
}

impl DeliveryPreference {
    /// Whether the mode has a consistent selection: an address for delivery,
    /// a branch for pickup.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        match self.mode {
            Some(FulfillmentMode::Delivery) => self.selected_address.is_some(),
            Some(FulfillmentMode::Pickup) => self.selected_branch.is_some(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(id: &str) -> Address {
        Address {
            id: AddressId::new(id),
            street: "Арбат".to_owned(),
            building: "12".to_owned(),
            apartment: None,
            entrance: None,
            floor: None,
            intercom: None,
            comment: None,
            label: None,
            is_default: false,
        }
    }

    #[test]
    fn test_completeness_requires_matching_selection() {
        let mut pref = DeliveryPreference::default();
        assert!(!pref.is_complete());

        pref.mode = Some(FulfillmentMode::Delivery);
        assert!(!pref.is_complete());

        pref.selected_address = Some(address("addr_1"));
        assert!(pref.is_complete());

        // A branch does not satisfy delivery mode.
        pref.selected_address = None;
        pref.selected_branch = Some(Branch {
            id: BranchId::new("br_1"),
            restaurant_id: RestaurantId::new("rest_1"),
            name: "Центр".to_owned(),
            address: "Тверская 1".to_owned(),
            phone: None,
            work_time: "10:00-22:00".to_owned(),
        });
        assert!(!pref.is_complete());

        pref.mode = Some(FulfillmentMode::Pickup);
        assert!(pref.is_complete());
    }
}
