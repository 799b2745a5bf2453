//! Status enums for orders and fulfillment.

use serde::{Deserialize, Serialize};

/// How an order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentMode {
    /// Courier delivery to a saved address.
    Delivery,
    /// Customer collects from a restaurant branch.
    Pickup,
}

impl std::fmt::Display for FulfillmentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Delivery => write!(f, "delivery"),
            Self::Pickup => write!(f, "pickup"),
        }
    }
}

impl std::str::FromStr for FulfillmentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "delivery" => Ok(Self::Delivery),
            "pickup" => Ok(Self::Pickup),
            _ => Err(format!("invalid fulfillment mode: {s}")),
        }
    }
}

/// Order lifecycle status.
///
/// Statuses move strictly forward:
///
/// `created → confirmed → preparing → (ready_for_pickup | on_the_way) → delivered`
///
/// `cancelled` and `refunded` are terminal and reachable from any
/// non-terminal state. There are no backward transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Created,
    Confirmed,
    Preparing,
    ReadyForPickup,
    OnTheWay,
    Delivered,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    /// Terminal states admit no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled | Self::Refunded)
    }

    /// An order the kitchen or courier is still working on.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !self.is_terminal()
    }

    /// Whether the lifecycle permits moving from `self` to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        // Cancellation and refund short-circuit from any non-terminal state.
        if matches!(next, Self::Cancelled | Self::Refunded) {
            return true;
        }
        matches!(
            (self, next),
            (Self::Created, Self::Confirmed)
                | (Self::Confirmed, Self::Preparing)
                | (Self::Preparing, Self::ReadyForPickup | Self::OnTheWay)
                | (Self::ReadyForPickup | Self::OnTheWay, Self::Delivered)
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Created => "created",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::ReadyForPickup => "ready_for_pickup",
            Self::OnTheWay => "on_the_way",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        use OrderStatus::*;
        assert!(Created.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(Preparing));
        assert!(Preparing.can_transition_to(ReadyForPickup));
        assert!(Preparing.can_transition_to(OnTheWay));
        assert!(ReadyForPickup.can_transition_to(Delivered));
        assert!(OnTheWay.can_transition_to(Delivered));
    }

    #[test]
    fn test_no_backward_or_skipping_transitions() {
        use OrderStatus::*;
        assert!(!Confirmed.can_transition_to(Created));
        assert!(!Created.can_transition_to(Preparing));
        assert!(!Created.can_transition_to(Delivered));
        assert!(!OnTheWay.can_transition_to(Preparing));
    }

    #[test]
    fn test_cancel_and_refund_from_any_non_terminal() {
        use OrderStatus::*;
        for status in [Created, Confirmed, Preparing, ReadyForPickup, OnTheWay] {
            assert!(status.can_transition_to(Cancelled));
            assert!(status.can_transition_to(Refunded));
        }
    }

    #[test]
    fn test_terminal_states_are_frozen() {
        use OrderStatus::*;
        for status in [Delivered, Cancelled, Refunded] {
            assert!(status.is_terminal());
            for next in [Created, Confirmed, Preparing, Cancelled, Refunded] {
                assert!(!status.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&OrderStatus::ReadyForPickup).unwrap();
        assert_eq!(json, "\"ready_for_pickup\"");
        let back: OrderStatus = serde_json::from_str("\"on_the_way\"").unwrap();
        assert_eq!(back, OrderStatus::OnTheWay);
    }
}
