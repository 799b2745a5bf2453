//! Type-safe price representation using decimal arithmetic.
//!
//! The storefront trades in a single currency (roubles), so `Price` wraps a
//! bare [`Decimal`] amount rather than carrying a currency code. Amounts are
//! in the currency's standard unit (roubles, not kopeks).

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount in roubles.
///
/// Option deltas can be negative, so intermediate sums may dip below zero;
/// use [`Price::clamped_non_negative`] where a display value must not.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero roubles.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole-rouble amount.
    #[must_use]
    pub fn rubles(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply a unit price by a quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Subtract, never going below zero.
    #[must_use]
    pub fn saturating_sub(&self, other: Self) -> Self {
        Self((self.0 - other.0).max(Decimal::ZERO))
    }

    /// Clamp a possibly negative amount to zero.
    #[must_use]
    pub fn clamped_non_negative(&self) -> Self {
        Self(self.0.max(Decimal::ZERO))
    }

    /// Whole-rouble floor of the amount.
    #[must_use]
    pub fn floor(&self) -> Self {
        Self(self.0.floor())
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ₽", self.0.normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_times_and_sum() {
        let unit = Price::rubles(550);
        assert_eq!(unit.times(2), Price::rubles(1100));

        let total: Price = [Price::rubles(100), Price::rubles(250)].into_iter().sum();
        assert_eq!(total, Price::rubles(350));
    }

    #[test]
    fn test_saturating_sub_floors_at_zero() {
        assert_eq!(
            Price::rubles(100).saturating_sub(Price::rubles(250)),
            Price::ZERO
        );
        assert_eq!(
            Price::rubles(250).saturating_sub(Price::rubles(100)),
            Price::rubles(150)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::rubles(450).to_string(), "450 ₽");
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&Price::rubles(450)).unwrap();
        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Price::rubles(450));
    }
}
