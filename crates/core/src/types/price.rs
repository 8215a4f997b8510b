//! Decimal price arithmetic.
//!
//! Prices are kept as `rust_decimal::Decimal` so that line subtotals and shop
//! totals never pick up binary floating point error. They serialize as
//! strings (`"12.50"`), which is how the catalog and the persisted cart
//! carry them.

use std::iter::Sum;
use std::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A unit price or a total, in the shop's currency.
///
/// Kirana serves shops in a single market, so no currency is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// The zero price, returned as the total of an empty cart.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units at this unit price.
    ///
    /// Saturates at `Decimal::MAX` (or `MIN`) instead of overflowing.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// Whether the amount is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Price {
    type Output = Self;

    // Saturating, so totals over huge prices never panic.
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Price {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_times_quantity() {
        let unit = Price::new(dec!(12.25));
        assert_eq!(unit.times(4), Price::new(dec!(49.00)));
        assert_eq!(unit.times(0), Price::ZERO);
    }

    #[test]
    fn test_times_saturates_on_overflow() {
        let huge = Price::new(Decimal::MAX / dec!(2));
        assert_eq!(huge.times(3), Price::new(Decimal::MAX));
        assert_eq!(Price::new(Decimal::MIN).times(2), Price::new(Decimal::MIN));
    }

    #[test]
    fn test_add_saturates_on_overflow() {
        let total = Price::new(Decimal::MAX) + Price::new(dec!(1));
        assert_eq!(total, Price::new(Decimal::MAX));

        let total: Price = [Decimal::MAX, Decimal::MAX, dec!(5)]
            .into_iter()
            .map(Price::new)
            .sum();
        assert_eq!(total, Price::new(Decimal::MAX));
    }

    #[test]
    fn test_sum_of_empty_is_zero() {
        let total: Price = Vec::<Price>::new().into_iter().sum();
        assert_eq!(total, Price::ZERO);
    }

    #[test]
    fn test_sum_avoids_float_drift() {
        let total: Price = [dec!(0.1), dec!(0.2)].into_iter().map(Price::new).sum();
        assert_eq!(total, Price::new(dec!(0.3)));
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Price::new(dec!(100.50))).unwrap();
        assert_eq!(json, r#""100.50""#);

        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Price::new(dec!(100.50)));
    }

    #[test]
    fn test_display_two_places() {
        assert_eq!(Price::new(dec!(7)).to_string(), "7.00");
    }

    #[test]
    fn test_is_negative() {
        assert!(Price::new(dec!(-1)).is_negative());
        assert!(!Price::ZERO.is_negative());
        assert!(!Price::new(dec!(3)).is_negative());
    }
}
