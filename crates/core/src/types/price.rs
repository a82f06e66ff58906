//! Minor-unit price representation using decimal arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An amount in the smallest currency unit (e.g., cents for USD).
///
/// SureCart reports every monetary amount as an integer in minor units.
/// Omnisend expects decimal major units, so the only operation that matters
/// is the exact division by 100. Assumes 2-decimal currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cents(pub i64);

impl Cents {
    /// Create an amount from minor units.
    #[must_use]
    pub const fn new(minor_units: i64) -> Self {
        Self(minor_units)
    }

    /// Convert to major units as an exact decimal (1999 -> 19.99).
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Convert to major units, discarding the sign (discount amounts are
    /// reported negative by SureCart but must be sent as positive values).
    #[must_use]
    pub fn to_decimal_abs(self) -> Decimal {
        self.to_decimal().abs()
    }
}

impl From<i64> for Cents {
    fn from(minor_units: i64) -> Self {
        Self(minor_units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::ToPrimitive;

    #[test]
    fn converts_minor_units_exactly() {
        assert_eq!(Cents(1999).to_decimal(), Decimal::new(1999, 2));
        assert_eq!(Cents(1999).to_decimal().to_f64(), Some(19.99));
        assert_eq!(Cents(0).to_decimal(), Decimal::ZERO);
        assert_eq!(Cents(100).to_decimal(), Decimal::ONE.round_dp(2));
    }

    #[test]
    fn no_rounding_drift_for_typical_values() {
        for minor in [1_i64, 5, 33, 999, 1999, 10_000, 123_456_789] {
            let expected = Decimal::new(minor, 2);
            assert_eq!(Cents(minor).to_decimal(), expected);
        }
    }

    #[test]
    fn abs_normalizes_negative_amounts() {
        assert_eq!(Cents(-500).to_decimal_abs(), Decimal::new(500, 2));
        assert_eq!(Cents(500).to_decimal_abs(), Decimal::new(500, 2));
    }
}
