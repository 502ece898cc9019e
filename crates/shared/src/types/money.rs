//! Money precision and rounding helpers.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts are `rust_decimal::Decimal` values rounded to a configured
//! number of decimal places.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Round a decimal value half-up (midpoint away from zero).
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use fieldshare_shared::types::round_half_up;
///
/// assert_eq!(round_half_up(dec!(2.5), 0), dec!(3));
/// assert_eq!(round_half_up(dec!(99.99), 0), dec!(100));
/// ```
#[must_use]
pub fn round_half_up(value: Decimal, decimal_places: u32) -> Decimal {
    value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero)
}

/// Number of decimal places monetary values are rounded to.
///
/// `0` means whole minor units (the default for farm ledgers kept in rupees).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoneyPrecision(pub u32);

impl MoneyPrecision {
    /// Whole units, no fractional part.
    pub const WHOLE: Self = Self(0);

    /// Two decimal places (cents/paise).
    pub const CENTS: Self = Self(2);

    /// Returns the number of decimal places.
    #[must_use]
    pub const fn decimal_places(self) -> u32 {
        self.0
    }

    /// Smallest representable unit at this precision (e.g. `0.01` for two places).
    #[must_use]
    pub fn unit(self) -> Decimal {
        Decimal::new(1, self.0)
    }

    /// Rounds `value` half-up to this precision.
    #[must_use]
    pub fn round(self, value: Decimal) -> Decimal {
        round_half_up(value, self.0)
    }

    /// Returns true if `value` carries no digits beyond this precision.
    #[must_use]
    pub fn is_exact(self, value: Decimal) -> bool {
        self.round(value) == value
    }
}
