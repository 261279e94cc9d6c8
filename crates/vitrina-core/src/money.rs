//! # Money Module
//!
//! Integer money for product prices and shipping costs.
//!
//! Every amount is stored in the smallest currency unit (cents). Stores sell
//! in their own currency, so `Money` carries no currency code: the store's
//! settings decide how an amount is rendered.
//!
//! ## Usage
//! ```rust
//! use vitrina_core::money::Money;
//!
//! let base = Money::from_cents(1_500);      // 15.00 shipping
//! let per_kg = Money::from_cents(250);      // 2.50 per extra kg
//! let total = base + per_kg * 3;
//! assert_eq!(total.cents(), 2_250);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product.price_cents ─────────────► listing price                       │
/// │                                                                         │
/// │  ShippingConfig.*.cost_cents ─┬──► ShippingConfig::quote(subtotal)      │
/// │  FreeShipping.minimum_cents ──┘        │                                │
/// │                                        ▼                                │
/// │                                  Money (shipping due)                   │
/// │                                                                         │
/// │  DeliveryZone.price_cents ────────► zone surcharge                      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use vitrina_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Subtracts without going below zero.
    ///
    /// ```rust
    /// use vitrina_core::money::Money;
    ///
    /// let left = Money::from_cents(300).saturating_sub_floor(Money::from_cents(500));
    /// assert!(left.is_zero());
    /// ```
    #[inline]
    pub fn saturating_sub_floor(self, other: Money) -> Money {
        Money((self.0 - other.0).max(0))
    }

    /// Renders the amount with a currency symbol, e.g. `S/ 12.50`.
    pub fn format_with(&self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            symbol,
            self.major().abs(),
            self.minor_part()
        )
    }
}

/// Debug-oriented rendering without a currency symbol (`12.50`).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display_and_format() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(1250).format_with("S/ "), "S/ 12.50");
        assert_eq!(Money::from_cents(-7).format_with("$"), "-$0.07");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(400);
        assert_eq!((a + b).cents(), 1400);
        assert_eq!((a - b).cents(), 600);
        assert_eq!((b * 3).cents(), 1200);
        assert_eq!(b.saturating_sub_floor(a), Money::zero());

        let mut total = Money::zero();
        total += a;
        assert_eq!(total, a);
    }
}
