//! # Money Module
//!
//! Provides the `Money` type for menu prices, discounts and the service fee.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A bar tab sums dozens of discounted lines plus a 10% fee. Float drift  │
//! │  shows up as totals that disagree with the receipt by a cent.           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Every percentage is applied in basis points with explicit           │
//! │    half-up rounding, once, at a known place.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use lounge_core::money::Money;
//!
//! let price = Money::from_cents(1250); // 12.50
//! let line = price * 2;                // 25.00
//! let fee = line.percentage(1000);     // 10% = 2.50
//! assert_eq!((line + fee).cents(), 2750);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

/// Basis points in one whole (100%).
const BPS_SCALE: i128 = 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Where Money is Used
/// ```text
/// Product.price ──► effective_price (discount) ──► line total (× qty)
///                                                        │
///                         Cart.subtotal ◄────────────────┘
///                               │
///                               ├──► service_fee (10%)
///                               ▼
///                          Cart.total ──► OrderRequest.total
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use lounge_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns `bps` basis points of this amount, rounded half-up.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`. The +5000 provides the
    /// rounding (5000/10000 = 0.5). `i128` keeps large tabs from overflowing.
    ///
    /// ## Example
    /// ```rust
    /// use lounge_core::money::Money;
    ///
    /// let subtotal = Money::from_cents(20000);
    /// assert_eq!(subtotal.percentage(1000).cents(), 2000); // 10%
    ///
    /// // 10% of 0.05 = 0.005 → rounds to 0.01
    /// assert_eq!(Money::from_cents(5).percentage(1000).cents(), 1);
    /// ```
    pub fn percentage(&self, bps: u32) -> Money {
        let cents = (self.0 as i128 * bps as i128 + BPS_SCALE / 2) / BPS_SCALE;
        Money(cents as i64)
    }

    /// Applies a percentage discount and returns the discounted amount.
    ///
    /// ## Arguments
    /// * `discount_bps` - Discount in basis points (2000 = 20%)
    ///
    /// ## Example
    /// ```rust
    /// use lounge_core::money::Money;
    ///
    /// let price = Money::from_cents(10000);
    /// assert_eq!(price.apply_percentage_discount(2000).cents(), 8000);
    /// ```
    pub fn apply_percentage_discount(&self, discount_bps: u32) -> Money {
        *self - self.percentage(discount_bps)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly rendering. The storefront formats with the configured
/// currency symbol instead.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
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

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        assert_eq!(Money::from_cents(20000).percentage(1000).cents(), 2000);
        // 10% of 1.25 = 0.125 → 0.13
        assert_eq!(Money::from_cents(125).percentage(1000).cents(), 13);
        // 10% of 1.24 = 0.124 → 0.12
        assert_eq!(Money::from_cents(124).percentage(1000).cents(), 12);
        assert_eq!(Money::from_cents(999).percentage(0).cents(), 0);
    }

    #[test]
    fn test_percentage_discount() {
        assert_eq!(
            Money::from_cents(10000).apply_percentage_discount(2000).cents(),
            8000
        );
        assert_eq!(
            Money::from_cents(10000).apply_percentage_discount(10000).cents(),
            0
        );
        // 15% off 3.33 = 3.33 - 0.4995(→0.50) = 2.83
        assert_eq!(
            Money::from_cents(333).apply_percentage_discount(1500).cents(),
            283
        );
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 250, 650].into_iter().map(Money::from_cents).sum();
        assert_eq!(total.cents(), 1000);

        let empty: Money = std::iter::empty().sum();
        assert!(empty.is_zero());
    }
}
