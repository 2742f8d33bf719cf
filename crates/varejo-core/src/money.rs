//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In floating point:                                                 │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                       │
//! │                                                                     │
//! │  Prices stored as floats drift over many sales and discounts.      │
//! │                                                                     │
//! │  OUR SOLUTION: Integer Cents                                        │
//! │    R$ 25.00 = 2500 cents, R$ 25.00 × 4 = 10000 cents exactly       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Percentage rates throughout the system are carried in basis points
//! (1 bps = 0.01%), so 30% = 3000 bps. This keeps rate math in integers too.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (centavos).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for refunds and deltas
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use varejo_core::money::Money;
    ///
    /// let price = Money::from_cents(2500); // R$ 25.00
    /// assert_eq!(price.cents(), 2500);
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

    /// Returns the major unit (reais) portion.
    #[inline]
    pub const fn reais(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion, always 0-99.
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use varejo_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(2500); // R$ 25.00
    /// let total = unit_price.multiply_quantity(4);
    /// assert_eq!(total.cents(), 10000); // R$ 100.00
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Computes a fraction of this value given a rate in basis points.
    ///
    /// ## Implementation
    /// Integer math with rounding: `(amount * bps + 5000) / 10000`.
    /// i128 intermediates prevent overflow on large amounts.
    ///
    /// ## Example
    /// ```rust
    /// use varejo_core::money::Money;
    ///
    /// let total = Money::from_cents(10000); // R$ 100.00
    /// let ten_percent = total.fraction_bps(1000);
    /// assert_eq!(ten_percent.cents(), 1000); // R$ 10.00
    /// ```
    pub fn fraction_bps(&self, bps: u32) -> Money {
        let cents = (self.0 as i128 * bps as i128 + 5000) / 10000;
        Money::from_cents(cents as i64)
    }

    /// Computes a fraction of this value, truncating instead of rounding.
    ///
    /// Used for discount ceilings, where the limit must never round upward
    /// past the exact bound.
    pub fn fraction_bps_floor(&self, bps: u32) -> Money {
        let cents = (self.0 as i128 * bps as i128) / 10000;
        Money::from_cents(cents as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is the format used on invoices. Dashboard rendering handles
/// localization separately.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}R$ {}.{:02}", sign, self.reais().abs(), self.cents_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
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

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
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
    fn test_from_cents() {
        let money = Money::from_cents(2599);
        assert_eq!(money.cents(), 2599);
        assert_eq!(money.reais(), 25);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(2599)), "R$ 25.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "R$ 5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-R$ 5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "R$ 0.00");
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
    fn test_multiply_quantity() {
        let unit_price = Money::from_cents(2500);
        let total = unit_price.multiply_quantity(4);
        assert_eq!(total.cents(), 10000);
    }

    #[test]
    fn test_fraction_bps() {
        // 10% of R$ 100.00 = R$ 10.00
        let total = Money::from_cents(10000);
        assert_eq!(total.fraction_bps(1000).cents(), 1000);

        // 15% of R$ 99.99 = R$ 15.00 (rounded from 14.9985)
        let odd = Money::from_cents(9999);
        assert_eq!(odd.fraction_bps(1500).cents(), 1500);
    }

    #[test]
    fn test_fraction_bps_floor() {
        // 30% of R$ 99.99 = R$ 29.99 truncated (29.997 exact)
        let odd = Money::from_cents(9999);
        assert_eq!(odd.fraction_bps_floor(3000).cents(), 2999);
        // Exact multiples do not truncate
        assert_eq!(Money::from_cents(10000).fraction_bps_floor(3000).cents(), 3000);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        assert!(Money::from_cents(100).is_positive());
        assert!(Money::from_cents(-100).is_negative());
    }
}
