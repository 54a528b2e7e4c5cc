//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A ledger that drifts by a cent per order does not reconcile.           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    $229.70 is stored as 22970                                           │
//! │    Rounding happens at exactly ONE point: applying a tax rate,          │
//! │    half-up, in integer math                                             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use arbor_core::money::Money;
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(10_000); // $100.00
//!
//! // Arithmetic operations
//! let doubled = price * 2;                       // $200.00
//! let total = doubled + Money::from_cents(1_500); // $215.00
//!
//! // NEVER do this:
//! // let bad = Money::from_float(100.0); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Dealer balances can be negative (dealer owes us)
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## Where Money Flows
/// ```text
/// OrderItem.unit_price ──► line total ──► Order.subtotal
///                                              │
///            discount / tax / shipping ────────┤
///                                              ▼
///                                        Order.total ──► Invoice snapshot
///                                              │
///                                              ▼
///                          Payment.amount / Check.amount ──► dealer balance
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use arbor_core::money::Money;
    ///
    /// let price = Money::from_cents(22_970); // $229.70
    /// assert_eq!(price.cents(), 22_970);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (dollars and cents).
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    /// `from_major_minor(-5, 50)` = -$5.50, not -$4.50
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
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

    /// Calculates tax on this amount, rounding half-up.
    ///
    /// This is the ONLY place in the ledger where rounding occurs. The
    /// taxable base is the post-discount, pre-shipping amount; shipping
    /// itself is never taxed (see [`crate::totals`]).
    ///
    /// ## Implementation
    /// Integer math throughout: `(amount * bps + 5000) / 10000`.
    /// The +5000 provides half-up rounding (5000/10000 = 0.5). i128
    /// intermediates prevent overflow on large amounts.
    ///
    /// ## Example
    /// ```rust
    /// use arbor_core::money::Money;
    /// use arbor_core::types::TaxRate;
    ///
    /// let base = Money::from_cents(19_000); // $190.00 taxable base
    /// let rate = TaxRate::from_bps(1_300);  // 13% (5% federal + 8% provincial)
    ///
    /// let tax = base.calculate_tax(rate);
    /// assert_eq!(tax.cents(), 2_470); // $24.70
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(tax_cents as i64)
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use arbor_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(10_000); // $100.00
    /// let line_total = unit_price.multiply_quantity(2);
    /// assert_eq!(line_total.cents(), 20_000); // $200.00
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Multiplies money by a quantity, returning `None` on overflow.
    ///
    /// The totals calculator uses this so that absurd inputs surface as a
    /// typed error instead of wrapping silently.
    #[inline]
    pub fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        self.0.checked_mul(qty).map(Money)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs and debugging. Invoice rendering formats amounts
/// currency-aware in the presentation layer.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

/// Multiplication by i64.
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
        let money = Money::from_cents(22_970);
        assert_eq!(money.cents(), 22_970);
        assert_eq!(money.dollars(), 229);
        assert_eq!(money.cents_part(), 70);
    }

    #[test]
    fn test_from_major_minor() {
        let money = Money::from_major_minor(229, 70);
        assert_eq!(money.cents(), 22_970);

        let negative = Money::from_major_minor(-5, 50);
        assert_eq!(negative.cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(22_970)), "$229.70");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        let result: Money = a * 3;
        assert_eq!(result.cents(), 3000);
    }

    #[test]
    fn test_tax_calculation_basic() {
        // $10.00 at 10% = $1.00
        let amount = Money::from_cents(1000);
        let rate = TaxRate::from_bps(1000);
        let tax = amount.calculate_tax(rate);
        assert_eq!(tax.cents(), 100);
    }

    #[test]
    fn test_tax_calculation_rounds_half_up() {
        // $190.00 at 13% = $24.70 exactly
        let base = Money::from_cents(19_000);
        assert_eq!(base.calculate_tax(TaxRate::from_bps(1300)).cents(), 2470);

        // $0.05 at 10% = $0.005 → rounds up to $0.01
        let tiny = Money::from_cents(5);
        assert_eq!(tiny.calculate_tax(TaxRate::from_bps(1000)).cents(), 1);

        // $0.04 at 10% = $0.004 → rounds down to $0.00
        let tinier = Money::from_cents(4);
        assert_eq!(tinier.calculate_tax(TaxRate::from_bps(1000)).cents(), 0);
    }

    #[test]
    fn test_tax_calculation_deterministic() {
        // Same inputs must always produce the same output; invoice
        // regeneration replays historical totals through this path.
        let base = Money::from_cents(12_345);
        let rate = TaxRate::from_bps(1300);
        let first = base.calculate_tax(rate);
        for _ in 0..10 {
            assert_eq!(base.calculate_tax(rate), first);
        }
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::from_cents(100);
        assert!(positive.is_positive());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().cents(), 100);
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_cents(10_000);
        let line_total = unit_price.multiply_quantity(2);
        assert_eq!(line_total.cents(), 20_000);
    }

    #[test]
    fn test_checked_multiply_quantity_overflow() {
        let huge = Money::from_cents(i64::MAX);
        assert!(huge.checked_multiply_quantity(2).is_none());
        assert_eq!(
            huge.checked_multiply_quantity(1).map(|m| m.cents()),
            Some(i64::MAX)
        );
    }
}
