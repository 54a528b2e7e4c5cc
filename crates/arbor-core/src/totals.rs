//! # Order Totals Calculator
//!
//! The pure function that turns priced line items into the money an order
//! carries for the rest of its life.
//!
//! ## Calculation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      compute_order_totals                               │
//! │                                                                         │
//! │  lines [{unit_price, quantity}, ...]                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  subtotal = Σ unit_price × quantity        (exact, no rounding)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  taxable base = subtotal − discount        (shipping NOT included)      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  tax = base × (federal + provincial)       (half-up, the ONE rounding)  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  total = subtotal − discount + tax + shipping                           │
//! │                                                                         │
//! │  Deterministic: invoice regeneration replays historical totals by       │
//! │  supplying the historical rates.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::TaxRates;

// =============================================================================
// Input / Output Types
// =============================================================================

/// One priced line, as supplied by the checkout or admin-sale flow.
///
/// The unit price is already a snapshot: whoever builds these lines has
/// resolved "what items at what price" before the ledger is invoked.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineAmount {
    pub unit_price: Money,
    pub quantity: i64,
}

/// The computed money breakdown for one order.
///
/// Invariant: `total == subtotal - discount + tax + shipping` and
/// `total >= 0`, guaranteed by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderTotals {
    pub subtotal: Money,
    pub discount: Money,
    pub tax: Money,
    pub shipping: Money,
    pub total: Money,
}

// =============================================================================
// Calculator
// =============================================================================

/// Computes subtotal/tax/total for a set of priced lines.
///
/// ## Arguments
/// * `lines` - ordered `{unit_price, quantity}` pairs
/// * `discount` - absolute discount amount, applied before tax
/// * `shipping` - shipping amount, added after tax (never taxed)
/// * `rates` - jurisdiction tax rates; both apply to the same base
///
/// ## Errors
/// `InvalidAmount` when any unit price, the discount, or the shipping is
/// negative, any quantity is not positive, the discount exceeds the
/// subtotal, or the subtotal overflows.
///
/// ## Example
/// ```rust
/// use arbor_core::money::Money;
/// use arbor_core::totals::{compute_order_totals, LineAmount};
/// use arbor_core::types::TaxRates;
///
/// let lines = [LineAmount {
///     unit_price: Money::from_cents(10_000),
///     quantity: 2,
/// }];
/// let totals = compute_order_totals(
///     &lines,
///     Money::from_cents(1_000),
///     Money::from_cents(1_500),
///     TaxRates::default(),
/// )
/// .unwrap();
///
/// assert_eq!(totals.subtotal.cents(), 20_000); // $200.00
/// assert_eq!(totals.tax.cents(), 2_470);       // 13% of $190.00
/// assert_eq!(totals.total.cents(), 22_970);    // $229.70
/// ```
pub fn compute_order_totals(
    lines: &[LineAmount],
    discount: Money,
    shipping: Money,
    rates: TaxRates,
) -> CoreResult<OrderTotals> {
    if discount.is_negative() {
        return Err(CoreError::InvalidAmount {
            reason: format!("discount {} is negative", discount),
        });
    }
    if shipping.is_negative() {
        return Err(CoreError::InvalidAmount {
            reason: format!("shipping {} is negative", shipping),
        });
    }

    let mut subtotal = Money::zero();
    for (index, line) in lines.iter().enumerate() {
        if line.unit_price.is_negative() {
            return Err(CoreError::InvalidAmount {
                reason: format!("line {} has negative unit price {}", index, line.unit_price),
            });
        }
        if line.quantity <= 0 {
            return Err(CoreError::InvalidAmount {
                reason: format!("line {} has non-positive quantity {}", index, line.quantity),
            });
        }

        let line_total = line
            .unit_price
            .checked_multiply_quantity(line.quantity)
            .and_then(|t| subtotal.cents().checked_add(t.cents()))
            .ok_or_else(|| CoreError::InvalidAmount {
                reason: format!("line {} overflows the order subtotal", index),
            })?;
        subtotal = Money::from_cents(line_total);
    }

    if discount > subtotal {
        return Err(CoreError::InvalidAmount {
            reason: format!("discount {} exceeds subtotal {}", discount, subtotal),
        });
    }

    // Shipping is excluded from the taxable base.
    let taxable_base = subtotal - discount;
    let tax = taxable_base.calculate_tax(rates.combined());
    let total = subtotal - discount + tax + shipping;

    Ok(OrderTotals {
        subtotal,
        discount,
        tax,
        shipping,
        total,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(cents: i64, qty: i64) -> LineAmount {
        LineAmount {
            unit_price: Money::from_cents(cents),
            quantity: qty,
        }
    }

    /// The reference scenario: 2 × $100.00, $10.00 off, $15.00 shipping,
    /// 5% + 8% tax → $229.70.
    #[test]
    fn test_reference_scenario() {
        let totals = compute_order_totals(
            &[line(10_000, 2)],
            Money::from_cents(1_000),
            Money::from_cents(1_500),
            TaxRates::default(),
        )
        .unwrap();

        assert_eq!(totals.subtotal.cents(), 20_000);
        assert_eq!(totals.discount.cents(), 1_000);
        assert_eq!(totals.tax.cents(), 2_470); // 13% of $190.00
        assert_eq!(totals.shipping.cents(), 1_500);
        assert_eq!(totals.total.cents(), 22_970);
    }

    #[test]
    fn test_subtotal_is_exact_sum_of_lines() {
        let lines = [line(299, 3), line(1_099, 1), line(50, 7)];
        let totals = compute_order_totals(
            &lines,
            Money::zero(),
            Money::zero(),
            TaxRates::from_bps(0, 0),
        )
        .unwrap();

        assert_eq!(totals.subtotal.cents(), 299 * 3 + 1_099 + 50 * 7);
        assert_eq!(totals.total, totals.subtotal);
    }

    /// total == subtotal - discount + tax + shipping, always.
    #[test]
    fn test_total_identity_holds() {
        let cases = [
            (vec![line(10_000, 2)], 1_000, 1_500),
            (vec![line(1, 1)], 0, 0),
            (vec![line(333, 3), line(5_000, 1)], 999, 700),
            (vec![line(0, 5)], 0, 250),
        ];

        for (lines, discount, shipping) in cases {
            let totals = compute_order_totals(
                &lines,
                Money::from_cents(discount),
                Money::from_cents(shipping),
                TaxRates::default(),
            )
            .unwrap();

            assert_eq!(
                totals.total,
                totals.subtotal - totals.discount + totals.tax + totals.shipping
            );
            assert!(!totals.total.is_negative());
        }
    }

    #[test]
    fn test_shipping_is_not_taxed() {
        let with_shipping = compute_order_totals(
            &[line(10_000, 1)],
            Money::zero(),
            Money::from_cents(99_999),
            TaxRates::default(),
        )
        .unwrap();
        let without_shipping = compute_order_totals(
            &[line(10_000, 1)],
            Money::zero(),
            Money::zero(),
            TaxRates::default(),
        )
        .unwrap();

        // Shipping changes the total but never the tax.
        assert_eq!(with_shipping.tax, without_shipping.tax);
        assert_eq!(
            with_shipping.total - without_shipping.total,
            Money::from_cents(99_999)
        );
    }

    #[test]
    fn test_discount_reduces_taxable_base() {
        let discounted = compute_order_totals(
            &[line(10_000, 2)],
            Money::from_cents(10_000),
            Money::zero(),
            TaxRates::default(),
        )
        .unwrap();

        // 13% of $100.00, not of $200.00
        assert_eq!(discounted.tax.cents(), 1_300);
    }

    #[test]
    fn test_rejects_negative_inputs() {
        assert!(compute_order_totals(
            &[line(-1, 1)],
            Money::zero(),
            Money::zero(),
            TaxRates::default()
        )
        .is_err());
        assert!(compute_order_totals(
            &[line(100, 1)],
            Money::from_cents(-1),
            Money::zero(),
            TaxRates::default()
        )
        .is_err());
        assert!(compute_order_totals(
            &[line(100, 1)],
            Money::zero(),
            Money::from_cents(-1),
            TaxRates::default()
        )
        .is_err());
        assert!(compute_order_totals(
            &[line(100, 0)],
            Money::zero(),
            Money::zero(),
            TaxRates::default()
        )
        .is_err());
    }

    #[test]
    fn test_rejects_discount_exceeding_subtotal() {
        let err = compute_order_totals(
            &[line(100, 1)],
            Money::from_cents(101),
            Money::zero(),
            TaxRates::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidAmount { .. }));
    }

    #[test]
    fn test_rejects_overflow() {
        let err = compute_order_totals(
            &[line(i64::MAX, 2)],
            Money::zero(),
            Money::zero(),
            TaxRates::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidAmount { .. }));
    }

    #[test]
    fn test_deterministic() {
        let lines = [line(7_777, 3), line(123, 9)];
        let first = compute_order_totals(
            &lines,
            Money::from_cents(500),
            Money::from_cents(850),
            TaxRates::from_bps(500, 825),
        )
        .unwrap();

        for _ in 0..10 {
            let again = compute_order_totals(
                &lines,
                Money::from_cents(500),
                Money::from_cents(850),
                TaxRates::from_bps(500, 825),
            )
            .unwrap();
            assert_eq!(again, first);
        }
    }
}
