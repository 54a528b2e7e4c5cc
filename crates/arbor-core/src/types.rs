//! # Domain Types
//!
//! Core domain types for the Arbor Commerce ledger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Order       │   │    Invoice      │   │     Check       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  order_number   │   │  invoice_number │   │  dealer_id (FK) │       │
//! │  │  status         │   │  order_id (FK)  │   │  status + ver   │       │
//! │  │  total_cents    │   │  billing frozen │   │  amount_cents   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │   OrderStatus   │   │   CheckStatus   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  Pending        │   │  Pending        │       │
//! │  │  800 = 8%       │   │  Completed      │   │  Deposited      │       │
//! │  └─────────────────┘   │  Cancelled      │   │  Cleared/...    │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID: (order_number, invoice_number, check_number) -
//!   human-readable, what customers and accountants see

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::numbering::SalesChannel;
use crate::{DEFAULT_FEDERAL_TAX_BPS, DEFAULT_PROVINCIAL_TAX_BPS};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 800 bps = 8% (e.g., the provincial default)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Parses a tax rate from a decimal percent string (`"5"`, `"8.25"`).
    ///
    /// This is how rates arrive from the settings store. Returns `None`
    /// for anything that is not a finite percentage in 0..=100; the caller
    /// falls back to the jurisdiction default.
    pub fn from_percent_str(s: &str) -> Option<Self> {
        let pct: f64 = s.trim().parse().ok()?;
        if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
            return None;
        }
        Some(TaxRate::from_percentage(pct))
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

/// The pair of jurisdiction rates applied to every taxable order.
///
/// Both components are stored in the settings table as decimal percent
/// strings; when a key is absent or unparsable the defaults apply
/// (5% federal, 8% provincial).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRates {
    pub federal: TaxRate,
    pub provincial: TaxRate,
}

impl TaxRates {
    /// Creates a rate pair from basis points.
    pub const fn from_bps(federal: u32, provincial: u32) -> Self {
        TaxRates {
            federal: TaxRate::from_bps(federal),
            provincial: TaxRate::from_bps(provincial),
        }
    }

    /// The combined rate applied to the taxable base.
    ///
    /// Both taxes apply to the same base (no tax-on-tax), so a single
    /// combined rate keeps rounding to one step.
    pub fn combined(&self) -> TaxRate {
        TaxRate::from_bps(self.federal.bps().saturating_add(self.provincial.bps()))
    }
}

impl Default for TaxRates {
    fn default() -> Self {
        TaxRates::from_bps(DEFAULT_FEDERAL_TAX_BPS, DEFAULT_PROVINCIAL_TAX_BPS)
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// The status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order has been placed and persisted.
    Pending,
    /// Order has been fulfilled/settled.
    Completed,
    /// Order was cancelled by an admin.
    Cancelled,
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

// =============================================================================
// Order
// =============================================================================

/// One purchase transaction.
///
/// The monetary invariant `total == subtotal - discount + tax + shipping`
/// is established by the totals calculator at creation time and never
/// recomputed from live product data afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Order {
    pub id: String,
    /// Channel-tagged business identifier (see [`crate::numbering`]).
    pub order_number: String,
    pub status: OrderStatus,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub tax_cents: i64,
    pub shipping_cents: i64,
    pub total_cents: i64,
    pub currency: String,
    /// Registered customer, when the sale came through checkout.
    pub user_id: Option<String>,
    /// Dealer, when the sale came through the dealer channel.
    pub dealer_id: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Returns the order total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Returns the sales channel, recovered from the order number prefix.
    #[inline]
    pub fn channel(&self) -> SalesChannel {
        SalesChannel::classify(&self.order_number)
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// A product line within an order.
/// Uses the snapshot pattern to freeze product data at order time:
/// later product price changes must never retroactively alter a placed
/// order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    /// SKU at order time (frozen).
    pub sku_snapshot: Option<String>,
    /// Product name at order time (frozen).
    pub name_snapshot: Option<String>,
    /// Unit price in cents at order time (frozen).
    pub unit_price_cents: i64,
    pub quantity: i64,
    /// Line total (unit_price × quantity), fixed at creation.
    pub line_total_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl OrderItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

/// An order together with its line items.
///
/// Relation loading is always explicit: repository methods that return this
/// struct join the items in; methods that return [`Order`] alone never do.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

// =============================================================================
// Invoice
// =============================================================================

/// Customer and billing identity fields frozen onto an invoice.
///
/// Supplied by the checkout/admin flow at generation time; deliberately
/// denormalized so the invoice stays correct even if the customer record
/// later changes.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillingSnapshot {
    pub customer_name: String,
    pub customer_phone: String,
    pub billing_address: String,
    pub billing_city: String,
    pub billing_postal_code: String,
    /// Business tax number, for dealer and corporate invoices.
    pub tax_number: Option<String>,
}

/// An immutable financial snapshot of one order at generation time.
///
/// Append-only history: regeneration (e.g. after a billing-address
/// correction) inserts a new row under a new invoice number and never
/// edits an existing one.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Invoice {
    pub id: String,
    pub invoice_number: String,
    pub order_id: String,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub tax_cents: i64,
    pub shipping_cents: i64,
    pub total_cents: i64,
    pub currency: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub billing_address: String,
    pub billing_city: String,
    pub billing_postal_code: String,
    pub tax_number: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Returns the invoiced total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Check Status State Machine
// =============================================================================

/// The status of a postdated check.
///
/// ## State Machine
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │    PENDING ──deposit──► DEPOSITED ──clear──► CLEARED (terminal)         │
/// │       │                     │                                           │
/// │       │                     └──bounce──► BOUNCED (terminal)             │
/// │       ├──bounce─────────────────────────► BOUNCED (terminal)            │
/// │       └──cancel─────────────────────────► CANCELLED (terminal)          │
/// │                                                                         │
/// │  Every other (state, action) pair fails with InvalidTransition.         │
/// │  A check can never clear without first being deposited.                 │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// Received but not yet banked. The only creation state.
    Pending,
    /// Handed to the bank; provisionally counts toward dealer balance.
    Deposited,
    /// Funds confirmed. Terminal.
    Cleared,
    /// Dishonored by the bank. Terminal.
    Bounced,
    /// Withdrawn before deposit. Terminal.
    Cancelled,
}

/// An action applied to a check by the settlement flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CheckAction {
    Deposit,
    Clear,
    Bounce,
    Cancel,
}

impl CheckStatus {
    /// Applies an action to this status, returning the next status.
    ///
    /// The transition table is total: every pair not listed below fails
    /// with [`CoreError::InvalidTransition`], including every action on a
    /// terminal status.
    pub fn apply(self, action: CheckAction) -> CoreResult<CheckStatus> {
        use CheckAction::*;
        use CheckStatus::*;

        match (self, action) {
            (Pending, Deposit) => Ok(Deposited),
            (Deposited, Clear) => Ok(Cleared),
            (Pending, Bounce) | (Deposited, Bounce) => Ok(Bounced),
            (Pending, Cancel) => Ok(Cancelled),
            (from, action) => Err(CoreError::InvalidTransition { from, action }),
        }
    }

    /// Whether no further transition is possible from this status.
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            CheckStatus::Cleared | CheckStatus::Bounced | CheckStatus::Cancelled
        )
    }

    /// Whether a check in this status counts toward the dealer balance.
    ///
    /// Pending checks are not yet bankable; bounced and cancelled checks
    /// never settled. Only deposited and cleared checks are credited.
    pub const fn is_bankable(&self) -> bool {
        matches!(self, CheckStatus::Deposited | CheckStatus::Cleared)
    }
}

impl Default for CheckStatus {
    fn default() -> Self {
        CheckStatus::Pending
    }
}

// =============================================================================
// Check
// =============================================================================

/// A postdated settlement instrument owned by a dealer.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Check {
    pub id: String,
    pub dealer_id: String,
    /// Face amount in cents; always > 0.
    pub amount_cents: i64,
    /// Number printed on the physical check.
    pub check_number: String,
    pub bank_name: String,
    #[ts(as = "String")]
    pub issue_date: NaiveDate,
    /// Must be on or after `issue_date` (postdated instrument).
    #[ts(as = "String")]
    pub due_date: NaiveDate,
    pub status: CheckStatus,
    pub notes: Option<String>,
    /// Optimistic-lock counter; bumped on every status transition.
    pub version: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Check {
    /// Returns the face amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Payment
// =============================================================================

/// A cash (or equivalent) settlement event against a dealer's balance.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Payment {
    pub id: String,
    pub dealer_id: String,
    /// The dealer-sale order this payment settles, when known.
    pub order_id: Option<String>,
    pub amount_cents: i64,
    #[ts(as = "String")]
    pub paid_on: NaiveDate,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Returns the payment amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
