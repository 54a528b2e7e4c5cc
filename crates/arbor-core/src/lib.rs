//! # arbor-core: Pure Ledger Logic for Arbor Commerce
//!
//! This crate is the **heart** of the Arbor Commerce sales & invoicing
//! ledger. It contains all business logic as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Arbor Commerce Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Storefront / Admin web layer (external)            │   │
//! │  │    Checkout ──► Admin sale ──► Dealer settlement ──► Reports   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ arbor-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  totals   │  │ numbering │  │   │
//! │  │   │   Order   │  │   Money   │  │  TaxCalc  │  │  Channel  │  │   │
//! │  │   │   Check   │  │  TaxRate  │  │  rounding │  │  prefixes │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    arbor-db (Database Layer)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Order, Invoice, Check, Payment, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`totals`] - Order totals calculator (subtotal/discount/tax/shipping)
//! - [`numbering`] - Channel-tagged order number scheme
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use arbor_core::money::Money;
//! use arbor_core::totals::{compute_order_totals, LineAmount};
//! use arbor_core::types::TaxRates;
//!
//! let lines = [LineAmount {
//!     unit_price: Money::from_cents(10_000), // $100.00
//!     quantity: 2,
//! }];
//!
//! let totals = compute_order_totals(
//!     &lines,
//!     Money::from_cents(1_000),  // $10.00 discount
//!     Money::from_cents(1_500),  // $15.00 shipping
//!     TaxRates::default(),       // 5% federal + 8% provincial
//! )
//! .unwrap();
//!
//! // 200.00 - 10.00 + 24.70 + 15.00
//! assert_eq!(totals.total.cents(), 22_970);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod numbering;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use arbor_core::Money` instead of
// `use arbor_core::money::Money`

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use numbering::SalesChannel;
pub use totals::{compute_order_totals, LineAmount, OrderTotals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default currency code for new orders and invoices.
///
/// ## Why a constant?
/// The platform currently sells in one currency; the schema carries a
/// currency column per order/invoice so multi-currency can be added without
/// a migration.
pub const DEFAULT_CURRENCY: &str = "CAD";

/// Maximum line items allowed in a single order.
///
/// ## Business Reason
/// Prevents runaway carts and ensures reasonable transaction sizes.
pub const MAX_ORDER_ITEMS: usize = 100;

/// Maximum quantity of a single line item.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// How many freshly generated numbers an insert may try before surfacing
/// a duplicate-number error to the caller.
///
/// The UNIQUE index on the number column is the arbiter between concurrent
/// creations; the losing side regenerates and retries up to this bound.
pub const MAX_NUMBER_ATTEMPTS: u32 = 3;

/// Settings key for the federal tax rate (decimal percent string).
pub const SETTING_FEDERAL_TAX_RATE: &str = "federal_tax_rate";

/// Settings key for the provincial tax rate (decimal percent string).
pub const SETTING_PROVINCIAL_TAX_RATE: &str = "provincial_tax_rate";

/// Default federal tax rate when the setting is absent: 5% = 500 bps.
pub const DEFAULT_FEDERAL_TAX_BPS: u32 = 500;

/// Default provincial tax rate when the setting is absent: 8% = 800 bps.
pub const DEFAULT_PROVINCIAL_TAX_BPS: u32 = 800;
