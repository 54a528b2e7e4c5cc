//! # Order Numbering Scheme
//!
//! Channel-tagged order number classification.
//!
//! ## How Channel Tagging Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Order Number = Channel Tag                           │
//! │                                                                         │
//! │  Customer checkout   →  "483920175064"              (no prefix)         │
//! │  Admin walk-in sale  →  "ADMIN-SALE-483920175064"                       │
//! │  Dealer sale         →  "DEALER-SALE-483920175064"                      │
//! │                                                                         │
//! │  There is NO channel column on the orders table. The prefix IS the      │
//! │  channel. "Customer orders" listings therefore pattern-EXCLUDE both     │
//! │  reserved prefixes rather than filtering on a status field.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Classification is pure and lives here; number *generation* needs
//! randomness and lives next to the insert in `arbor-db` (uniqueness is
//! enforced by the storage layer's unique index, with bounded retry).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Reserved prefix for admin-counter (walk-in) sales.
pub const ADMIN_SALE_PREFIX: &str = "ADMIN-SALE-";

/// Reserved prefix for dealer sales.
pub const DEALER_SALE_PREFIX: &str = "DEALER-SALE-";

/// The origin of a sale.
///
/// Encoded as an order-number prefix rather than a column; see the module
/// docs. [`SalesChannel::classify`] recovers the channel from any stored
/// order number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SalesChannel {
    /// Guest or registered customer checkout.
    Customer,
    /// Walk-in sale entered at the admin counter.
    AdminSale,
    /// Sale placed on a dealer's account.
    DealerSale,
}

impl SalesChannel {
    /// The order-number prefix for this channel.
    ///
    /// Customer orders carry no prefix; the plain numeric identifier is
    /// the whole number.
    pub const fn prefix(&self) -> &'static str {
        match self {
            SalesChannel::Customer => "",
            SalesChannel::AdminSale => ADMIN_SALE_PREFIX,
            SalesChannel::DealerSale => DEALER_SALE_PREFIX,
        }
    }

    /// Recovers the channel from an order number.
    ///
    /// ## Example
    /// ```rust
    /// use arbor_core::numbering::SalesChannel;
    ///
    /// assert_eq!(
    ///     SalesChannel::classify("DEALER-SALE-483920175064"),
    ///     SalesChannel::DealerSale
    /// );
    /// assert_eq!(
    ///     SalesChannel::classify("483920175064"),
    ///     SalesChannel::Customer
    /// );
    /// ```
    pub fn classify(order_number: &str) -> SalesChannel {
        if order_number.starts_with(ADMIN_SALE_PREFIX) {
            SalesChannel::AdminSale
        } else if order_number.starts_with(DEALER_SALE_PREFIX) {
            SalesChannel::DealerSale
        } else {
            SalesChannel::Customer
        }
    }
}

/// Whether an order number carries one of the reserved channel prefixes.
///
/// Customer-order listings exclude exactly these.
pub fn is_reserved(order_number: &str) -> bool {
    SalesChannel::classify(order_number) != SalesChannel::Customer
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes() {
        assert_eq!(SalesChannel::Customer.prefix(), "");
        assert_eq!(SalesChannel::AdminSale.prefix(), "ADMIN-SALE-");
        assert_eq!(SalesChannel::DealerSale.prefix(), "DEALER-SALE-");
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            SalesChannel::classify("483920175064"),
            SalesChannel::Customer
        );
        assert_eq!(
            SalesChannel::classify("ADMIN-SALE-483920175064"),
            SalesChannel::AdminSale
        );
        assert_eq!(
            SalesChannel::classify("DEALER-SALE-483920175064"),
            SalesChannel::DealerSale
        );
    }

    #[test]
    fn test_classify_round_trips_through_prefix() {
        for channel in [
            SalesChannel::Customer,
            SalesChannel::AdminSale,
            SalesChannel::DealerSale,
        ] {
            let number = format!("{}000000000001", channel.prefix());
            assert_eq!(SalesChannel::classify(&number), channel);
        }
    }

    #[test]
    fn test_is_reserved() {
        assert!(!is_reserved("483920175064"));
        assert!(is_reserved("ADMIN-SALE-1"));
        assert!(is_reserved("DEALER-SALE-1"));
    }
}
