//! # Validation Module
//!
//! Input validation for the ledger's write operations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Web layer (external)                                         │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (before any write)                               │
//! │  ├── Ledger rule validation                                            │
//! │  └── Failing here creates NO partial state                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK constraints (amounts, quantities)                           │
//! │  ├── UNIQUE constraints (order/invoice numbers)                        │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::{MAX_ITEM_QUANTITY, MAX_ORDER_ITEMS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items, promotional lines)
///
/// ## Example
/// ```rust
/// use arbor_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(10_000).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a settlement amount (payment or check face value) in cents.
///
/// ## Rules
/// - Must be strictly positive; a zero-value instrument settles nothing
pub fn validate_settlement_amount(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates the number of line items in an order.
///
/// Emptiness is handled separately (`CoreError::EmptyOrder`); this guards
/// the upper bound only.
pub fn validate_order_size(item_count: usize) -> ValidationResult<()> {
    if item_count > MAX_ORDER_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "order items".to_string(),
            min: 1,
            max: MAX_ORDER_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Check Validators
// =============================================================================

/// Validates a check's date pair.
///
/// ## Rules
/// - The due date must be on or after the issue date (a postdated
///   instrument may be due the same day, never earlier)
pub fn validate_check_dates(issue_date: NaiveDate, due_date: NaiveDate) -> ValidationResult<()> {
    if due_date < issue_date {
        return Err(ValidationError::DateOrder {
            field: "due_date".to_string(),
            other: "issue_date".to_string(),
        });
    }

    Ok(())
}

/// Validates the number printed on a physical check.
///
/// ## Rules
/// - Must not be empty
/// - Maximum 50 characters
pub fn validate_check_number(check_number: &str) -> ValidationResult<()> {
    let check_number = check_number.trim();

    if check_number.is_empty() {
        return Err(ValidationError::Required {
            field: "check_number".to_string(),
        });
    }

    if check_number.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "check_number".to_string(),
            max: 50,
        });
    }

    Ok(())
}

/// Validates a bank name.
pub fn validate_bank_name(bank_name: &str) -> ValidationResult<()> {
    let bank_name = bank_name.trim();

    if bank_name.is_empty() {
        return Err(ValidationError::Required {
            field: "bank_name".to_string(),
        });
    }

    if bank_name.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "bank_name".to_string(),
            max: 100,
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// Used for the external references the ledger stores but does not own
/// (product, user, dealer ids).
///
/// ## Example
/// ```rust
/// use arbor_core::validation::validate_uuid;
///
/// assert!(validate_uuid("dealer_id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("dealer_id", "not-a-uuid").is_err());
/// ```
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(10_000).is_ok());
        assert!(validate_price_cents(-100).is_err());
    }

    #[test]
    fn test_validate_settlement_amount() {
        assert!(validate_settlement_amount(1).is_ok());
        assert!(validate_settlement_amount(22_970).is_ok());

        assert!(validate_settlement_amount(0).is_err());
        assert!(validate_settlement_amount(-500).is_err());
    }

    #[test]
    fn test_validate_order_size() {
        assert!(validate_order_size(1).is_ok());
        assert!(validate_order_size(100).is_ok());
        assert!(validate_order_size(101).is_err());
    }

    #[test]
    fn test_validate_check_dates() {
        let issue = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let due = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();

        assert!(validate_check_dates(issue, due).is_ok());
        assert!(validate_check_dates(issue, issue).is_ok()); // same day is fine
        assert!(validate_check_dates(due, issue).is_err());
    }

    #[test]
    fn test_validate_check_number() {
        assert!(validate_check_number("000412").is_ok());
        assert!(validate_check_number("").is_err());
        assert!(validate_check_number("   ").is_err());
        assert!(validate_check_number(&"9".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_bank_name() {
        assert!(validate_bank_name("Banque Nationale").is_ok());
        assert!(validate_bank_name("").is_err());
        assert!(validate_bank_name(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("dealer_id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("dealer_id", "").is_err());
        assert!(validate_uuid("dealer_id", "not-a-uuid").is_err());
    }
}
