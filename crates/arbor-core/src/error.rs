//! # Error Types
//!
//! Domain-specific error types for arbor-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  arbor-core errors (this file)                                         │
//! │  ├── CoreError        - Ledger rule violations                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  arbor-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                         (wraps CoreError for rules enforced at the     │
//! │                          storage boundary, e.g. check transitions)     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → caller                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (check status, amounts, etc.)
//! 3. Errors are enum variants, never String
//! 4. Validation errors are raised BEFORE any write happens

use thiserror::Error;

use crate::types::{CheckAction, CheckStatus};

// =============================================================================
// Core Error
// =============================================================================

/// Ledger business rule violations.
///
/// These errors represent money that doesn't reconcile or state machine
/// rules being broken. They are surfaced to the caller as-is; none of them
/// is retryable (duplicate-number collisions live in the db layer, which is
/// the only place they can be detected).
#[derive(Debug, Error)]
pub enum CoreError {
    /// A monetary input is negative or inconsistent.
    ///
    /// ## When This Occurs
    /// - Negative unit price, discount, or shipping
    /// - Non-positive quantity
    /// - Discount exceeding the subtotal
    /// - Arithmetic overflow on absurdly large inputs
    #[error("Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    /// An order was submitted with no line items.
    #[error("Order has no line items")]
    EmptyOrder,

    /// An illegal check status transition was attempted.
    ///
    /// ## When This Occurs
    /// - Clearing a check that was never deposited
    /// - Cancelling a deposited check
    /// - Any action on a terminal check (cleared/bounced/cancelled)
    /// - Losing a race: a concurrent transition already moved the check
    #[error("Check is {from:?}, cannot apply {action:?}")]
    InvalidTransition {
        from: CheckStatus,
        action: CheckAction,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid rate string).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A date pair is out of order (e.g., check due before issue).
    #[error("{field} must not be earlier than {other}")]
    DateOrder { field: String, other: String },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidTransition {
            from: CheckStatus::Cleared,
            action: CheckAction::Deposit,
        };
        assert_eq!(err.to_string(), "Check is Cleared, cannot apply Deposit");

        let err = CoreError::InvalidAmount {
            reason: "discount 500 exceeds subtotal 300".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid amount: discount 500 exceeds subtotal 300"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "check_number".to_string(),
        };
        assert_eq!(err.to_string(), "check_number is required");

        let err = ValidationError::DateOrder {
            field: "due_date".to_string(),
            other: "issue_date".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "due_date must not be earlier than issue_date"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
