//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │     ▲                                                           │
//! │       │     └── CoreError via DbError::Domain (rules enforced at       │
//! │       │         the storage boundary: check transitions, totals)       │
//! │       ▼                                                                 │
//! │  Caller (web layer) maps to its own response type                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Retry Semantics
//! `DuplicateNumber` is the ONLY retryable error in this crate: the caller
//! (or `create_order` itself) regenerates the business number and tries
//! again, bounded by `MAX_NUMBER_ATTEMPTS`. Everything else surfaces as-is.

use thiserror::Error;

use arbor_core::CoreError;

/// Database operation errors.
///
/// These errors wrap sqlx errors and provide additional context
/// for debugging and caller feedback.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - Looking up an order/invoice/check by an unknown id or number
    /// - Generating an invoice for a missing order
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A freshly generated business number collided with an existing row.
    ///
    /// ## When This Occurs
    /// - Two concurrent order creations raced on the same generated number
    ///   and this caller lost (the unique index is the arbiter)
    /// - The random generator produced an existing number
    ///
    /// Recoverable: retry with a regenerated number, bounded.
    #[error("Duplicate number: '{number}' already exists")]
    DuplicateNumber { number: String },

    /// Unique constraint violation on a non-number column.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Referencing a non-existent order from an invoice or payment
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// A ledger rule was violated at the storage boundary.
    ///
    /// Carries `EmptyOrder`, `InvalidAmount`, `InvalidTransition` and
    /// validation failures up to the caller unchanged.
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a DuplicateNumber error.
    pub fn duplicate_number(number: impl Into<String>) -> Self {
        DbError::DuplicateNumber {
            number: number.into(),
        }
    }

    /// Whether this error is a unique violation on the given column
    /// (`"orders.order_number"`, `"invoices.invoice_number"`).
    ///
    /// Repositories use this to translate a constraint violation into the
    /// retryable `DuplicateNumber` with the attempted number attached.
    pub fn is_unique_violation_on(&self, column: &str) -> bool {
        matches!(self, DbError::UniqueViolation { field, .. } if field.contains(column))
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite error messages for constraints:
                // UNIQUE constraint: "UNIQUE constraint failed: <table>.<column>"
                // FK constraint: "FOREIGN KEY constraint failed"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
