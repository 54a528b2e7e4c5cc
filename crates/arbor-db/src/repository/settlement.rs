//! # Dealer Settlement Repository
//!
//! Payments and postdated checks against a dealer's running balance.
//!
//! ## Check Lifecycle & Balance
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Dealer Settlement Ledger                           │
//! │                                                                         │
//! │  Dealer-sale order placed            balance -= order total             │
//! │       │                                                                 │
//! │       ├── record_payment(cash)       balance += payment amount          │
//! │       │                                                                 │
//! │       └── create_check(PENDING)      balance unchanged (not bankable)   │
//! │               │                                                         │
//! │               ├── deposit_check      balance += check amount            │
//! │               │      │                                                  │
//! │               │      ├── clear_check balance unchanged (stays counted)  │
//! │               │      └── bounce_check balance -= check amount (again)   │
//! │               │                                                         │
//! │               ├── bounce_check       balance unchanged                  │
//! │               └── cancel_check       balance unchanged                  │
//! │                                                                         │
//! │  The balance is NEVER stored. Every read re-derives it from the         │
//! │  payments/checks/orders rows, so no update path can leave it stale.     │
//! │                                                                         │
//! │  Status transitions use an optimistic version check: two concurrent     │
//! │  transitions on one check cannot both succeed - the loser's             │
//! │  precondition is stale and it fails with InvalidTransition.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use arbor_core::numbering::DEALER_SALE_PREFIX;
use arbor_core::{validation, Check, CheckAction, CheckStatus, CoreError, Money, Payment};

// =============================================================================
// Input DTOs
// =============================================================================

/// A new postdated check handed over by a dealer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCheck {
    pub dealer_id: String,
    pub amount_cents: i64,
    pub check_number: String,
    pub bank_name: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub notes: Option<String>,
}

/// A new cash settlement event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPayment {
    pub dealer_id: String,
    /// The dealer-sale order this payment settles, when known.
    pub order_id: Option<String>,
    pub amount_cents: i64,
    pub paid_on: NaiveDate,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for dealer settlement operations.
#[derive(Debug, Clone)]
pub struct SettlementRepository {
    pool: SqlitePool,
}

const CHECK_COLUMNS: &str = "id, dealer_id, amount_cents, check_number, bank_name, \
     issue_date, due_date, status, notes, version, created_at, updated_at";

const PAYMENT_COLUMNS: &str = "id, dealer_id, order_id, amount_cents, paid_on, created_at";

impl SettlementRepository {
    /// Creates a new SettlementRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SettlementRepository { pool }
    }

    // -------------------------------------------------------------------------
    // Checks
    // -------------------------------------------------------------------------

    /// Records a new check in `Pending` status.
    ///
    /// ## Validation (before any write)
    /// - amount strictly positive
    /// - due date on or after issue date
    /// - check number and bank name present
    pub async fn create_check(&self, new_check: &NewCheck) -> DbResult<Check> {
        validation::validate_uuid("dealer_id", &new_check.dealer_id).map_err(CoreError::from)?;
        validation::validate_settlement_amount(new_check.amount_cents)
            .map_err(CoreError::from)?;
        validation::validate_check_dates(new_check.issue_date, new_check.due_date)
            .map_err(CoreError::from)?;
        validation::validate_check_number(&new_check.check_number).map_err(CoreError::from)?;
        validation::validate_bank_name(&new_check.bank_name).map_err(CoreError::from)?;

        let now = Utc::now();
        let check = Check {
            id: Uuid::new_v4().to_string(),
            dealer_id: new_check.dealer_id.clone(),
            amount_cents: new_check.amount_cents,
            check_number: new_check.check_number.trim().to_string(),
            bank_name: new_check.bank_name.trim().to_string(),
            issue_date: new_check.issue_date,
            due_date: new_check.due_date,
            status: CheckStatus::Pending,
            notes: new_check.notes.clone(),
            version: 0,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %check.id, dealer_id = %check.dealer_id,
               amount = %check.amount(), "Recording check");

        sqlx::query(
            r#"
            INSERT INTO checks (
                id, dealer_id, amount_cents, check_number, bank_name,
                issue_date, due_date, status, notes, version,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&check.id)
        .bind(&check.dealer_id)
        .bind(check.amount_cents)
        .bind(&check.check_number)
        .bind(&check.bank_name)
        .bind(check.issue_date)
        .bind(check.due_date)
        .bind(check.status)
        .bind(&check.notes)
        .bind(check.version)
        .bind(check.created_at)
        .bind(check.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(check)
    }

    /// Gets a check by ID.
    pub async fn get_check(&self, id: &str) -> DbResult<Check> {
        sqlx::query_as::<_, Check>(&format!("SELECT {CHECK_COLUMNS} FROM checks WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Check", id))
    }

    /// Marks a pending check as deposited with the bank.
    pub async fn deposit_check(&self, id: &str) -> DbResult<Check> {
        self.apply_check_action(id, CheckAction::Deposit).await
    }

    /// Marks a deposited check as cleared (funds confirmed).
    ///
    /// A check can never clear without first being deposited.
    pub async fn clear_check(&self, id: &str) -> DbResult<Check> {
        self.apply_check_action(id, CheckAction::Clear).await
    }

    /// Marks a pending or deposited check as bounced (dishonored).
    ///
    /// A deposited check's amount was provisionally counted toward the
    /// dealer balance; because the balance is derived, the debit-back is
    /// automatic the moment the status row changes.
    pub async fn bounce_check(&self, id: &str) -> DbResult<Check> {
        self.apply_check_action(id, CheckAction::Bounce).await
    }

    /// Cancels a pending check (withdrawn before deposit).
    pub async fn cancel_check(&self, id: &str) -> DbResult<Check> {
        self.apply_check_action(id, CheckAction::Cancel).await
    }

    /// Applies one state-machine action under an optimistic version check.
    ///
    /// ## Race Behavior
    /// The UPDATE is conditioned on the version read alongside the status.
    /// If a concurrent transition committed in between, zero rows match:
    /// this caller's precondition state is stale, and it fails with
    /// `InvalidTransition` (reporting the check's CURRENT status) rather
    /// than silently overwriting.
    async fn apply_check_action(&self, id: &str, action: CheckAction) -> DbResult<Check> {
        let check = self.get_check(id).await?;
        let next = check.status.apply(action).map_err(DbError::Domain)?;
        let now = Utc::now();

        debug!(id = %check.id, from = ?check.status, to = ?next, "Check transition");

        let result = sqlx::query(
            r#"
            UPDATE checks SET
                status = ?,
                version = version + 1,
                updated_at = ?
            WHERE id = ? AND version = ?
            "#,
        )
        .bind(next)
        .bind(now)
        .bind(&check.id)
        .bind(check.version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Lost a race: report the transition against what is actually
            // in the row now.
            let current = self.get_check(id).await?;
            return Err(DbError::Domain(CoreError::InvalidTransition {
                from: current.status,
                action,
            }));
        }

        Ok(Check {
            status: next,
            version: check.version + 1,
            updated_at: now,
            ..check
        })
    }

    /// Lists a dealer's checks, newest first, optionally by status.
    pub async fn list_checks(
        &self,
        dealer_id: &str,
        status: Option<CheckStatus>,
    ) -> DbResult<Vec<Check>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {CHECK_COLUMNS} FROM checks WHERE dealer_id = "
        ));
        qb.push_bind(dealer_id);

        if let Some(status) = status {
            qb.push(" AND status = ").push_bind(status);
        }

        qb.push(" ORDER BY created_at DESC, id");

        let checks = qb.build_query_as::<Check>().fetch_all(&self.pool).await?;
        Ok(checks)
    }

    /// Deletes all of a dealer's settlement instruments.
    ///
    /// Called by the (external) dealer CRUD when a dealer is removed; this
    /// is the only way checks and payments are ever destroyed.
    pub async fn delete_dealer_instruments(&self, dealer_id: &str) -> DbResult<u64> {
        let mut tx = self.pool.begin().await?;

        let checks = sqlx::query("DELETE FROM checks WHERE dealer_id = ?")
            .bind(dealer_id)
            .execute(&mut *tx)
            .await?;
        let payments = sqlx::query("DELETE FROM payments WHERE dealer_id = ?")
            .bind(dealer_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let removed = checks.rows_affected() + payments.rows_affected();
        debug!(dealer_id = %dealer_id, removed, "Removed dealer settlement instruments");
        Ok(removed)
    }

    // -------------------------------------------------------------------------
    // Payments
    // -------------------------------------------------------------------------

    /// Records a cash settlement event for a dealer.
    pub async fn record_payment(&self, new_payment: &NewPayment) -> DbResult<Payment> {
        validation::validate_uuid("dealer_id", &new_payment.dealer_id)
            .map_err(CoreError::from)?;
        validation::validate_settlement_amount(new_payment.amount_cents)
            .map_err(CoreError::from)?;

        let payment = Payment {
            id: Uuid::new_v4().to_string(),
            dealer_id: new_payment.dealer_id.clone(),
            order_id: new_payment.order_id.clone(),
            amount_cents: new_payment.amount_cents,
            paid_on: new_payment.paid_on,
            created_at: Utc::now(),
        };

        debug!(id = %payment.id, dealer_id = %payment.dealer_id,
               amount = %payment.amount(), "Recording payment");

        sqlx::query(
            r#"
            INSERT INTO payments (id, dealer_id, order_id, amount_cents, paid_on, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&payment.id)
        .bind(&payment.dealer_id)
        .bind(&payment.order_id)
        .bind(payment.amount_cents)
        .bind(payment.paid_on)
        .bind(payment.created_at)
        .execute(&self.pool)
        .await?;

        Ok(payment)
    }

    /// Lists a dealer's payments, newest first.
    pub async fn list_payments(&self, dealer_id: &str) -> DbResult<Vec<Payment>> {
        let payments = sqlx::query_as::<_, Payment>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE dealer_id = ? ORDER BY created_at DESC, id"
        ))
        .bind(dealer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    // -------------------------------------------------------------------------
    // Balance
    // -------------------------------------------------------------------------

    /// Computes the dealer's running balance.
    ///
    /// ```text
    /// balance = Σ payments
    ///         + Σ checks in {deposited, cleared}
    ///         - Σ non-cancelled dealer-sale order totals
    /// ```
    ///
    /// Pending checks are not yet bankable; bounced/cancelled checks never
    /// settled. The value is re-derived from source rows on every call -
    /// there is no stored balance column to drift.
    pub async fn dealer_balance(&self, dealer_id: &str) -> DbResult<Money> {
        let cents: i64 = sqlx::query_scalar(
            r#"
            SELECT
                COALESCE((SELECT SUM(amount_cents) FROM payments
                          WHERE dealer_id = ?1), 0)
              + COALESCE((SELECT SUM(amount_cents) FROM checks
                          WHERE dealer_id = ?1
                            AND status IN ('deposited', 'cleared')), 0)
              - COALESCE((SELECT SUM(total_cents) FROM orders
                          WHERE dealer_id = ?1
                            AND order_number LIKE ?2
                            AND status != 'cancelled'), 0)
            "#,
        )
        .bind(dealer_id)
        .bind(format!("{DEALER_SALE_PREFIX}%"))
        .fetch_one(&self.pool)
        .await?;

        Ok(Money::from_cents(cents))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
