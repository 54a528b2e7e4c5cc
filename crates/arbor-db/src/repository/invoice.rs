//! # Invoice Repository
//!
//! Append-only invoice snapshots of orders.
//!
//! ## Snapshot Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        generate(order_id)                               │
//! │                                                                         │
//! │  Order (live row)                    Invoice (frozen row)               │
//! │  ───────────────                     ────────────────────               │
//! │  subtotal/tax/total  ── copied ───►  subtotal/tax/total                 │
//! │  currency            ── copied ───►  currency                           │
//! │                                                                         │
//! │  BillingSnapshot (from caller)                                          │
//! │  name/phone/address  ── frozen ───►  customer + billing fields          │
//! │                                                                         │
//! │  Later edits to the customer record change NOTHING here.                │
//! │  Regeneration inserts a NEW row under a NEW number; invoices are        │
//! │  history, never edited in place.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use arbor_core::{BillingSnapshot, Invoice, Order, MAX_NUMBER_ATTEMPTS};

/// Repository for invoice database operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

const INVOICE_COLUMNS: &str = "id, invoice_number, order_id, subtotal_cents, discount_cents, \
     tax_cents, shipping_cents, total_cents, currency, customer_name, customer_phone, \
     billing_address, billing_city, billing_postal_code, tax_number, created_at, updated_at";

impl InvoiceRepository {
    /// Creates a new InvoiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    /// Generates an invoice for an order.
    ///
    /// Copies the order's current totals and the supplied billing identity
    /// into a new immutable row under a fresh invoice number. Fails with
    /// `NotFound` when the order does not exist. Calling this twice on an
    /// unchanged order yields two invoices with identical totals and
    /// distinct numbers.
    pub async fn generate(&self, order_id: &str, billing: &BillingSnapshot) -> DbResult<Invoice> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, order_number, status, subtotal_cents, discount_cents,
                   tax_cents, shipping_cents, total_cents, currency, user_id, dealer_id,
                   created_at, updated_at
            FROM orders
            WHERE id = ?
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Order", order_id))?;

        let mut last_err = DbError::Internal("invoice number generation exhausted".to_string());
        for attempt in 1..=MAX_NUMBER_ATTEMPTS {
            let invoice_number = generate_invoice_number();
            match self.insert_invoice(&order, &invoice_number, billing).await {
                Ok(invoice) => return Ok(invoice),
                Err(err @ DbError::DuplicateNumber { .. }) => {
                    debug!(attempt, %invoice_number, "Invoice number collision, regenerating");
                    last_err = err;
                }
                Err(other) => return Err(other),
            }
        }

        Err(last_err)
    }

    /// Inserts the snapshot row (single attempt).
    async fn insert_invoice(
        &self,
        order: &Order,
        invoice_number: &str,
        billing: &BillingSnapshot,
    ) -> DbResult<Invoice> {
        let now = Utc::now();
        let invoice = Invoice {
            id: Uuid::new_v4().to_string(),
            invoice_number: invoice_number.to_string(),
            order_id: order.id.clone(),
            subtotal_cents: order.subtotal_cents,
            discount_cents: order.discount_cents,
            tax_cents: order.tax_cents,
            shipping_cents: order.shipping_cents,
            total_cents: order.total_cents,
            currency: order.currency.clone(),
            customer_name: billing.customer_name.clone(),
            customer_phone: billing.customer_phone.clone(),
            billing_address: billing.billing_address.clone(),
            billing_city: billing.billing_city.clone(),
            billing_postal_code: billing.billing_postal_code.clone(),
            tax_number: billing.tax_number.clone(),
            created_at: now,
            updated_at: now,
        };

        debug!(id = %invoice.id, invoice_number = %invoice.invoice_number,
               order_id = %invoice.order_id, "Inserting invoice");

        let inserted = sqlx::query(
            r#"
            INSERT INTO invoices (
                id, invoice_number, order_id,
                subtotal_cents, discount_cents, tax_cents, shipping_cents, total_cents,
                currency,
                customer_name, customer_phone, billing_address, billing_city,
                billing_postal_code, tax_number,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&invoice.id)
        .bind(&invoice.invoice_number)
        .bind(&invoice.order_id)
        .bind(invoice.subtotal_cents)
        .bind(invoice.discount_cents)
        .bind(invoice.tax_cents)
        .bind(invoice.shipping_cents)
        .bind(invoice.total_cents)
        .bind(&invoice.currency)
        .bind(&invoice.customer_name)
        .bind(&invoice.customer_phone)
        .bind(&invoice.billing_address)
        .bind(&invoice.billing_city)
        .bind(&invoice.billing_postal_code)
        .bind(&invoice.tax_number)
        .bind(invoice.created_at)
        .bind(invoice.updated_at)
        .execute(&self.pool)
        .await;

        if let Err(err) = inserted {
            let db_err = DbError::from(err);
            if db_err.is_unique_violation_on("invoices.invoice_number") {
                return Err(DbError::duplicate_number(invoice_number));
            }
            return Err(db_err);
        }

        Ok(invoice)
    }

    /// Gets an invoice by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Invoice> {
        sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Invoice", id))
    }

    /// Gets an invoice by its business number.
    pub async fn get_by_number(&self, invoice_number: &str) -> DbResult<Invoice> {
        sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE invoice_number = ?"
        ))
        .bind(invoice_number)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Invoice", invoice_number))
    }

    /// Lists all invoices generated for an order, newest first.
    ///
    /// Usually zero or one; more after regenerations, all preserved.
    pub async fn list_for_order(&self, order_id: &str) -> DbResult<Vec<Invoice>> {
        let invoices = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE order_id = ? ORDER BY created_at DESC, id"
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(invoices)
    }

    /// Lists recent invoices for admin reporting, newest first.
    pub async fn list(&self, limit: u32) -> DbResult<Vec<Invoice>> {
        let invoices = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices ORDER BY created_at DESC, id LIMIT ?"
        ))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(invoices)
    }
}

/// Generates an invoice number: `INV-YYYYMMDD-NNNNNN`.
///
/// ## Format
/// - `YYYYMMDD`: generation date
/// - `NNNNNN`: 6 random digits (derived from a UUID v4)
///
/// Uniqueness is enforced by the unique index on
/// `invoices.invoice_number`, with bounded retry in [`InvoiceRepository::generate`].
pub fn generate_invoice_number() -> String {
    let date_part = Utc::now().format("%Y%m%d");
    let suffix = Uuid::new_v4().as_u128() % 1_000_000;
    format!("INV-{}-{:06}", date_part, suffix)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::order::{NewOrder, NewOrderItem};
    use arbor_core::{SalesChannel, TaxRates};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn billing() -> BillingSnapshot {
        BillingSnapshot {
            customer_name: "Marie Tremblay".to_string(),
            customer_phone: "+1-514-555-0133".to_string(),
            billing_address: "4021 Rue Saint-Denis".to_string(),
            billing_city: "Montréal".to_string(),
            billing_postal_code: "H2W 2M7".to_string(),
            tax_number: None,
        }
    }

    async fn place_order(db: &Database) -> arbor_core::OrderWithItems {
        db.orders()
            .create_order(
                &NewOrder {
                    channel: SalesChannel::Customer,
                    items: vec![NewOrderItem {
                        product_id: Uuid::new_v4().to_string(),
                        sku: None,
                        name: None,
                        unit_price_cents: 10_000,
                        quantity: 2,
                    }],
                    discount_cents: 1_000,
                    shipping_cents: 1_500,
                    currency: None,
                    user_id: None,
                    dealer_id: None,
                },
                TaxRates::default(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_generate_copies_totals_and_billing() {
        let db = test_db().await;
        let placed = place_order(&db).await;

        let invoice = db
            .invoices()
            .generate(&placed.order.id, &billing())
            .await
            .unwrap();

        assert!(invoice.invoice_number.starts_with("INV-"));
        assert_eq!(invoice.order_id, placed.order.id);
        assert_eq!(invoice.subtotal_cents, 20_000);
        assert_eq!(invoice.tax_cents, 2_470);
        assert_eq!(invoice.total_cents, 22_970);
        assert_eq!(invoice.customer_name, "Marie Tremblay");

        // total == subtotal - discount + tax + shipping on the snapshot too
        assert_eq!(
            invoice.total_cents,
            invoice.subtotal_cents - invoice.discount_cents + invoice.tax_cents
                + invoice.shipping_cents
        );
    }

    #[tokio::test]
    async fn test_generate_for_missing_order_fails() {
        let db = test_db().await;

        let err = db
            .invoices()
            .generate("no-such-order", &billing())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    /// Regeneration is append-only: identical totals, distinct numbers,
    /// both rows preserved.
    #[tokio::test]
    async fn test_regeneration_appends_new_invoice() {
        let db = test_db().await;
        let placed = place_order(&db).await;
        let repo = db.invoices();

        let first = repo.generate(&placed.order.id, &billing()).await.unwrap();

        let mut corrected = billing();
        corrected.billing_address = "88 Avenue du Parc".to_string();
        let second = repo.generate(&placed.order.id, &corrected).await.unwrap();

        assert_ne!(first.invoice_number, second.invoice_number);
        assert_eq!(first.total_cents, second.total_cents);
        assert_eq!(first.subtotal_cents, second.subtotal_cents);

        let history = repo.list_for_order(&placed.order.id).await.unwrap();
        assert_eq!(history.len(), 2);

        // The first invoice is untouched by the regeneration.
        let original = repo.get_by_number(&first.invoice_number).await.unwrap();
        assert_eq!(original.billing_address, "4021 Rue Saint-Denis");
    }

    #[tokio::test]
    async fn test_get_by_number() {
        let db = test_db().await;
        let placed = place_order(&db).await;

        let invoice = db
            .invoices()
            .generate(&placed.order.id, &billing())
            .await
            .unwrap();

        let fetched = db
            .invoices()
            .get_by_number(&invoice.invoice_number)
            .await
            .unwrap();
        assert_eq!(fetched.id, invoice.id);

        let err = db
            .invoices()
            .get_by_number("INV-19700101-000000")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_invoice_number_format() {
        let number = generate_invoice_number();
        assert!(number.starts_with("INV-"));
        // INV- + 8 date digits + '-' + 6 random digits
        assert_eq!(number.len(), 4 + 8 + 1 + 6);
    }
}
