//! # Order Repository
//!
//! Database operations for orders and order items.
//!
//! ## Order Creation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       create_order()                                    │
//! │                                                                         │
//! │  1. VALIDATE (before any write)                                        │
//! │     └── items non-empty, quantities > 0, prices >= 0                   │
//! │                                                                         │
//! │  2. COMPUTE TOTALS (arbor-core, pure)                                  │
//! │     └── subtotal / discount / tax / shipping / total                   │
//! │                                                                         │
//! │  3. GENERATE NUMBER (channel-prefixed, random digits)                  │
//! │     └── "DEALER-SALE-483920175064"                                     │
//! │                                                                         │
//! │  4. INSERT order + items IN ONE TRANSACTION                            │
//! │     ├── UNIQUE(order_number) violated? → regenerate, retry (bounded)   │
//! │     └── any other failure? → roll back, NOTHING persisted              │
//! │                                                                         │
//! │  No partial order is ever externally visible.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use arbor_core::numbering::{ADMIN_SALE_PREFIX, DEALER_SALE_PREFIX};
use arbor_core::totals::{compute_order_totals, LineAmount, OrderTotals};
use arbor_core::{
    validation, CoreError, Money, Order, OrderItem, OrderStatus, OrderWithItems, SalesChannel,
    TaxRates, DEFAULT_CURRENCY, MAX_NUMBER_ATTEMPTS,
};

// =============================================================================
// Input DTOs
// =============================================================================

/// One line of a new order, with product data already resolved and priced
/// by the caller (the snapshot starts here).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub product_id: String,
    /// SKU to freeze onto the item, if known.
    pub sku: Option<String>,
    /// Product name to freeze onto the item, if known.
    pub name: Option<String>,
    pub unit_price_cents: i64,
    pub quantity: i64,
}

/// A new order as supplied by the checkout or admin-sale flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub channel: SalesChannel,
    pub items: Vec<NewOrderItem>,
    pub discount_cents: i64,
    pub shipping_cents: i64,
    /// Currency code; defaults to [`DEFAULT_CURRENCY`] when absent.
    pub currency: Option<String>,
    pub user_id: Option<String>,
    /// Required for the dealer-sale channel.
    pub dealer_id: Option<String>,
}

// =============================================================================
// Listing Filters
// =============================================================================

/// Channel filtering for order listings.
///
/// There is no channel column; filtering is prefix pattern matching on the
/// order number (see [`arbor_core::numbering`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelFilter {
    /// All orders regardless of channel.
    All,
    /// Customer orders only: pattern-EXCLUDES both reserved prefixes.
    CustomerOnly,
    /// Orders from exactly one channel.
    Only(SalesChannel),
}

/// Filter and paging for [`OrderRepository::list`].
#[derive(Debug, Clone)]
pub struct OrderFilter {
    pub channel: ChannelFilter,
    /// Restrict to one dealer's orders.
    pub dealer_id: Option<String>,
    pub limit: u32,
}

impl Default for OrderFilter {
    fn default() -> Self {
        OrderFilter {
            channel: ChannelFilter::All,
            dealer_id: None,
            limit: 50,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

const ORDER_COLUMNS: &str = "id, order_number, status, subtotal_cents, discount_cents, \
     tax_cents, shipping_cents, total_cents, currency, user_id, dealer_id, \
     created_at, updated_at";

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Creates an order with its items as one atomic unit.
    ///
    /// Validates first (no partial state on failure), computes totals via
    /// the pure calculator, then inserts under a freshly generated
    /// channel-prefixed number. A number collision (lost race or random
    /// clash) is retried with a regenerated number up to
    /// [`MAX_NUMBER_ATTEMPTS`] before surfacing `DuplicateNumber`.
    pub async fn create_order(
        &self,
        new_order: &NewOrder,
        rates: TaxRates,
    ) -> DbResult<OrderWithItems> {
        let totals = validate_and_total(new_order, rates)?;

        let mut last_err = DbError::Internal("order number generation exhausted".to_string());
        for attempt in 1..=MAX_NUMBER_ATTEMPTS {
            let order_number = generate_order_number(new_order.channel);
            match self.insert_order(&order_number, new_order, &totals).await {
                Ok(created) => return Ok(created),
                Err(err @ DbError::DuplicateNumber { .. }) => {
                    debug!(attempt, %order_number, "Order number collision, regenerating");
                    last_err = err;
                }
                Err(other) => return Err(other),
            }
        }

        Err(last_err)
    }

    /// Creates an order under a caller-supplied number (single attempt).
    ///
    /// The number is NOT regenerated on collision; a clash surfaces as
    /// `DuplicateNumber` directly. Used by flows that pre-allocate numbers
    /// and by the concurrency tests.
    pub async fn create_order_with_number(
        &self,
        order_number: &str,
        new_order: &NewOrder,
        rates: TaxRates,
    ) -> DbResult<OrderWithItems> {
        let totals = validate_and_total(new_order, rates)?;
        self.insert_order(order_number, new_order, &totals).await
    }

    /// Inserts order + items in one transaction.
    ///
    /// The transaction is rolled back on any failure: an order without its
    /// items (or items without their order) can never be observed.
    async fn insert_order(
        &self,
        order_number: &str,
        new_order: &NewOrder,
        totals: &OrderTotals,
    ) -> DbResult<OrderWithItems> {
        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4().to_string(),
            order_number: order_number.to_string(),
            status: OrderStatus::Pending,
            subtotal_cents: totals.subtotal.cents(),
            discount_cents: totals.discount.cents(),
            tax_cents: totals.tax.cents(),
            shipping_cents: totals.shipping.cents(),
            total_cents: totals.total.cents(),
            currency: new_order
                .currency
                .clone()
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            user_id: new_order.user_id.clone(),
            dealer_id: new_order.dealer_id.clone(),
            created_at: now,
            updated_at: now,
        };

        let items: Vec<OrderItem> = new_order
            .items
            .iter()
            .map(|item| OrderItem {
                id: Uuid::new_v4().to_string(),
                order_id: order.id.clone(),
                product_id: item.product_id.clone(),
                sku_snapshot: item.sku.clone(),
                name_snapshot: item.name.clone(),
                unit_price_cents: item.unit_price_cents,
                quantity: item.quantity,
                line_total_cents: item.unit_price_cents * item.quantity,
                created_at: now,
            })
            .collect();

        debug!(id = %order.id, order_number = %order.order_number, "Inserting order");

        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO orders (
                id, order_number, status,
                subtotal_cents, discount_cents, tax_cents, shipping_cents, total_cents,
                currency, user_id, dealer_id,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&order.id)
        .bind(&order.order_number)
        .bind(order.status)
        .bind(order.subtotal_cents)
        .bind(order.discount_cents)
        .bind(order.tax_cents)
        .bind(order.shipping_cents)
        .bind(order.total_cents)
        .bind(&order.currency)
        .bind(&order.user_id)
        .bind(&order.dealer_id)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await;

        if let Err(err) = inserted {
            // Dropping the transaction rolls it back.
            let db_err = DbError::from(err);
            if db_err.is_unique_violation_on("orders.order_number") {
                return Err(DbError::duplicate_number(order_number));
            }
            return Err(db_err);
        }

        for item in &items {
            sqlx::query(
                r#"
                INSERT INTO order_items (
                    id, order_id, product_id,
                    sku_snapshot, name_snapshot,
                    unit_price_cents, quantity, line_total_cents,
                    created_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&item.id)
            .bind(&item.order_id)
            .bind(&item.product_id)
            .bind(&item.sku_snapshot)
            .bind(&item.name_snapshot)
            .bind(item.unit_price_cents)
            .bind(item.quantity)
            .bind(item.line_total_cents)
            .bind(item.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(OrderWithItems { order, items })
    }

    /// Gets an order by ID (no items).
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Gets an order by its business number (no items).
    pub async fn get_by_order_number(&self, order_number: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_number = ?"
        ))
        .bind(order_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Gets an order with its items, by ID.
    pub async fn get_with_items(&self, id: &str) -> DbResult<OrderWithItems> {
        let order = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", id))?;
        let items = self.get_items(&order.id).await?;
        Ok(OrderWithItems { order, items })
    }

    /// Gets an order with its items, by business number.
    ///
    /// This backs guest order tracking: no auth, the number is the
    /// capability.
    pub async fn get_by_number_with_items(&self, order_number: &str) -> DbResult<OrderWithItems> {
        let order = self
            .get_by_order_number(order_number)
            .await?
            .ok_or_else(|| DbError::not_found("Order", order_number))?;
        let items = self.get_items(&order.id).await?;
        Ok(OrderWithItems { order, items })
    }

    /// Gets all items for an order, in insertion order.
    pub async fn get_items(&self, order_id: &str) -> DbResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, order_id, product_id, sku_snapshot, name_snapshot,
                   unit_price_cents, quantity, line_total_cents, created_at
            FROM order_items
            WHERE order_id = ?
            ORDER BY created_at, id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists orders, newest first.
    ///
    /// ## Channel Filtering
    /// `CustomerOnly` pattern-excludes both reserved prefixes; a customer
    /// listing can never contain an `ADMIN-SALE-` or `DEALER-SALE-` number.
    pub async fn list(&self, filter: &OrderFilter) -> DbResult<Vec<Order>> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {ORDER_COLUMNS} FROM orders WHERE 1 = 1"));

        match filter.channel {
            ChannelFilter::All => {}
            ChannelFilter::CustomerOnly | ChannelFilter::Only(SalesChannel::Customer) => {
                qb.push(" AND order_number NOT LIKE ")
                    .push_bind(format!("{ADMIN_SALE_PREFIX}%"));
                qb.push(" AND order_number NOT LIKE ")
                    .push_bind(format!("{DEALER_SALE_PREFIX}%"));
            }
            ChannelFilter::Only(channel) => {
                qb.push(" AND order_number LIKE ")
                    .push_bind(format!("{}%", channel.prefix()));
            }
        }

        if let Some(dealer_id) = &filter.dealer_id {
            qb.push(" AND dealer_id = ").push_bind(dealer_id);
        }

        qb.push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(filter.limit as i64);

        let orders = qb.build_query_as::<Order>().fetch_all(&self.pool).await?;

        Ok(orders)
    }

    /// Updates an order's status.
    pub async fn update_status(&self, id: &str, status: OrderStatus) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query("UPDATE orders SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status)
            .bind(now)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        Ok(())
    }

    /// Deletes orders in bulk (admin action); items cascade.
    ///
    /// ## Returns
    /// How many orders were actually deleted.
    pub async fn delete_orders(&self, ids: &[String]) -> DbResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("DELETE FROM orders WHERE id IN (");
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        qb.push(")");

        let result = qb.build().execute(&self.pool).await?;

        debug!(deleted = result.rows_affected(), "Bulk-deleted orders");
        Ok(result.rows_affected())
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Validates a new order and computes its totals. Runs entirely before any
/// write; a failure here leaves no trace in the database.
fn validate_and_total(new_order: &NewOrder, rates: TaxRates) -> DbResult<OrderTotals> {
    if new_order.items.is_empty() {
        return Err(DbError::Domain(CoreError::EmptyOrder));
    }
    validation::validate_order_size(new_order.items.len()).map_err(CoreError::from)?;

    if new_order.channel == SalesChannel::DealerSale {
        match &new_order.dealer_id {
            Some(dealer_id) => {
                validation::validate_uuid("dealer_id", dealer_id).map_err(CoreError::from)?
            }
            None => {
                return Err(DbError::Domain(
                    arbor_core::ValidationError::Required {
                        field: "dealer_id".to_string(),
                    }
                    .into(),
                ))
            }
        }
    }

    for item in &new_order.items {
        validation::validate_uuid("product_id", &item.product_id).map_err(CoreError::from)?;
        validation::validate_quantity(item.quantity).map_err(CoreError::from)?;
        validation::validate_price_cents(item.unit_price_cents).map_err(CoreError::from)?;
    }

    let lines: Vec<LineAmount> = new_order
        .items
        .iter()
        .map(|item| LineAmount {
            unit_price: Money::from_cents(item.unit_price_cents),
            quantity: item.quantity,
        })
        .collect();

    let totals = compute_order_totals(
        &lines,
        Money::from_cents(new_order.discount_cents),
        Money::from_cents(new_order.shipping_cents),
        rates,
    )?;

    Ok(totals)
}

/// Generates a channel-prefixed order number: the channel prefix followed
/// by 12 random digits (derived from a UUID v4).
///
/// ## Example
/// `DEALER-SALE-483920175064`
///
/// Uniqueness is NOT guaranteed here; the unique index on
/// `orders.order_number` is the arbiter, and `create_order` retries on
/// collision.
pub fn generate_order_number(channel: SalesChannel) -> String {
    let digits = Uuid::new_v4().as_u128() % 1_000_000_000_000;
    format!("{}{:012}", channel.prefix(), digits)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn product_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// 2 × $100.00, $10.00 off, $15.00 shipping → $229.70 at default rates.
    fn reference_order(channel: SalesChannel, dealer_id: Option<String>) -> NewOrder {
        NewOrder {
            channel,
            items: vec![NewOrderItem {
                product_id: product_id(),
                sku: Some("WIDGET-1".to_string()),
                name: Some("Widget".to_string()),
                unit_price_cents: 10_000,
                quantity: 2,
            }],
            discount_cents: 1_000,
            shipping_cents: 1_500,
            currency: None,
            user_id: None,
            dealer_id,
        }
    }

    #[tokio::test]
    async fn test_create_order_persists_order_and_items() {
        let db = test_db().await;
        let repo = db.orders();

        let created = repo
            .create_order(
                &reference_order(SalesChannel::Customer, None),
                TaxRates::default(),
            )
            .await
            .unwrap();

        assert_eq!(created.order.subtotal_cents, 20_000);
        assert_eq!(created.order.tax_cents, 2_470);
        assert_eq!(created.order.total_cents, 22_970);
        assert_eq!(created.order.currency, DEFAULT_CURRENCY);
        assert_eq!(created.order.status, OrderStatus::Pending);
        assert_eq!(created.order.channel(), SalesChannel::Customer);

        let fetched = repo.get_with_items(&created.order.id).await.unwrap();
        assert_eq!(fetched.items.len(), 1);
        assert_eq!(fetched.items[0].line_total_cents, 20_000);
        assert_eq!(fetched.items[0].sku_snapshot.as_deref(), Some("WIDGET-1"));

        // total == subtotal - discount + tax + shipping
        let o = &fetched.order;
        assert_eq!(
            o.total_cents,
            o.subtotal_cents - o.discount_cents + o.tax_cents + o.shipping_cents
        );
    }

    #[tokio::test]
    async fn test_create_order_channel_prefixes() {
        let db = test_db().await;
        let repo = db.orders();

        let admin = repo
            .create_order(
                &reference_order(SalesChannel::AdminSale, None),
                TaxRates::default(),
            )
            .await
            .unwrap();
        assert!(admin.order.order_number.starts_with("ADMIN-SALE-"));

        let dealer = repo
            .create_order(
                &reference_order(SalesChannel::DealerSale, Some(Uuid::new_v4().to_string())),
                TaxRates::default(),
            )
            .await
            .unwrap();
        assert!(dealer.order.order_number.starts_with("DEALER-SALE-"));
    }

    #[tokio::test]
    async fn test_create_order_rejects_empty_items() {
        let db = test_db().await;
        let repo = db.orders();

        let mut order = reference_order(SalesChannel::Customer, None);
        order.items.clear();

        let err = repo
            .create_order(&order, TaxRates::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::EmptyOrder)));
    }

    #[tokio::test]
    async fn test_create_order_rejects_bad_amounts() {
        let db = test_db().await;
        let repo = db.orders();

        let mut negative_price = reference_order(SalesChannel::Customer, None);
        negative_price.items[0].unit_price_cents = -1;
        assert!(matches!(
            repo.create_order(&negative_price, TaxRates::default())
                .await
                .unwrap_err(),
            DbError::Domain(_)
        ));

        let mut zero_qty = reference_order(SalesChannel::Customer, None);
        zero_qty.items[0].quantity = 0;
        assert!(matches!(
            repo.create_order(&zero_qty, TaxRates::default())
                .await
                .unwrap_err(),
            DbError::Domain(_)
        ));

        let mut oversized_discount = reference_order(SalesChannel::Customer, None);
        oversized_discount.discount_cents = 1_000_000;
        assert!(matches!(
            repo.create_order(&oversized_discount, TaxRates::default())
                .await
                .unwrap_err(),
            DbError::Domain(CoreError::InvalidAmount { .. })
        ));

        // Nothing was persisted by any of the failed attempts.
        let all = repo.list(&OrderFilter::default()).await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn test_dealer_sale_requires_dealer_id() {
        let db = test_db().await;
        let repo = db.orders();

        let err = repo
            .create_order(
                &reference_order(SalesChannel::DealerSale, None),
                TaxRates::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_duplicate_number_surfaces() {
        let db = test_db().await;
        let repo = db.orders();
        let order = reference_order(SalesChannel::Customer, None);

        repo.create_order_with_number("483920175064", &order, TaxRates::default())
            .await
            .unwrap();

        let err = repo
            .create_order_with_number("483920175064", &order, TaxRates::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::DuplicateNumber { .. }));

        // Exactly one order exists under that number.
        let listed = repo.list(&OrderFilter::default()).await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn test_get_by_number_with_items() {
        let db = test_db().await;
        let repo = db.orders();

        let created = repo
            .create_order(
                &reference_order(SalesChannel::Customer, None),
                TaxRates::default(),
            )
            .await
            .unwrap();

        let tracked = repo
            .get_by_number_with_items(&created.order.order_number)
            .await
            .unwrap();
        assert_eq!(tracked.order.id, created.order.id);
        assert_eq!(tracked.items.len(), 1);

        let err = repo
            .get_by_number_with_items("000000000000")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_customer_listing_excludes_reserved_prefixes() {
        let db = test_db().await;
        let repo = db.orders();

        repo.create_order(
            &reference_order(SalesChannel::Customer, None),
            TaxRates::default(),
        )
        .await
        .unwrap();
        repo.create_order(
            &reference_order(SalesChannel::AdminSale, None),
            TaxRates::default(),
        )
        .await
        .unwrap();
        repo.create_order(
            &reference_order(SalesChannel::DealerSale, Some(Uuid::new_v4().to_string())),
            TaxRates::default(),
        )
        .await
        .unwrap();

        let customers = repo
            .list(&OrderFilter {
                channel: ChannelFilter::CustomerOnly,
                ..OrderFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(customers.len(), 1);
        for order in &customers {
            assert!(!order.order_number.starts_with("ADMIN-SALE-"));
            assert!(!order.order_number.starts_with("DEALER-SALE-"));
        }

        let dealers = repo
            .list(&OrderFilter {
                channel: ChannelFilter::Only(SalesChannel::DealerSale),
                ..OrderFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(dealers.len(), 1);

        let all = repo.list(&OrderFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_update_status() {
        let db = test_db().await;
        let repo = db.orders();

        let created = repo
            .create_order(
                &reference_order(SalesChannel::Customer, None),
                TaxRates::default(),
            )
            .await
            .unwrap();

        repo.update_status(&created.order.id, OrderStatus::Completed)
            .await
            .unwrap();
        let fetched = repo.get_by_id(&created.order.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, OrderStatus::Completed);

        let err = repo
            .update_status("missing", OrderStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_bulk_delete_cascades_items() {
        let db = test_db().await;
        let repo = db.orders();

        let created = repo
            .create_order(
                &reference_order(SalesChannel::Customer, None),
                TaxRates::default(),
            )
            .await
            .unwrap();

        let deleted = repo
            .delete_orders(&[created.order.id.clone()])
            .await
            .unwrap();
        assert_eq!(deleted, 1);

        assert!(repo.get_by_id(&created.order.id).await.unwrap().is_none());
        assert!(repo.get_items(&created.order.id).await.unwrap().is_empty());
    }

    /// Two concurrent creations racing on the same generated number:
    /// exactly one persists, the loser gets DuplicateNumber, and a retry
    /// with a regenerated number succeeds.
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_same_number_exactly_one_wins() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::new(dir.path().join("ledger.db")))
            .await
            .unwrap();

        let order = reference_order(SalesChannel::Customer, None);
        let orders_a = db.orders();
        let orders_b = db.orders();
        let (a, b) = tokio::join!(
            orders_a.create_order_with_number("555000111222", &order, TaxRates::default()),
            orders_b.create_order_with_number("555000111222", &order, TaxRates::default()),
        );

        let winners = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
        assert_eq!(winners, 1, "exactly one concurrent insert must commit");

        let loser = if a.is_err() { a } else { b };
        assert!(matches!(
            loser.unwrap_err(),
            DbError::DuplicateNumber { .. }
        ));

        // The losing caller retries through the regenerating path.
        let retried = db
            .orders()
            .create_order(&order, TaxRates::default())
            .await
            .unwrap();
        assert_ne!(retried.order.order_number, "555000111222");

        let all = db.orders().list(&OrderFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
    }
}
