//! # Seed Data Generator
//!
//! Populates the database with sample ledger data for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database (./arbor.db)
//! cargo run -p arbor-db --bin seed
//!
//! # Specify database path
//! cargo run -p arbor-db --bin seed -- --db ./data/arbor.db
//!
//! # Custom order count per channel
//! cargo run -p arbor-db --bin seed -- --count 25
//! ```
//!
//! ## Generated Data
//! - Tax rate settings (federal 5%, provincial 8%)
//! - Orders across all three channels (customer, admin-sale, dealer-sale)
//! - An invoice for one customer order
//! - A dealer with a payment and a deposited check

use std::env;

use chrono::{Duration, Utc};
use uuid::Uuid;

use arbor_core::{
    BillingSnapshot, SalesChannel, SETTING_FEDERAL_TAX_RATE, SETTING_PROVINCIAL_TAX_RATE,
};
use arbor_db::{Database, DbConfig, NewCheck, NewOrder, NewOrderItem, NewPayment};

/// Sample products for order lines: (sku, name, price_cents).
const PRODUCTS: &[(&str, &str, i64)] = &[
    ("CEDAR-PLANK-6", "Cedar Plank 6ft", 1_499),
    ("OAK-BOARD-8", "Oak Board 8ft", 3_299),
    ("MAPLE-PANEL-4", "Maple Panel 4x8", 5_850),
    ("BIRCH-DOWEL-12", "Birch Dowel 12mm", 249),
    ("WALNUT-SLAB-5", "Walnut Slab 5ft", 18_900),
    ("PINE-STUD-2x4", "Pine Stud 2x4", 689),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let db_path = arg_value(&args, "--db").unwrap_or_else(|| "./arbor.db".to_string());
    let count: usize = arg_value(&args, "--count")
        .and_then(|c| c.parse().ok())
        .unwrap_or(10);

    tracing::info!(db_path = %db_path, count, "Seeding ledger data");

    let db = Database::new(DbConfig::new(&db_path)).await?;

    // Tax rates the calculator will read at checkout.
    let settings = db.settings();
    settings.set(SETTING_FEDERAL_TAX_RATE, "5").await?;
    settings.set(SETTING_PROVINCIAL_TAX_RATE, "8").await?;
    let rates = settings.tax_rates().await?;

    let orders = db.orders();
    let dealer_id = Uuid::new_v4().to_string();

    let mut first_customer_order = None;
    for i in 0..count {
        for channel in [
            SalesChannel::Customer,
            SalesChannel::AdminSale,
            SalesChannel::DealerSale,
        ] {
            let (sku, name, price_cents) = PRODUCTS[i % PRODUCTS.len()];
            let new_order = NewOrder {
                channel,
                items: vec![NewOrderItem {
                    product_id: Uuid::new_v4().to_string(),
                    sku: Some(sku.to_string()),
                    name: Some(name.to_string()),
                    unit_price_cents: price_cents,
                    quantity: (i % 3 + 1) as i64,
                }],
                discount_cents: 0,
                shipping_cents: if channel == SalesChannel::Customer {
                    1_200
                } else {
                    0
                },
                currency: None,
                user_id: None,
                dealer_id: (channel == SalesChannel::DealerSale)
                    .then(|| dealer_id.clone()),
            };

            let created = orders.create_order(&new_order, rates).await?;
            if channel == SalesChannel::Customer && first_customer_order.is_none() {
                first_customer_order = Some(created.order.id.clone());
            }
        }
    }

    // Snapshot one order into an invoice.
    if let Some(order_id) = first_customer_order {
        let invoice = db
            .invoices()
            .generate(
                &order_id,
                &BillingSnapshot {
                    customer_name: "Marie Tremblay".to_string(),
                    customer_phone: "+1-514-555-0133".to_string(),
                    billing_address: "4021 Rue Saint-Denis".to_string(),
                    billing_city: "Montréal".to_string(),
                    billing_postal_code: "H2W 2M7".to_string(),
                    tax_number: None,
                },
            )
            .await?;
        tracing::info!(invoice_number = %invoice.invoice_number, "Generated sample invoice");
    }

    // Partially settle the dealer's balance.
    let settlements = db.settlements();
    let today = Utc::now().date_naive();

    settlements
        .record_payment(&NewPayment {
            dealer_id: dealer_id.clone(),
            order_id: None,
            amount_cents: 25_000,
            paid_on: today,
        })
        .await?;

    let check = settlements
        .create_check(&NewCheck {
            dealer_id: dealer_id.clone(),
            amount_cents: 40_000,
            check_number: "000412".to_string(),
            bank_name: "Banque Nationale".to_string(),
            issue_date: today,
            due_date: today + Duration::days(30),
            notes: Some("Partial settlement, March orders".to_string()),
        })
        .await?;
    settlements.deposit_check(&check.id).await?;

    let balance = settlements.dealer_balance(&dealer_id).await?;
    tracing::info!(dealer_id = %dealer_id, balance = %balance, "Dealer seeded");

    tracing::info!("Seed complete");
    db.close().await;
    Ok(())
}

/// Returns the value following a `--flag` argument, if present.
fn arg_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
