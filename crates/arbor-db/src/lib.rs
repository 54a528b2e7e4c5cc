//! # arbor-db: Database Layer for the Arbor Commerce Ledger
//!
//! This crate provides database access for the sales & invoicing ledger.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Arbor Commerce Data Flow                            │
//! │                                                                         │
//! │  Checkout / admin-sale / settlement flow (external)                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     arbor-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ OrderRepo     │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ InvoiceRepo   │    │ 001_init.sql │  │   │
//! │  │   │ Connection    │    │ SettlementRepo│    │ ...          │  │   │
//! │  │   │ Management    │    │ SettingsRepo  │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │          orders / order_items / invoices / checks /             │   │
//! │  │          payments / settings                                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (order, invoice, settlement, settings)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use arbor_db::{Database, DbConfig};
//!
//! // Create database with default config (runs migrations)
//! let db = Database::new(DbConfig::new("path/to/arbor.db")).await?;
//!
//! // Place an order at the current tax rates
//! let rates = db.settings().tax_rates().await?;
//! let order = db.orders().create_order(&new_order, rates).await?;
//!
//! // Snapshot it into an invoice
//! let invoice = db.invoices().generate(&order.order.id, &billing).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::invoice::InvoiceRepository;
pub use repository::order::{
    ChannelFilter, NewOrder, NewOrderItem, OrderFilter, OrderRepository,
};
pub use repository::settings::SettingsRepository;
pub use repository::settlement::{NewCheck, NewPayment, SettlementRepository};
