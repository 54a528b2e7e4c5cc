//! # Repository Module
//!
//! Database repository implementations for the Arbor Commerce ledger.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Checkout / admin flow                                                 │
//! │       │                                                                 │
//! │       │  db.orders().create_order(new_order, rates)                     │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  OrderRepository                                                       │
//! │  ├── create_order(&self, new_order, rates)                             │
//! │  ├── get_with_items(&self, id)                                         │
//! │  ├── list(&self, filter)                                               │
//! │  └── update_status(&self, id, status)                                  │
//! │       │                                                                 │
//! │       │  SQL (one transaction per aggregate write)                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Relation loading is EXPLICIT: methods that return items join them     │
//! │  in; methods that return the bare entity never do. No lazy loading,    │
//! │  no hidden N+1 queries.                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`order::OrderRepository`] - Order aggregate (order + items, atomic)
//! - [`invoice::InvoiceRepository`] - Append-only invoice snapshots
//! - [`settlement::SettlementRepository`] - Dealer payments, checks, balance
//! - [`settings::SettingsRepository`] - Key/value config (tax rates)

pub mod invoice;
pub mod order;
pub mod settings;
pub mod settlement;
