//! # Repository Module
//!
//! One repository per table.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Console flow                                                          │
//! │       │                                                                 │
//! │       │  db.order_items().insert(&item)                                │
//! │       ▼                                                                 │
//! │  OrderItemRepository                                                   │
//! │  ├── BEGIN                                                             │
//! │  ├── check order + product stock                                       │
//! │  ├── INSERT order_items                                                │
//! │  ├── UPDATE products SET stock = stock - qty                           │
//! │  └── COMMIT (or ROLLBACK on any failure)                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CustomerRepository`](customer::CustomerRepository) - Customers, with an optional first address
//! - [`AddressRepository`](address::AddressRepository) - Delivery / billing addresses
//! - [`ProductRepository`](product::ProductRepository) - Catalogue and stock
//! - [`OrderRepository`](order::OrderRepository) - Orders and status changes
//! - [`OrderItemRepository`](order_item::OrderItemRepository) - Lines, stock movement, overview report

pub mod address;
pub mod customer;
pub mod order;
pub mod order_item;
pub mod product;

use sqlx::{Executor, Sqlite};

use crate::error::DbResult;

/// Runs a single-parameter `SELECT EXISTS(...)` style query.
///
/// SQLite has no boolean type, so the flag is read back as an integer.
pub(crate) async fn row_exists<'e, E>(executor: E, sql: &'static str, id: i64) -> DbResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let found: i64 = sqlx::query_scalar(sql).bind(id).fetch_one(executor).await?;
    Ok(found != 0)
}
