//! # Order System Entry Point
//!
//! Terminal order management: customers with delivery and billing
//! addresses, a product catalog, and orders whose lines draw down stock.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  main.rs ────► current-thread tokio runtime                            │
//! │  lib.rs ─────► logging, database, raw mode, menu session               │
//! │  commands/ ──► create / show / update / delete flows                   │
//! │  order-db ───► SQLite (WAL, foreign keys, migrations)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Environment
//! - `ORDER_SYSTEM_DB_PATH` - database file
//! - `ORDER_SYSTEM_LOG` - log file
//! - `ORDER_SYSTEM_CURRENCY` - price suffix (default `kr`)
//! - `RUST_LOG` - log filter

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // The setup lives in lib.rs so the session can be driven from tests
    order_console::run().await
}
