//! # Schema Migrations
//!
//! The SQL files under `migrations/sqlite/` are compiled into the binary
//! and applied by [`Database::new`](crate::Database::new).
//!
//! ```text
//! migrations/sqlite/
//! ├── 001_initial_schema.sql   customers, addresses, products, orders,
//! │                            order_items, order_overview view
//! └── 002_amount_limits.sql    quantity, price and stock caps (triggers)
//! ```
//!
//! sqlx records each applied file in `_sqlx_migrations` together with its
//! checksum, so an applied file must never be edited. Schema changes go
//! into a new `NNN_name.sql` file.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies every embedded migration not yet recorded in the database.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    let embedded = MIGRATOR.migrations.len();
    info!(embedded, "Applying schema migrations");

    MIGRATOR.run(pool).await?;

    let (embedded, applied) = migration_status(pool).await?;
    info!(embedded, applied, "Schema up to date");
    Ok(())
}

/// `(embedded, applied)` migration counts.
///
/// A database that was never migrated reports zero applied.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let embedded = MIGRATOR.migrations.len();

    let tracked: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations'",
    )
    .fetch_one(pool)
    .await?;
    if tracked == 0 {
        return Ok((embedded, 0));
    }

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success")
        .fetch_one(pool)
        .await?;

    Ok((embedded, usize::try_from(applied).unwrap_or(0)))
}
