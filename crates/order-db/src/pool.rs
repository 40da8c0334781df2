//! # Opening the Database
//!
//! `DbConfig` describes where the SQLite file lives and how the pool
//! behaves; `Database` is the opened handle every flow receives.
//!
//! ```text
//! DbConfig::new("order_system.sqlite")      DbConfig::in_memory()
//!         │   file, WAL, synchronous=NORMAL         │  sqlite::memory:
//!         └──────────────┬──────────────────────────┘
//!                        ▼   foreign_keys = ON
//!              Database::new(config)
//!                        │   pool of 1 connection, never recycled
//!                        │   pending migrations applied
//!                        ▼
//!   db.customers()  db.addresses()  db.products()  db.orders()  db.order_items()
//! ```
//!
//! The console is single-user and sequential, so the default pool holds a
//! single connection. Repository methods that open a transaction run every
//! statement on that transaction and never touch the pool while it is open.

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::SqlitePool;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::address::AddressRepository;
use crate::repository::customer::CustomerRepository;
use crate::repository::order::OrderRepository;
use crate::repository::order_item::OrderItemRepository;
use crate::repository::product::ProductRepository;

const MEMORY_PATH: &str = ":memory:";

fn connection_failed(e: impl Display) -> DbError {
    DbError::ConnectionFailed(e.to_string())
}

// =============================================================================
// Configuration
// =============================================================================

/// Where the database lives and how its pool is sized.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/order_system.sqlite")
///     .connect_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite file, or `:memory:`
    pub database_path: PathBuf,

    /// Pool ceiling (default 1)
    pub max_connections: u32,

    /// Connections opened up front (default 1)
    pub min_connections: u32,

    /// How long `acquire` may wait (default 30 s)
    pub connect_timeout: Duration,

    /// `None` keeps idle connections open
    pub idle_timeout: Option<Duration>,

    /// Apply pending migrations in `Database::new` (default true)
    pub run_migrations: bool,
}

impl DbConfig {
    /// File-backed configuration. A missing file is created on connect.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: None,
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, limit: u32) -> Self {
        self.max_connections = limit.max(1);
        self
    }

    pub fn connect_timeout(mut self, wait: Duration) -> Self {
        self.connect_timeout = wait;
        self
    }

    pub fn run_migrations(mut self, enabled: bool) -> Self {
        self.run_migrations = enabled;
        self
    }

    /// Private in-memory database, used by tests.
    ///
    /// It lives exactly as long as its one connection, so the pool is
    /// pinned to that connection.
    pub fn in_memory() -> Self {
        DbConfig {
            connect_timeout: Duration::from_secs(5),
            ..DbConfig::new(MEMORY_PATH)
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path == Path::new(MEMORY_PATH)
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = if self.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:").map_err(connection_failed)?
        } else {
            SqliteConnectOptions::new()
                .filename(&self.database_path)
                .create_if_missing(true)
                // WAL: the log file sits next to the database
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
        };

        // SQLite ships with foreign keys disabled
        Ok(options.foreign_keys(true))
    }
}

// =============================================================================
// Database
// =============================================================================

/// Open database; cheap to clone, hands out repositories.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::in_memory()).await?;
/// let id = db.customers().insert(&new_customer).await?;
/// let rows = db.order_items().overview().await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (or creates) the database and applies pending migrations.
    ///
    /// ## Errors
    /// * `DbError::ConnectionFailed` - directory, file or pool could not be set up
    /// * `DbError::MigrationFailed` - the schema could not be brought up to date
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(path = %config.database_path.display(), "Opening order database");

        if !config.is_in_memory() {
            if let Some(parent) = config.database_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent).map_err(connection_failed)?;
                }
            }
        }

        let options = config.connect_options()?;
        debug!(in_memory = config.is_in_memory(), "SQLite options ready");

        let pool = SqlitePoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(connection_failed)?;

        info!(connections = config.max_connections, "SQLite pool open");

        let db = Database { pool };
        if config.run_migrations {
            db.run_migrations().await?;
        }
        Ok(db)
    }

    /// Applies pending migrations; applied ones are skipped.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn customers(&self) -> CustomerRepository {
        CustomerRepository::new(self.pool.clone())
    }

    pub fn addresses(&self) -> AddressRepository {
        AddressRepository::new(self.pool.clone())
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.pool.clone())
    }

    pub fn order_items(&self) -> OrderItemRepository {
        OrderItemRepository::new(self.pool.clone())
    }

    /// Closes the pool. Repository calls fail afterwards.
    pub async fn close(&self) {
        info!("Closing order database");
        self.pool.close().await;
    }

    /// True if a trivial query still runs.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_database_opens_migrated() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.health_check().await);
        assert_eq!(db.customers().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_foreign_keys_enabled() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[tokio::test]
    async fn test_closed_database_is_unhealthy() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        assert!(!db.health_check().await);
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/orders.sqlite")
            .max_connections(3)
            .run_migrations(false);

        assert_eq!(config.max_connections, 3);
        assert_eq!(DbConfig::new("x.sqlite").max_connections(0).max_connections, 1);
        assert!(!config.run_migrations);
        assert!(!config.is_in_memory());
        assert!(DbConfig::in_memory().is_in_memory());
    }

    #[tokio::test]
    async fn test_file_database_created_on_first_connect() {
        let dir = std::env::temp_dir().join(format!("order-db-pool-{}", std::process::id()));
        let path = dir.join("nested").join("orders.sqlite");

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        assert!(db.health_check().await);
        db.close().await;

        assert!(path.exists());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
