//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Insert with a case-insensitive name uniqueness pre-check
//! - Stock lookup (order item flows show it before asking for a quantity)
//! - Delete, refused while any order item references the product
//!
//! Stock itself only moves inside the order item transactions, see
//! [`OrderItemRepository`](super::order_item::OrderItemRepository).

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::row_exists;
use order_core::{NewProduct, Product};

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a product and returns its new ID.
    ///
    /// ## Errors
    /// * `DbError::Conflict` - a product with this name exists (any case)
    pub async fn insert(&self, product: &NewProduct) -> DbResult<i64> {
        if self.name_exists(&product.name).await? {
            warn!(name = %product.name, "Product name already exists");
            return Err(DbError::conflict("product name", &product.name));
        }

        let id = sqlx::query("INSERT INTO products (name, unit_price, stock) VALUES (?1, ?2, ?3)")
            .bind(&product.name)
            .bind(product.unit_price)
            .bind(product.stock)
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::from(e).with_conflict_value(&product.name))?
            .last_insert_rowid();

        info!(id, name = %product.name, stock = product.stock, "Product created");
        Ok(id)
    }

    /// Gets a product by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        debug!(id, "Getting product by ID");

        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, unit_price, stock FROM products WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists all products ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, unit_price, stock FROM products ORDER BY name COLLATE NOCASE",
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    pub async fn exists(&self, id: i64) -> DbResult<bool> {
        row_exists(
            &self.pool,
            "SELECT EXISTS(SELECT 1 FROM products WHERE id = ?1)",
            id,
        )
        .await
    }

    /// Checks whether a product name is taken, ignoring case.
    pub async fn name_exists(&self, name: &str) -> DbResult<bool> {
        let found: i64 = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM products WHERE name = ?1 COLLATE NOCASE)",
        )
        .bind(name.trim())
        .fetch_one(&self.pool)
        .await?;

        Ok(found != 0)
    }

    /// Current stock of a product.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - no such product
    pub async fn stock(&self, id: i64) -> DbResult<i64> {
        let stock: Option<i64> = sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        stock.ok_or_else(|| DbError::not_found("Product", id))
    }

    /// True if any order item points at this product.
    pub async fn is_referenced(&self, id: i64) -> DbResult<bool> {
        row_exists(
            &self.pool,
            "SELECT EXISTS(SELECT 1 FROM order_items WHERE product_id = ?1)",
            id,
        )
        .await
    }

    /// Deletes a product.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - no such product
    /// * `DbError::DeleteBlocked` - an order item references it
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        if !self.exists(id).await? {
            return Err(DbError::not_found("Product", id));
        }

        if self.is_referenced(id).await? {
            warn!(id, "Refusing to delete product referenced by order items");
            return Err(DbError::delete_blocked(
                "product",
                id,
                "it is used in existing order items",
            ));
        }

        sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        info!(id, "Product deleted");
        Ok(())
    }
}
