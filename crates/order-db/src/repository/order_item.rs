//! # Order Item Repository
//!
//! Order lines and the stock they consume.
//!
//! ## Stock Movement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  insert(item)                          delete(id)                       │
//! │                                                                         │
//! │  BEGIN                                 BEGIN                            │
//! │   ├── order exists?                     ├── load item                   │
//! │   ├── product stock ≥ quantity?         ├── stock += item.quantity      │
//! │   ├── INSERT order_items                │   (if it references a product)│
//! │   ├── stock -= quantity                 └── DELETE order_items          │
//! │   │   (guarded: WHERE stock >= qty)    COMMIT                           │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any error drops the transaction, which rolls everything back.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::row_exists;
use order_core::{validation, CoreError, NewOrderItem, OrderItem, OrderOverviewRow};

/// Repository for order item database operations.
#[derive(Debug, Clone)]
pub struct OrderItemRepository {
    pool: SqlitePool,
}

impl OrderItemRepository {
    /// Creates a new OrderItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderItemRepository { pool }
    }

    /// Inserts an order item and, for product lines, decrements stock.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - the order or product does not exist
    /// * `DbError::Rule` - the product is out of stock or has too little
    pub async fn insert(&self, item: &NewOrderItem) -> DbResult<i64> {
        let mut tx = self.pool.begin().await?;

        let order_exists = row_exists(
            &mut *tx,
            "SELECT EXISTS(SELECT 1 FROM orders WHERE id = ?1)",
            item.order_id,
        )
        .await?;
        if !order_exists {
            return Err(DbError::not_found("Order", item.order_id));
        }

        if let Some(product_id) = item.product_id {
            let available: Option<i64> =
                sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
                    .bind(product_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            let available = available.ok_or_else(|| DbError::not_found("Product", product_id))?;

            if let Err(e) = validation::stock_available(product_id, available, item.quantity) {
                warn!(product_id, available, requested = item.quantity, "Insufficient stock");
                return Err(e.into());
            }
        }

        let id = sqlx::query(
            r#"
            INSERT INTO order_items (order_id, product_id, description, quantity, unit_price)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(item.order_id)
        .bind(item.product_id)
        .bind(item.description.as_deref())
        .bind(item.quantity)
        .bind(item.unit_price)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        if let Some(product_id) = item.product_id {
            let updated = sqlx::query(
                "UPDATE products SET stock = stock - ?1 WHERE id = ?2 AND stock >= ?1",
            )
            .bind(item.quantity)
            .bind(product_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

            if updated == 0 {
                return Err(CoreError::InsufficientStock {
                    product_id,
                    available: 0,
                    requested: item.quantity,
                }
                .into());
            }
        }

        tx.commit().await?;

        info!(
            id,
            order_id = item.order_id,
            product_id = ?item.product_id,
            quantity = item.quantity,
            "Order item created"
        );
        Ok(id)
    }

    /// Gets an order item by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<OrderItem>> {
        let item = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, order_id, product_id, description, quantity, unit_price
            FROM order_items
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    pub async fn list_for_order(&self, order_id: i64) -> DbResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, order_id, product_id, description, quantity, unit_price
            FROM order_items
            WHERE order_id = ?1
            ORDER BY id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// One row per order item from the `order_overview` view.
    pub async fn overview(&self) -> DbResult<Vec<OrderOverviewRow>> {
        let rows = sqlx::query_as::<_, OrderOverviewRow>(
            r#"
            SELECT
                order_id,
                customer_id,
                customer_name,
                order_date,
                status,
                order_item_id,
                product_name,
                description,
                quantity,
                unit_price,
                total_price
            FROM order_overview
            ORDER BY order_id, order_item_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Loaded order overview");
        Ok(rows)
    }

    /// Deletes an order item, returning its quantity to product stock.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let item = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, order_id, product_id, description, quantity, unit_price
            FROM order_items
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Order item", id))?;

        if let Some(product_id) = item.product_id {
            sqlx::query("UPDATE products SET stock = stock + ?1 WHERE id = ?2")
                .bind(item.quantity)
                .bind(product_id)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("DELETE FROM order_items WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(id, order_id = item.order_id, "Order item deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::test_support::{customer_with_order, database, product};
    use crate::DbError;
    use order_core::{CoreError, Money, NewOrderItem, OrderStatus};

    fn line(order_id: i64, product_id: Option<i64>, quantity: i64) -> NewOrderItem {
        NewOrderItem::new(order_id, product_id, None, quantity, Money::from_cents(999)).unwrap()
    }

    #[tokio::test]
    async fn test_insert_decrements_stock() {
        let db = database().await;
        let (_, order_id) = customer_with_order(&db, "a@x.com").await;
        let product_id = db.products().insert(&product("Widget", 999, 10)).await.unwrap();

        let id = db.order_items().insert(&line(order_id, Some(product_id), 3)).await.unwrap();

        let item = db.order_items().get_by_id(id).await.unwrap().unwrap();
        assert_eq!(item.line_total(), Money::from_cents(2997));
        assert_eq!(db.products().stock(product_id).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_insufficient_stock_leaves_everything_unchanged() {
        let db = database().await;
        let (_, order_id) = customer_with_order(&db, "b@x.com").await;
        let product_id = db.products().insert(&product("Widget", 999, 2)).await.unwrap();

        let err = db
            .order_items()
            .insert(&line(order_id, Some(product_id), 3))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::Rule(CoreError::InsufficientStock {
                available: 2,
                requested: 3,
                ..
            })
        ));
        assert_eq!(db.products().stock(product_id).await.unwrap(), 2);
        assert!(db.order_items().list_for_order(order_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_out_of_stock() {
        let db = database().await;
        let (_, order_id) = customer_with_order(&db, "c@x.com").await;
        let product_id = db.products().insert(&product("Empty", 100, 0)).await.unwrap();

        let err = db
            .order_items()
            .insert(&line(order_id, Some(product_id), 1))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Rule(CoreError::OutOfStock { .. })));
    }

    #[tokio::test]
    async fn test_description_only_line_touches_no_stock() {
        let db = database().await;
        let (_, order_id) = customer_with_order(&db, "d@x.com").await;
        let product_id = db.products().insert(&product("Widget", 999, 10)).await.unwrap();

        let item = NewOrderItem::new(order_id, None, Some("Shipping".into()), 1, Money::from_cents(4900))
            .unwrap();
        db.order_items().insert(&item).await.unwrap();

        assert_eq!(db.products().stock(product_id).await.unwrap(), 10);
        let rows = db.order_items().overview().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product_name, None);
        assert_eq!(rows[0].description.as_deref(), Some("Shipping"));
    }

    #[tokio::test]
    async fn test_unknown_order_or_product() {
        let db = database().await;
        let product_id = db.products().insert(&product("Widget", 999, 10)).await.unwrap();

        let err = db.order_items().insert(&line(77, Some(product_id), 1)).await.unwrap_err();
        assert!(err.is_not_found());

        let (_, order_id) = customer_with_order(&db, "e@x.com").await;
        let err = db.order_items().insert(&line(order_id, Some(999), 1)).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(db.products().stock(product_id).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_delete_restocks() {
        let db = database().await;
        let (_, order_id) = customer_with_order(&db, "f@x.com").await;
        let product_id = db.products().insert(&product("Widget", 999, 10)).await.unwrap();
        let id = db.order_items().insert(&line(order_id, Some(product_id), 4)).await.unwrap();

        db.order_items().delete(id).await.unwrap();

        assert!(db.order_items().get_by_id(id).await.unwrap().is_none());
        assert_eq!(db.products().stock(product_id).await.unwrap(), 10);
        assert!(db.order_items().delete(id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_overview_joins_everything() {
        let db = database().await;
        let (customer_id, order_id) = customer_with_order(&db, "g@x.com").await;
        let product_id = db.products().insert(&product("Widget", 999, 10)).await.unwrap();
        let item_id = db.order_items().insert(&line(order_id, Some(product_id), 2)).await.unwrap();

        let rows = db.order_items().overview().await.unwrap();
        assert_eq!(rows.len(), 1);

        let row = &rows[0];
        assert_eq!(row.order_id, order_id);
        assert_eq!(row.customer_id, customer_id);
        assert_eq!(row.customer_name, "Order Owner");
        assert_eq!(row.status, OrderStatus::Created);
        assert_eq!(row.order_item_id, item_id);
        assert_eq!(row.product_name.as_deref(), Some("Widget"));
        assert_eq!(row.quantity, 2);
        assert_eq!(row.total_price, Money::from_cents(1998));
    }
}
