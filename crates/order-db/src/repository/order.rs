//! # Order Repository
//!
//! Orders, their status lifecycle, and the order report.
//!
//! ## Status Updates
//! ```text
//! update_status(id, next)
//!      │
//!      ├── load current status ──► NotFound if missing
//!      ├── current.transition_to(next) ──► Rule(InvalidStatusTransition)
//!      └── UPDATE orders SET status = next
//! ```
//!
//! ## Deleting
//! Deleting an order returns the quantities of its product lines to stock
//! and removes the order with its items, all in one transaction.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::row_exists;
use order_core::{NewOrder, Order, OrderStatus, OrderSummary};

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Inserts an order and returns its new ID.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - the customer does not exist
    pub async fn insert(&self, order: &NewOrder) -> DbResult<i64> {
        let customer_exists = row_exists(
            &self.pool,
            "SELECT EXISTS(SELECT 1 FROM customers WHERE id = ?1)",
            order.customer_id,
        )
        .await?;
        if !customer_exists {
            return Err(DbError::not_found("Customer", order.customer_id));
        }

        let id = sqlx::query("INSERT INTO orders (customer_id, order_date, status) VALUES (?1, ?2, ?3)")
            .bind(order.customer_id)
            .bind(order.order_date)
            .bind(order.status)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        info!(id, customer_id = order.customer_id, status = %order.status, "Order created");
        Ok(id)
    }

    /// Gets an order by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Order>> {
        debug!(id, "Getting order by ID");

        let order = sqlx::query_as::<_, Order>(
            "SELECT id, customer_id, order_date, status FROM orders WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    pub async fn exists(&self, id: i64) -> DbResult<bool> {
        row_exists(
            &self.pool,
            "SELECT EXISTS(SELECT 1 FROM orders WHERE id = ?1)",
            id,
        )
        .await
    }

    /// Lists all orders with customer name, item count and total.
    ///
    /// Aggregates are computed in SQL; orders without items report zero.
    pub async fn list_summaries(&self) -> DbResult<Vec<OrderSummary>> {
        let rows = sqlx::query_as::<_, OrderSummary>(
            r#"
            SELECT
                o.id,
                o.customer_id,
                c.name AS customer_name,
                o.order_date,
                o.status,
                COUNT(oi.id) AS item_count,
                COALESCE(SUM(oi.quantity * oi.unit_price), 0) AS total
            FROM orders o
            JOIN customers c ON c.id = o.customer_id
            LEFT JOIN order_items oi ON oi.order_id = o.id
            GROUP BY o.id, o.customer_id, c.name, o.order_date, o.status
            ORDER BY o.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed orders");
        Ok(rows)
    }

    /// Moves an order forward in its lifecycle.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - no such order
    /// * `DbError::Rule` - the transition is not forward
    pub async fn update_status(&self, id: i64, next: OrderStatus) -> DbResult<OrderStatus> {
        let order = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", id))?;

        let status = order.status.transition_to(next)?;

        sqlx::query("UPDATE orders SET status = ?1 WHERE id = ?2")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await?;

        info!(id, from = %order.status, to = %status, "Order status updated");
        Ok(status)
    }

    /// Deletes an order and its items, restocking referenced products.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let exists = row_exists(
            &mut *tx,
            "SELECT EXISTS(SELECT 1 FROM orders WHERE id = ?1)",
            id,
        )
        .await?;
        if !exists {
            return Err(DbError::not_found("Order", id));
        }

        let restocked = sqlx::query(
            r#"
            UPDATE products
            SET stock = stock + (
                SELECT SUM(oi.quantity) FROM order_items oi
                WHERE oi.order_id = ?1 AND oi.product_id = products.id
            )
            WHERE id IN (
                SELECT product_id FROM order_items
                WHERE order_id = ?1 AND product_id IS NOT NULL
            )
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        // order_items go with the order (ON DELETE CASCADE)
        sqlx::query("DELETE FROM orders WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(id, restocked_products = restocked, "Order deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::repository::test_support::{customer, customer_with_order, database, product};
    use crate::DbError;
    use order_core::{CoreError, Money, NewOrder, NewOrderItem, OrderStatus};

    #[tokio::test]
    async fn test_insert_and_get_keeps_date() {
        let db = database().await;
        let customer_id = db
            .customers()
            .insert(&customer("Alice Smith", "alice@x.com"))
            .await
            .unwrap();

        let order_date = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();
        let id = db
            .orders()
            .insert(&NewOrder {
                customer_id,
                order_date,
                status: OrderStatus::Paid,
            })
            .await
            .unwrap();

        let order = db.orders().get_by_id(id).await.unwrap().unwrap();
        assert_eq!(order.customer_id, customer_id);
        assert_eq!(order.order_date, order_date);
        assert_eq!(order.status, OrderStatus::Paid);
    }

    #[tokio::test]
    async fn test_insert_for_unknown_customer() {
        let db = database().await;
        let err = db.orders().insert(&NewOrder::now(5)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_summaries_aggregate_items() {
        let db = database().await;
        let (_, order_id) = customer_with_order(&db, "sum@x.com").await;
        let (_, empty_order) = customer_with_order(&db, "empty@x.com").await;
        let product_id = db.products().insert(&product("Widget", 999, 10)).await.unwrap();

        let items = db.order_items();
        items
            .insert(&NewOrderItem::new(order_id, Some(product_id), None, 3, Money::from_cents(999)).unwrap())
            .await
            .unwrap();
        items
            .insert(
                &NewOrderItem::new(order_id, None, Some("Gift wrap".into()), 1, Money::from_cents(500))
                    .unwrap(),
            )
            .await
            .unwrap();

        let summaries = db.orders().list_summaries().await.unwrap();
        assert_eq!(summaries.len(), 2);

        let full = summaries.iter().find(|s| s.id == order_id).unwrap();
        assert_eq!(full.item_count, 2);
        assert_eq!(full.total, Money::from_cents(3497));
        assert_eq!(full.customer_name, "Order Owner");

        let empty = summaries.iter().find(|s| s.id == empty_order).unwrap();
        assert_eq!(empty.item_count, 0);
        assert_eq!(empty.total, Money::zero());
    }

    #[tokio::test]
    async fn test_status_moves_forward_only() {
        let db = database().await;
        let (_, order_id) = customer_with_order(&db, "status@x.com").await;
        let repo = db.orders();

        assert_eq!(
            repo.update_status(order_id, OrderStatus::Paid).await.unwrap(),
            OrderStatus::Paid
        );

        let err = repo
            .update_status(order_id, OrderStatus::Created)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Rule(CoreError::InvalidStatusTransition { .. })
        ));

        repo.update_status(order_id, OrderStatus::Delivered)
            .await
            .unwrap();
        let order = repo.get_by_id(order_id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Delivered);
    }

    #[tokio::test]
    async fn test_status_of_missing_order() {
        let db = database().await;
        let err = db
            .orders()
            .update_status(3, OrderStatus::Paid)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_restocks_and_cascades() {
        let db = database().await;
        let (customer_id, order_id) = customer_with_order(&db, "delete@x.com").await;
        let product_id = db.products().insert(&product("Widget", 999, 10)).await.unwrap();

        for quantity in [3, 2] {
            let item = NewOrderItem::new(order_id, Some(product_id), None, quantity, Money::from_cents(999))
                .unwrap();
            db.order_items().insert(&item).await.unwrap();
        }
        assert_eq!(db.products().stock(product_id).await.unwrap(), 5);

        db.orders().delete(order_id).await.unwrap();

        assert!(!db.orders().exists(order_id).await.unwrap());
        assert!(db.order_items().list_for_order(order_id).await.unwrap().is_empty());
        assert_eq!(db.products().stock(product_id).await.unwrap(), 10);

        // With the order gone the customer can be removed too
        db.customers().delete(customer_id).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_missing_order() {
        let db = database().await;
        assert!(db.orders().delete(11).await.unwrap_err().is_not_found());
        // The aborted transaction released the connection
        assert!(db.health_check().await);
    }
}
