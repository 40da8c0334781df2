//! # Customer Repository
//!
//! Database operations for customers.
//!
//! ## Key Operations
//! - Insert (alone, or together with a first address in one transaction)
//! - Case-insensitive email uniqueness pre-check
//! - Delete, refused while the customer still has orders; addresses cascade

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::row_exists;
use order_core::{Customer, NewAddress, NewCustomer};

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Inserts a customer and returns its new ID.
    ///
    /// ## Errors
    /// * `DbError::Conflict` - the email is already registered (any case)
    pub async fn insert(&self, customer: &NewCustomer) -> DbResult<i64> {
        if self.email_exists(&customer.email).await? {
            warn!(email = %customer.email, "Customer email already registered");
            return Err(DbError::conflict("email", &customer.email));
        }

        let result = sqlx::query("INSERT INTO customers (name, email, phone) VALUES (?1, ?2, ?3)")
            .bind(&customer.name)
            .bind(&customer.email)
            .bind(&customer.phone)
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::from(e).with_conflict_value(&customer.email))?;

        let id = result.last_insert_rowid();
        info!(id, name = %customer.name, "Customer created");
        Ok(id)
    }

    /// Inserts a customer and their first address atomically.
    ///
    /// ## Returns
    /// `(customer_id, address_id)`. Neither row exists if either insert fails.
    pub async fn insert_with_address(
        &self,
        customer: &NewCustomer,
        address: &NewAddress,
    ) -> DbResult<(i64, i64)> {
        if self.email_exists(&customer.email).await? {
            warn!(email = %customer.email, "Customer email already registered");
            return Err(DbError::conflict("email", &customer.email));
        }

        let mut tx = self.pool.begin().await?;

        let customer_id =
            sqlx::query("INSERT INTO customers (name, email, phone) VALUES (?1, ?2, ?3)")
                .bind(&customer.name)
                .bind(&customer.email)
                .bind(&customer.phone)
                .execute(&mut *tx)
                .await
                .map_err(|e| DbError::from(e).with_conflict_value(&customer.email))?
                .last_insert_rowid();

        let address_id = sqlx::query(
            r#"
            INSERT INTO addresses (customer_id, address_type, street, city, zip_code, country)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(customer_id)
        .bind(address.address_type)
        .bind(&address.street)
        .bind(&address.city)
        .bind(&address.zip_code)
        .bind(&address.country)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        tx.commit().await?;

        info!(customer_id, address_id, "Customer created with address");
        Ok((customer_id, address_id))
    }

    /// Gets a customer by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Customer>> {
        debug!(id, "Getting customer by ID");

        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, name, email, phone FROM customers WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Lists all customers ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            "SELECT id, name, email, phone FROM customers ORDER BY name COLLATE NOCASE, id",
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = customers.len(), "Listed customers");
        Ok(customers)
    }

    pub async fn exists(&self, id: i64) -> DbResult<bool> {
        row_exists(
            &self.pool,
            "SELECT EXISTS(SELECT 1 FROM customers WHERE id = ?1)",
            id,
        )
        .await
    }

    /// Checks whether an email is registered, ignoring case.
    pub async fn email_exists(&self, email: &str) -> DbResult<bool> {
        let found: i64 = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM customers WHERE email = ?1 COLLATE NOCASE)",
        )
        .bind(email.trim())
        .fetch_one(&self.pool)
        .await?;

        Ok(found != 0)
    }

    pub async fn has_orders(&self, id: i64) -> DbResult<bool> {
        row_exists(
            &self.pool,
            "SELECT EXISTS(SELECT 1 FROM orders WHERE customer_id = ?1)",
            id,
        )
        .await
    }

    /// Deletes a customer and (by cascade) their addresses.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - no such customer
    /// * `DbError::DeleteBlocked` - the customer still has orders
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        if !self.exists(id).await? {
            return Err(DbError::not_found("Customer", id));
        }

        if self.has_orders(id).await? {
            warn!(id, "Refusing to delete customer with orders");
            return Err(DbError::delete_blocked(
                "customer",
                id,
                "the customer has existing orders",
            ));
        }

        sqlx::query("DELETE FROM customers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        info!(id, "Customer deleted");
        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
