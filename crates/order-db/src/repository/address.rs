//! # Address Repository
//!
//! Delivery and billing addresses. A customer holds at most one address of
//! each type; the pre-check here gives a readable error before the table's
//! `UNIQUE (customer_id, address_type)` would.

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::row_exists;
use order_core::{Address, AddressListing, AddressType, NewAddress};

/// Repository for address database operations.
#[derive(Debug, Clone)]
pub struct AddressRepository {
    pool: SqlitePool,
}

impl AddressRepository {
    /// Creates a new AddressRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AddressRepository { pool }
    }

    /// Adds an address to an existing customer.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - the customer does not exist
    /// * `DbError::Conflict` - the customer already has this address type
    pub async fn insert(&self, customer_id: i64, address: &NewAddress) -> DbResult<i64> {
        let customer_exists = row_exists(
            &self.pool,
            "SELECT EXISTS(SELECT 1 FROM customers WHERE id = ?1)",
            customer_id,
        )
        .await?;
        if !customer_exists {
            return Err(DbError::not_found("Customer", customer_id));
        }

        if self.has_address_type(customer_id, address.address_type).await? {
            warn!(customer_id, address_type = %address.address_type, "Address type already present");
            return Err(DbError::conflict(
                "address type",
                address.address_type.as_str(),
            ));
        }

        let id = sqlx::query(
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
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).with_conflict_value(address.address_type.as_str()))?
        .last_insert_rowid();

        info!(id, customer_id, "Address created");
        Ok(id)
    }

    /// Lists every address with its customer's name, ordered by customer.
    pub async fn list(&self) -> DbResult<Vec<AddressListing>> {
        let rows = sqlx::query_as::<_, AddressListing>(
            r#"
            SELECT
                a.id,
                a.customer_id,
                c.name AS customer_name,
                a.address_type,
                a.street,
                a.city,
                a.zip_code,
                a.country
            FROM addresses a
            JOIN customers c ON c.id = a.customer_id
            ORDER BY a.customer_id, a.address_type DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed addresses");
        Ok(rows)
    }

    pub async fn list_for_customer(&self, customer_id: i64) -> DbResult<Vec<Address>> {
        let rows = sqlx::query_as::<_, Address>(
            r#"
            SELECT id, customer_id, address_type, street, city, zip_code, country
            FROM addresses
            WHERE customer_id = ?1
            ORDER BY id
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn has_address_type(
        &self,
        customer_id: i64,
        address_type: AddressType,
    ) -> DbResult<bool> {
        let found: i64 = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM addresses WHERE customer_id = ?1 AND address_type = ?2)",
        )
        .bind(customer_id)
        .bind(address_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(found != 0)
    }

    /// Address types the customer does not have yet, in menu order.
    pub async fn types_for_customer(&self, customer_id: i64) -> DbResult<Vec<AddressType>> {
        let taken: Vec<AddressType> =
            sqlx::query_scalar("SELECT address_type FROM addresses WHERE customer_id = ?1")
                .bind(customer_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(AddressType::ALL
            .into_iter()
            .filter(|t| !taken.contains(t))
            .collect())
    }
}
