//! # Domain Types
//!
//! The five persisted entities plus the read models used by reports.
//!
//! ## Entity Relationships
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Customer 1 ──── * Address        (one per AddressType)               │
//! │      │                                                                  │
//! │      1                                                                  │
//! │      │                                                                  │
//! │      * Order 1 ──── * OrderItem * ──── 0..1 Product                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## New vs Stored
//! Every entity has a `New*` form (validated input, no id yet) and a stored
//! form carrying the auto-increment `id` assigned by SQLite.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::validation::{QUANTITY_MAX, UNIT_PRICE_MAX};

// =============================================================================
// Customer
// =============================================================================

/// A customer as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// A validated customer waiting to be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub phone: String,
}

// =============================================================================
// Address
// =============================================================================

/// Kind of address. A customer holds at most one of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum AddressType {
    Delivery,
    Billing,
}

impl AddressType {
    pub const ALL: [AddressType; 2] = [AddressType::Delivery, AddressType::Billing];

    pub fn as_str(&self) -> &'static str {
        match self {
            AddressType::Delivery => "Delivery",
            AddressType::Billing => "Billing",
        }
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An address as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Address {
    pub id: i64,
    pub customer_id: i64,
    pub address_type: AddressType,
    pub street: String,
    pub city: String,
    pub zip_code: String,
    pub country: String,
}

/// A validated address. `customer_id` is filled in once the owner is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAddress {
    pub address_type: AddressType,
    pub street: String,
    pub city: String,
    pub zip_code: String,
    pub country: String,
}

/// Address joined with its owner's name, for the address report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct AddressListing {
    pub id: i64,
    pub customer_id: i64,
    pub customer_name: String,
    pub address_type: AddressType,
    pub street: String,
    pub city: String,
    pub zip_code: String,
    pub country: String,
}

// =============================================================================
// Product
// =============================================================================

/// A product as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub unit_price: Money,
    pub stock: i64,
}

impl Product {
    /// Checks the requested quantity against current stock.
    pub fn check_stock(&self, quantity: i64) -> CoreResult<()> {
        crate::validation::stock_available(self.id, self.stock, quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub unit_price: Money,
    pub stock: i64,
}

// =============================================================================
// Order Status
// =============================================================================

/// Lifecycle of an order. Transitions only move forward.
///
/// ```text
/// Created ──► Paid ──► Delivered
///    └──────────────────▲
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum OrderStatus {
    Created,
    Paid,
    Delivered,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 3] = [OrderStatus::Created, OrderStatus::Paid, OrderStatus::Delivered];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "Created",
            OrderStatus::Paid => "Paid",
            OrderStatus::Delivered => "Delivered",
        }
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        next > *self
    }

    /// Validates a status change.
    pub fn transition_to(&self, next: OrderStatus) -> CoreResult<OrderStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::InvalidStatusTransition { from: *self, to: next })
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Created
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive: `paid`, `PAID` and `Paid` all parse.
impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "Status".to_string(),
                allowed: OrderStatus::ALL.iter().map(|s| s.as_str().to_string()).collect(),
            })
    }
}

// =============================================================================
// Order
// =============================================================================

/// An order as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub customer_id: i64,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
}

impl NewOrder {
    /// A fresh order for `customer_id`, dated now, status `Created`.
    pub fn now(customer_id: i64) -> Self {
        NewOrder {
            customer_id,
            order_date: Utc::now(),
            status: OrderStatus::Created,
        }
    }
}

/// One row of the order report: the order, its customer and SQL aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderSummary {
    pub id: i64,
    pub customer_id: i64,
    pub customer_name: String,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub item_count: i64,
    pub total: Money,
}

// =============================================================================
// Order Item
// =============================================================================

/// An order line as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: Option<i64>,
    pub description: Option<String>,
    pub quantity: i64,
    pub unit_price: Money,
}

impl OrderItem {
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }
}

/// A validated order line.
///
/// Built through [`NewOrderItem::new`], which enforces the cross-field rule:
/// a line must reference a product, carry a description, or both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub order_id: i64,
    pub product_id: Option<i64>,
    pub description: Option<String>,
    pub quantity: i64,
    pub unit_price: Money,
}

impl NewOrderItem {
    pub fn new(
        order_id: i64,
        product_id: Option<i64>,
        description: Option<String>,
        quantity: i64,
        unit_price: Money,
    ) -> CoreResult<Self> {
        let description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        crate::validation::item_reference(product_id, description.as_deref())?;
        if quantity <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "Quantity".to_string(),
            }
            .into());
        }
        if !unit_price.is_positive() {
            return Err(ValidationError::MustBePositive {
                field: "Unit price".to_string(),
            }
            .into());
        }
        if quantity > QUANTITY_MAX {
            return Err(ValidationError::too_large("Quantity", QUANTITY_MAX).into());
        }
        if unit_price > UNIT_PRICE_MAX {
            return Err(ValidationError::too_large("Unit price", UNIT_PRICE_MAX).into());
        }
        if unit_price.checked_times(quantity).is_none() {
            return Err(ValidationError::too_large("Line total", Money::from_cents(i64::MAX)).into());
        }

        Ok(NewOrderItem {
            order_id,
            product_id,
            description,
            quantity,
            unit_price,
        })
    }

    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }
}

/// One row of the `order_overview` view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderOverviewRow {
    pub order_id: i64,
    pub customer_id: i64,
    pub customer_name: String,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub order_item_id: i64,
    pub product_name: Option<String>,
    pub description: Option<String>,
    pub quantity: i64,
    pub unit_price: Money,
    pub total_price: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================
