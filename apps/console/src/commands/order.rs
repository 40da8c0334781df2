//! # Order Commands
//!
//! Order headers: create, report, move through the status lifecycle and
//! delete. Deleting an order returns its product quantities to stock.
//!
//! ## Status Update
//! ```text
//! Order ID ──► current status shown
//!          ──► Delivered? nothing left to do
//!          ──► new status, re-asked until it is later than the current one
//! ```

use chrono::Utc;
use std::io::Write;
use tracing::info;

use crate::commands::{prompt_existing, Record};
use crate::error::{AppError, AppResult};
use crate::state::ConfigState;
use crate::terminal::{Console, KeySource, Table};
use order_core::{validation, NewOrder, OrderStatus, ValidationError};
use order_db::Database;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub async fn create_order<K: KeySource, W: Write>(
    console: &mut Console<K, W>,
    db: &Database,
) -> AppResult<()> {
    console.title("CREATE ORDER")?;
    console.hint("Press ESC any time to cancel")?;
    console.blank()?;

    let customer_id = prompt_existing(console, db, Record::Customer).await?;

    let now = Utc::now();
    let order_date = console.prompt("Order date (YYYY-MM-DD) [Default: today]", |s| {
        validation::order_date(s, now)
    })?;
    let status = console.prompt(
        "Status (Created/Paid/Delivered) [Default: Created]",
        validation::order_status,
    )?;

    let order = NewOrder {
        customer_id,
        order_date,
        status,
    };
    let id = db.orders().insert(&order).await?;

    info!(id, customer_id, "Order created from console");
    console.blank()?;
    console.success(&format!(
        "Order {} created for customer {} ({}, {})",
        id,
        customer_id,
        order.order_date.format(DATE_FORMAT),
        order.status
    ))
}

pub async fn show_orders<K: KeySource, W: Write>(
    console: &mut Console<K, W>,
    db: &Database,
    config: &ConfigState,
) -> AppResult<()> {
    console.title("ORDERS")?;

    let mut table = Table::new(&[
        ("ID", 5),
        ("Customer", 20),
        ("Date", 10),
        ("Status", 9),
        ("Items", 5),
        ("Total", 12),
    ]);
    for order in db.orders().list_summaries().await? {
        table.push_row(vec![
            order.id.to_string(),
            order.customer_name,
            order.order_date.format(DATE_FORMAT).to_string(),
            order.status.to_string(),
            order.item_count.to_string(),
            config.format_price(order.total),
        ]);
    }

    console.table(&table)
}

/// Non-empty status name; unlike creation there is no default here.
fn next_status(input: &str) -> Result<OrderStatus, ValidationError> {
    if input.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "Status".to_string(),
        });
    }
    input.parse()
}

pub async fn update_order_status<K: KeySource, W: Write>(
    console: &mut Console<K, W>,
    db: &Database,
) -> AppResult<()> {
    console.title("UPDATE ORDER STATUS")?;
    console.hint("Press ESC any time to cancel")?;
    console.blank()?;

    let order_id = prompt_existing(console, db, Record::Order).await?;
    let order = db
        .orders()
        .get_by_id(order_id)
        .await?
        .ok_or_else(|| AppError::not_found("Order", order_id))?;

    console.line(&format!("Current status: {}", order.status))?;

    let allowed: Vec<&str> = OrderStatus::ALL
        .iter()
        .filter(|s| order.status.can_transition_to(**s))
        .map(|s| s.as_str())
        .collect();
    if allowed.is_empty() {
        return console.hint(&format!(
            "Order {} is {} and cannot move any further.",
            order_id, order.status
        ));
    }

    let label = format!("New status ({})", allowed.join("/"));
    let next = loop {
        let next = console.prompt(&label, next_status)?;
        if order.status.can_transition_to(next) {
            break next;
        }
        console.error(&format!(
            "Order status cannot change from {} to {}",
            order.status, next
        ))?;
    };

    let status = db.orders().update_status(order_id, next).await?;
    console.success(&format!("Order {} is now {}", order_id, status))
}

pub async fn delete_order<K: KeySource, W: Write>(
    console: &mut Console<K, W>,
    db: &Database,
) -> AppResult<()> {
    console.title("DELETE ORDER")?;
    console.hint("Press ESC any time to cancel")?;
    console.blank()?;

    let order_id = prompt_existing(console, db, Record::Order).await?;

    if !console.confirm(&format!(
        "Delete order {} and its items? Product stock will be restored.",
        order_id
    ))? {
        return console.hint("Nothing was deleted.");
    }

    db.orders().delete(order_id).await?;
    console.success(&format!("Order {} deleted", order_id))
}
