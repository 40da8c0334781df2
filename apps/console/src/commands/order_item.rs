//! # Order Item Commands
//!
//! Order lines. A line sells a catalog product, describes a free-text
//! service, or both; product lines move stock.
//!
//! ## Create Flow
//! ```text
//! Order ID
//!    │
//!    ▼
//! Product ID (optional) ──► must exist and be in stock
//! Description (optional)
//!    │
//!    ├── neither given ──► ⚠️ and back to the menu, nothing saved
//!    ▼
//! Quantity ──► re-asked while above current stock
//! Unit price ──► empty keeps the product's price
//! ```

use std::io::Write;
use tracing::info;

use crate::commands::{prompt_existing, Record};
use crate::error::AppResult;
use crate::state::ConfigState;
use crate::terminal::{Console, KeySource, Table};
use order_core::{validation, CoreError, Money, NewOrderItem, Product, ValidationError};
use order_db::Database;

/// Asks for the product and the description.
///
/// A bad product id is asked again; a line with neither ends the flow.
async fn read_reference<K: KeySource, W: Write>(
    console: &mut Console<K, W>,
    db: &Database,
) -> AppResult<(Option<Product>, Option<String>)> {
    let product = loop {
        let Some(id) = console.prompt("Product ID (leave empty for none)", |s| {
            validation::optional_record_id("Product ID", s)
        })?
        else {
            break None;
        };

        match db.products().get_by_id(id).await? {
            None => console.error(&format!("Product with ID {} does not exist", id))?,
            Some(product) if product.stock <= 0 => {
                console.error(&CoreError::OutOfStock { product_id: id }.to_string())?
            }
            Some(product) => {
                console.hint(&format!("{}, in stock: {}", product.name, product.stock))?;
                break Some(product);
            }
        }
    };

    let description = console.prompt(
        "Description (optional, max 25 characters)",
        validation::description,
    )?;

    validation::item_reference(product.as_ref().map(|p| p.id), description.as_deref())?;
    Ok((product, description))
}

pub async fn create_order_item<K: KeySource, W: Write>(
    console: &mut Console<K, W>,
    db: &Database,
    config: &ConfigState,
) -> AppResult<()> {
    console.title("CREATE ORDER ITEM")?;
    console.hint("Press ESC any time to cancel")?;
    console.blank()?;

    let order_id = prompt_existing(console, db, Record::Order).await?;
    let (product, description) = read_reference(console, db).await?;

    let quantity = loop {
        let quantity = console.prompt("Quantity", validation::quantity)?;
        match &product {
            Some(p) => match p.check_stock(quantity) {
                Ok(()) => break quantity,
                Err(e) => console.error(&e.to_string())?,
            },
            None => break quantity,
        }
    };

    let unit_price = match &product {
        Some(p) => {
            let default = p.unit_price;
            console.prompt(
                &format!("Unit price [Default: {}]", config.format_price(default)),
                |s: &str| -> Result<Money, ValidationError> {
                    if s.trim().is_empty() {
                        Ok(default)
                    } else {
                        validation::unit_price(s)
                    }
                },
            )?
        }
        None => console.prompt("Unit price", validation::unit_price)?,
    };

    let item = NewOrderItem::new(
        order_id,
        product.as_ref().map(|p| p.id),
        description,
        quantity,
        unit_price,
    )?;
    let id = db.order_items().insert(&item).await?;

    info!(id, order_id, "Order item created from console");
    console.blank()?;
    console.success(&format!(
        "Order item {} added to order {} (total {})",
        id,
        order_id,
        config.format_price(item.line_total())
    ))
}

pub async fn show_order_items<K: KeySource, W: Write>(
    console: &mut Console<K, W>,
    db: &Database,
    config: &ConfigState,
) -> AppResult<()> {
    console.title("ORDER ITEMS")?;

    let mut table = Table::new(&[
        ("Order", 5),
        ("Customer", 20),
        ("Date", 10),
        ("Status", 9),
        ("Item ID", 7),
        ("Product", 15),
        ("Description", 25),
        ("Quantity", 8),
        ("Unit Price", 10),
        ("Total Price", 12),
    ]);
    for row in db.order_items().overview().await? {
        table.push_row(vec![
            row.order_id.to_string(),
            row.customer_name,
            row.order_date.format("%Y-%m-%d").to_string(),
            row.status.to_string(),
            row.order_item_id.to_string(),
            row.product_name.unwrap_or_default(),
            row.description.unwrap_or_default(),
            row.quantity.to_string(),
            config.format_price(row.unit_price),
            config.format_price(row.total_price),
        ]);
    }

    console.table(&table)
}

/// Deletes one line; a product line's quantity goes back to stock.
pub async fn delete_order_item<K: KeySource, W: Write>(
    console: &mut Console<K, W>,
    db: &Database,
) -> AppResult<()> {
    console.title("DELETE ORDER ITEM")?;
    console.hint("Press ESC any time to cancel")?;
    console.blank()?;

    let item_id = prompt_existing(console, db, Record::OrderItem).await?;

    if !console.confirm(&format!("Delete order item {}?", item_id))? {
        return console.hint("Nothing was deleted.");
    }

    db.order_items().delete(item_id).await?;
    console.success(&format!("Order item {} deleted", item_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::*;
    use crate::error::ErrorCode;
    use order_core::{NewCustomer, NewOrder, NewProduct};

    /// Alice with one empty order, plus a Widget at 9.99 with 10 in stock.
    async fn fixture(db: &Database) -> (i64, i64) {
        let customer_id = db
            .customers()
            .insert(&NewCustomer {
                name: "Alice Smith".into(),
                email: "alice@x.com".into(),
                phone: "12345678".into(),
            })
            .await
            .unwrap();
        let order_id = db.orders().insert(&NewOrder::now(customer_id)).await.unwrap();
        let product_id = db
            .products()
            .insert(&NewProduct {
                name: "Widget".into(),
                unit_price: Money::from_cents(999),
                stock: 10,
            })
            .await
            .unwrap();
        (order_id, product_id)
    }

    #[tokio::test]
    async fn test_product_line_takes_stock_and_default_price() {
        let db = database().await;
        let (order_id, product_id) = fixture(&db).await;

        let (order, product) = (order_id.to_string(), product_id.to_string());
        let mut console = console_with(&[order.as_str(), product.as_str(), "", "3", ""]);
        create_order_item(&mut console, &db, &config()).await.unwrap();

        assert_eq!(db.products().stock(product_id).await.unwrap(), 7);
        let items = db.order_items().list_for_order(order_id).await.unwrap();
        assert_eq!(items[0].unit_price, Money::from_cents(999));
        assert_eq!(items[0].line_total().to_string(), "29.97");

        let out = printed(&console);
        assert!(out.contains("in stock: 10"));
        assert!(out.contains("total 29.97 kr"));

        let mut console = console_with(&[]);
        show_order_items(&mut console, &db, &config()).await.unwrap();
        let out = printed(&console);
        assert!(out.contains("Widget"));
        assert!(out.contains("29.97 kr"));
    }

    #[tokio::test]
    async fn test_quantity_above_stock_is_reasked() {
        let db = database().await;
        let (order_id, product_id) = fixture(&db).await;

        let (order, product) = (order_id.to_string(), product_id.to_string());
        let mut console = console_with(&[order.as_str(), product.as_str(), "", "11", "10", "5"]);
        create_order_item(&mut console, &db, &config()).await.unwrap();

        assert!(printed(&console).contains("available 10, requested 11"));
        assert_eq!(db.products().stock(product_id).await.unwrap(), 0);
        let items = db.order_items().list_for_order(order_id).await.unwrap();
        assert_eq!(items[0].unit_price, Money::from_cents(500));
    }

    #[tokio::test]
    async fn test_line_needs_product_or_description() {
        let db = database().await;
        let (order_id, _) = fixture(&db).await;

        let order = order_id.to_string();
        let mut console = console_with(&[order.as_str(), "", ""]);
        let err = create_order_item(&mut console, &db, &config())
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::BusinessLogic);
        assert!(err.message.contains("either a product ID or a description"));
        assert!(db.order_items().list_for_order(order_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_service_line_needs_a_price() {
        let db = database().await;
        let (order_id, _) = fixture(&db).await;

        let order = order_id.to_string();
        let mut console = console_with(&[order.as_str(), "", "Shipping", "1", "", "49"]);
        create_order_item(&mut console, &db, &config()).await.unwrap();

        assert!(printed(&console).contains("Unit price cannot be empty"));
        let items = db.order_items().list_for_order(order_id).await.unwrap();
        assert_eq!(items[0].product_id, None);
        assert_eq!(items[0].description.as_deref(), Some("Shipping"));
        assert_eq!(items[0].unit_price, Money::from_cents(4900));
    }

    #[tokio::test]
    async fn test_out_of_stock_product_is_refused() {
        let db = database().await;
        let (order_id, _) = fixture(&db).await;
        let empty_id = db
            .products()
            .insert(&NewProduct {
                name: "Cable 2m".into(),
                unit_price: Money::from_cents(1500),
                stock: 0,
            })
            .await
            .unwrap();

        let (order, empty) = (order_id.to_string(), empty_id.to_string());
        let mut console =
            console_with(&[order.as_str(), empty.as_str(), "99", "", "Gift wrap", "2", "25"]);
        create_order_item(&mut console, &db, &config()).await.unwrap();

        let out = printed(&console);
        assert!(out.contains("out of stock"));
        assert!(out.contains("Product with ID 99 does not exist"));
        assert_eq!(db.order_items().list_for_order(order_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_order_item_restocks() {
        let db = database().await;
        let (order_id, product_id) = fixture(&db).await;
        let item = NewOrderItem::new(order_id, Some(product_id), None, 4, Money::from_cents(999))
            .unwrap();
        let item_id = db.order_items().insert(&item).await.unwrap();

        let mut console = console_with(&[item_id.to_string().as_str(), "y"]);
        delete_order_item(&mut console, &db).await.unwrap();

        assert!(db.order_items().get_by_id(item_id).await.unwrap().is_none());
        assert_eq!(db.products().stock(product_id).await.unwrap(), 10);
    }
}
