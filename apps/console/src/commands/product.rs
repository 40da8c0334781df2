//! # Product Commands
//!
//! Catalog maintenance: create, list and delete products.
//!
//! A product referenced by any order item stays; the operator is told why
//! before any confirmation is asked.

use std::io::Write;
use tracing::info;

use crate::commands::{prompt_existing, Record};
use crate::error::AppResult;
use crate::state::ConfigState;
use crate::terminal::{Console, KeySource, Table};
use order_core::{validation, NewProduct};
use order_db::Database;

pub async fn create_product<K: KeySource, W: Write>(
    console: &mut Console<K, W>,
    db: &Database,
    config: &ConfigState,
) -> AppResult<()> {
    console.title("CREATE PRODUCT")?;
    console.hint("Press ESC any time to cancel")?;
    console.blank()?;

    let name = loop {
        let name = console.prompt("Name", validation::product_name)?;
        if !db.products().name_exists(&name).await? {
            break name;
        }
        console.error(&format!("A product named '{}' already exists", name))?;
    };

    let unit_price = console.prompt("Unit price", validation::unit_price)?;
    let stock = console.prompt("Stock", validation::stock)?;

    let product = NewProduct {
        name,
        unit_price,
        stock,
    };
    let id = db.products().insert(&product).await?;

    info!(id, "Product created from console");
    console.blank()?;
    console.success(&format!(
        "Product '{}' created with ID {} at {}",
        product.name,
        id,
        config.format_price(product.unit_price)
    ))
}

pub async fn show_products<K: KeySource, W: Write>(
    console: &mut Console<K, W>,
    db: &Database,
    config: &ConfigState,
) -> AppResult<()> {
    console.title("PRODUCTS")?;

    let mut table = Table::new(&[("ID", 5), ("Name", 15), ("Unit Price", 12), ("Stock", 8)]);
    for product in db.products().list().await? {
        table.push_row(vec![
            product.id.to_string(),
            product.name,
            config.format_price(product.unit_price),
            product.stock.to_string(),
        ]);
    }

    console.table(&table)
}

pub async fn delete_product<K: KeySource, W: Write>(
    console: &mut Console<K, W>,
    db: &Database,
) -> AppResult<()> {
    console.title("DELETE PRODUCT")?;
    console.hint("Press ESC any time to cancel")?;
    console.blank()?;

    let product_id = prompt_existing(console, db, Record::Product).await?;

    if db.products().is_referenced(product_id).await? {
        return console.error(&format!(
            "Product {} is used in existing order items and cannot be deleted",
            product_id
        ));
    }

    let name = db
        .products()
        .get_by_id(product_id)
        .await?
        .map(|p| p.name)
        .unwrap_or_default();

    if !console.confirm(&format!("Delete product '{}'?", name))? {
        return console.hint("Nothing was deleted.");
    }

    db.products().delete(product_id).await?;
    console.success(&format!("Product {} deleted", product_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::*;
    use order_core::{Money, NewOrder, NewOrderItem};

    #[tokio::test]
    async fn test_create_product() {
        let db = database().await;
        let mut console = console_with(&["Widget", "9,99", "10"]);

        create_product(&mut console, &db, &config()).await.unwrap();

        let products = db.products().list().await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].unit_price, Money::from_cents(999));
        assert_eq!(products[0].stock, 10);
        assert!(printed(&console).contains("at 9.99 kr"));
    }

    #[tokio::test]
    async fn test_bad_price_and_stock_are_reasked() {
        let db = database().await;
        let mut console = console_with(&["Widget", "free", "0", "12.50", "-1", "ten", "4"]);

        create_product(&mut console, &db, &config()).await.unwrap();

        let product = &db.products().list().await.unwrap()[0];
        assert_eq!(product.unit_price, Money::from_cents(1250));
        assert_eq!(product.stock, 4);
        assert_eq!(printed(&console).matches("⚠️").count(), 4);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_reasked() {
        let db = database().await;
        create_product(&mut console_with(&["Widget", "9.99", "10"]), &db, &config())
            .await
            .unwrap();

        let mut console = console_with(&["WIDGET", "Gadget", "5", "1"]);
        create_product(&mut console, &db, &config()).await.unwrap();

        assert!(printed(&console).contains("already exists"));
        assert_eq!(db.products().list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_show_products_formats_price() {
        let db = database().await;
        create_product(&mut console_with(&["Widget", "9.99", "10"]), &db, &config())
            .await
            .unwrap();

        let mut console = console_with(&[]);
        show_products(&mut console, &db, &config()).await.unwrap();

        let out = printed(&console);
        assert!(out.contains("Widget"));
        assert!(out.contains("9.99 kr"));
    }

    #[tokio::test]
    async fn test_delete_product() {
        let db = database().await;
        create_product(&mut console_with(&["Widget", "9.99", "10"]), &db, &config())
            .await
            .unwrap();
        let id = db.products().list().await.unwrap()[0].id;

        let mut console = console_with(&[id.to_string().as_str(), "y"]);
        delete_product(&mut console, &db).await.unwrap();

        assert!(!db.products().exists(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_referenced_product_is_kept() {
        let db = database().await;
        create_product(&mut console_with(&["Widget", "9.99", "10"]), &db, &config())
            .await
            .unwrap();
        let product_id = db.products().list().await.unwrap()[0].id;
        let customer_id = db
            .customers()
            .insert(&order_core::NewCustomer {
                name: "Alice Smith".into(),
                email: "alice@x.com".into(),
                phone: "12345678".into(),
            })
            .await
            .unwrap();
        let order_id = db.orders().insert(&NewOrder::now(customer_id)).await.unwrap();
        let item = NewOrderItem::new(order_id, Some(product_id), None, 1, Money::from_cents(999))
            .unwrap();
        db.order_items().insert(&item).await.unwrap();

        let mut console = console_with(&[product_id.to_string().as_str()]);
        delete_product(&mut console, &db).await.unwrap();

        assert!(printed(&console).contains("cannot be deleted"));
        assert!(db.products().exists(product_id).await.unwrap());
    }
}
