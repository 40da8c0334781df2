//! # Customer Commands
//!
//! Create, list and delete customers.
//!
//! ## Create Flow
//! ```text
//! Name ──► Email (format, then uniqueness) ──► Phone
//!      ──► first address (type, street, city, zip, country)
//!      ──► customer + address saved together, or not at all
//! ```

use std::io::Write;
use tracing::info;

use crate::commands::address::read_address;
use crate::commands::{prompt_existing, Record};
use crate::error::AppResult;
use crate::terminal::{Console, KeySource, Table};
use order_core::{validation, AddressType, NewCustomer};
use order_db::Database;

pub async fn create_customer<K: KeySource, W: Write>(
    console: &mut Console<K, W>,
    db: &Database,
) -> AppResult<()> {
    console.title("CREATE CUSTOMER")?;
    console.hint("Press ESC any time to cancel")?;
    console.blank()?;

    let name = console.prompt("Name", validation::customer_name)?;

    let email = loop {
        let email = console.prompt("Email", validation::email)?;
        if !db.customers().email_exists(&email).await? {
            break email;
        }
        console.error(&format!("A customer with email '{}' already exists", email))?;
    };

    let phone = console.prompt("Phone", validation::phone)?;

    console.blank()?;
    console.line("Address")?;
    let address = read_address(console, &AddressType::ALL)?;

    let customer = NewCustomer { name, email, phone };
    let (customer_id, _) = db
        .customers()
        .insert_with_address(&customer, &address)
        .await?;

    info!(customer_id, "Customer created from console");
    console.blank()?;
    console.success(&format!(
        "Customer '{}' created with ID {}",
        customer.name, customer_id
    ))
}

pub async fn show_customers<K: KeySource, W: Write>(
    console: &mut Console<K, W>,
    db: &Database,
) -> AppResult<()> {
    console.title("CUSTOMERS")?;

    let mut table = Table::new(&[("ID", 5), ("Name", 20), ("Email", 30), ("Phone", 20)]);
    for customer in db.customers().list().await? {
        table.push_row(vec![
            customer.id.to_string(),
            customer.name,
            customer.email,
            customer.phone,
        ]);
    }

    console.table(&table)
}

/// Deletes a customer without orders; their addresses go with them.
pub async fn delete_customer<K: KeySource, W: Write>(
    console: &mut Console<K, W>,
    db: &Database,
) -> AppResult<()> {
    console.title("DELETE CUSTOMER")?;
    console.hint("Press ESC any time to cancel")?;
    console.blank()?;

    let customer_id = prompt_existing(console, db, Record::Customer).await?;

    if db.customers().has_orders(customer_id).await? {
        return console.error(&format!(
            "Customer {} has orders and cannot be deleted. Delete the orders first.",
            customer_id
        ));
    }

    let name = db
        .customers()
        .get_by_id(customer_id)
        .await?
        .map(|c| c.name)
        .unwrap_or_default();

    if !console.confirm(&format!(
        "Delete customer '{}' and their addresses?",
        name
    ))? {
        return console.hint("Nothing was deleted.");
    }

    db.customers().delete(customer_id).await?;
    console.success(&format!("Customer {} deleted", customer_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::*;
    use crate::error::ErrorCode;
    use crate::terminal::keys::{Key, ScriptedKeys};
    use order_core::NewOrder;

    const ALICE: [&str; 8] = [
        "Alice Smith",
        "alice@x.com",
        "12345678",
        "1",
        "Storgatan 1",
        "Uppsala",
        "75310",
        "Sweden",
    ];

    #[tokio::test]
    async fn test_create_customer_with_address() {
        let db = database().await;
        let mut console = console(ScriptedKeys::new().lines(&ALICE));

        create_customer(&mut console, &db).await.unwrap();

        let customers = db.customers().list().await.unwrap();
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].email, "alice@x.com");

        let addresses = db.addresses().list_for_customer(customers[0].id).await.unwrap();
        assert_eq!(addresses.len(), 1);
        assert_eq!(addresses[0].address_type, AddressType::Delivery);
        assert!(printed(&console).contains("created with ID"));
    }

    #[tokio::test]
    async fn test_invalid_fields_are_reasked() {
        let db = database().await;
        let keys = ScriptedKeys::new()
            .lines(&["Al", "Alice Smith"])
            .lines(&["alice-at-x", "alice@x.com"])
            .lines(&["12-34", "12345678"])
            .lines(&["3", "2"])
            .lines(&["Storgatan 1", "Uppsala", "75310", "Sweden"]);
        let mut console = console(keys);

        create_customer(&mut console, &db).await.unwrap();

        let customers = db.customers().list().await.unwrap();
        assert_eq!(customers[0].name, "Alice Smith");
        assert_eq!(customers[0].phone, "12345678");
        let addresses = db.addresses().list_for_customer(customers[0].id).await.unwrap();
        assert_eq!(addresses[0].address_type, AddressType::Billing);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_reasked() {
        let db = database().await;
        create_customer(&mut console(ScriptedKeys::new().lines(&ALICE)), &db)
            .await
            .unwrap();

        let keys = ScriptedKeys::new()
            .lines(&["Other Alice", "ALICE@x.com", "other@x.com", "87654321"])
            .lines(&["2", "Kungsgatan 3", "Uppsala", "75311", "Sweden"]);
        let mut console = console(keys);

        create_customer(&mut console, &db).await.unwrap();

        assert!(printed(&console).contains("already exists"));
        assert_eq!(db.customers().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_escape_mid_flow_saves_nothing() {
        let db = database().await;
        let keys = ScriptedKeys::new()
            .lines(&["Alice Smith", "alice@x.com", "12345678", "1"])
            .text("Storg")
            .key(Key::Esc);
        let mut console = console(keys);

        let err = create_customer(&mut console, &db).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::Cancelled);
        assert_eq!(db.customers().count().await.unwrap(), 0);
        assert!(db.addresses().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_show_customers() {
        let db = database().await;
        let mut console = console(ScriptedKeys::new());
        show_customers(&mut console, &db).await.unwrap();
        assert!(printed(&console).contains("No records found."));

        create_customer(&mut console_with(&ALICE), &db).await.unwrap();
        let mut console = console_with(&[]);
        show_customers(&mut console, &db).await.unwrap();
        let out = printed(&console);
        assert!(out.contains("Alice Smith"));
        assert!(out.contains("alice@x.com"));
    }

    #[tokio::test]
    async fn test_delete_customer() {
        let db = database().await;
        create_customer(&mut console_with(&ALICE), &db).await.unwrap();
        let id = db.customers().list().await.unwrap()[0].id;

        // Declining keeps the customer
        let mut console = console_with(&[id.to_string().as_str(), "n"]);
        delete_customer(&mut console, &db).await.unwrap();
        assert!(db.customers().exists(id).await.unwrap());

        let mut console = console_with(&[id.to_string().as_str(), "y"]);
        delete_customer(&mut console, &db).await.unwrap();
        assert!(!db.customers().exists(id).await.unwrap());
        assert!(db.addresses().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_customer_with_orders_is_refused() {
        let db = database().await;
        create_customer(&mut console_with(&ALICE), &db).await.unwrap();
        let id = db.customers().list().await.unwrap()[0].id;
        db.orders().insert(&NewOrder::now(id)).await.unwrap();

        // No confirmation is asked, so only the id is scripted
        let mut console = console_with(&[id.to_string().as_str()]);
        delete_customer(&mut console, &db).await.unwrap();

        assert!(printed(&console).contains("cannot be deleted"));
        assert!(db.customers().exists(id).await.unwrap());
    }
}
