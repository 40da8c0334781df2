//! # Address Commands
//!
//! Adding a second address to a customer and the address report.

use std::io::Write;
use tracing::info;

use crate::commands::{prompt_existing, Record};
use crate::error::AppResult;
use crate::terminal::{Console, KeySource, Table};
use order_core::{validation, AddressType, NewAddress};
use order_db::Database;

/// Reads one address, offering only the `allowed` types.
///
/// With a single allowed type the choice is shown instead of asked.
pub(crate) fn read_address<K: KeySource, W: Write>(
    console: &mut Console<K, W>,
    allowed: &[AddressType],
) -> AppResult<NewAddress> {
    let address_type = match allowed {
        [only] => {
            console.line(&format!("Address type: {}", only))?;
            *only
        }
        _ => loop {
            let chosen = console.prompt(
                "Address type (1 = Delivery, 2 = Billing)",
                validation::address_type_choice,
            )?;
            if allowed.contains(&chosen) {
                break chosen;
            }
            console.error(&format!("The customer already has a {} address", chosen))?;
        },
    };

    Ok(NewAddress {
        address_type,
        street: console.prompt("Street", validation::street)?,
        city: console.prompt("City", validation::city)?,
        zip_code: console.prompt("Zip code", validation::zip_code)?,
        country: console.prompt("Country", validation::country)?,
    })
}

pub async fn add_address<K: KeySource, W: Write>(
    console: &mut Console<K, W>,
    db: &Database,
) -> AppResult<()> {
    console.title("ADD ADDRESS")?;
    console.hint("Press ESC any time to cancel")?;
    console.blank()?;

    let customer_id = prompt_existing(console, db, Record::Customer).await?;

    let missing = db.addresses().types_for_customer(customer_id).await?;
    if missing.is_empty() {
        return console.error(&format!(
            "Customer {} already has both a delivery and a billing address",
            customer_id
        ));
    }

    let address = read_address(console, &missing)?;
    let id = db.addresses().insert(customer_id, &address).await?;

    info!(id, customer_id, "Address added from console");
    console.blank()?;
    console.success(&format!(
        "{} address added to customer {}",
        address.address_type, customer_id
    ))
}

pub async fn show_addresses<K: KeySource, W: Write>(
    console: &mut Console<K, W>,
    db: &Database,
) -> AppResult<()> {
    console.title("ADDRESSES")?;

    let mut table = Table::new(&[
        ("ID", 5),
        ("Customer ID", 12),
        ("Customer Name", 15),
        ("Address Type", 15),
        ("Street", 25),
        ("City", 15),
        ("Zip Code", 12),
        ("Country", 15),
    ]);
    for row in db.addresses().list().await? {
        table.push_row(vec![
            row.id.to_string(),
            row.customer_id.to_string(),
            row.customer_name,
            row.address_type.to_string(),
            row.street,
            row.city,
            row.zip_code,
            row.country,
        ]);
    }

    console.table(&table)
}
