//! # Seed Data Generator
//!
//! Populates a database with demo customers, products and orders.
//!
//! ## Usage
//! ```bash
//! # Seed ./order_system_dev.sqlite with two orders per customer (default)
//! cargo run -p order-db --bin seed
//!
//! # Custom order count per customer
//! cargo run -p order-db --bin seed -- --orders 4
//!
//! # Specify database path
//! cargo run -p order-db --bin seed -- --db ./data/order_system.sqlite
//! ```
//!
//! ## Generated Data
//! - Customers with a delivery address (every other one also gets a billing address)
//! - Products with prices between 4.90 and 249.00 and a mix of stock levels
//! - Orders with one to three lines; some lines are description-only
//!   (shipping, gift wrap) and some orders move on to Paid / Delivered

use chrono::{Duration, Utc};
use std::env;

use order_core::{
    AddressType, Money, NewAddress, NewCustomer, NewOrder, NewOrderItem, NewProduct, OrderStatus,
};
use order_db::{Database, DbConfig};

/// (name, email, phone, street, city, zip, country)
const CUSTOMERS: &[(&str, &str, &str, &str, &str, &str, &str)] = &[
    ("Alice Smith", "alice@example.com", "0701234567", "Storgatan 12", "Stockholm", "11122", "Sweden"),
    ("Bob Jones", "bob@example.com", "0702345678", "Kungsgatan 3", "Uppsala", "75310", "Sweden"),
    ("Carla Berg", "carla@example.com", "0733456789", "Nygatan 45", "Malmö", "21137", "Sweden"),
    ("David Lund", "david@example.com", "0764567890", "Östra vägen 8", "Göteborg", "41101", "Sweden"),
    ("Eva Holm", "eva@example.com", "4798765432", "Karl Johans gate 1", "Oslo", "0154", "Norway"),
    ("Frank Meyer", "frank@example.com", "4915112345", "Hauptstraße 22", "Berlin", "10115", "Germany"),
    ("Greta Nilsson", "greta@example.com", "0725678901", "Drottninggatan 9", "Örebro", "70210", "Sweden"),
    ("Hugo Persson", "hugo@example.com", "0736789012", "Sjövägen 17", "Luleå", "97231", "Sweden"),
];

/// (name, price in minor units, stock)
const PRODUCTS: &[(&str, i64, i64)] = &[
    ("Widget", 999, 120),
    ("Gadget", 2450, 60),
    ("Sprocket", 490, 500),
    ("Gear Set", 12900, 15),
    ("Bolt Pack", 1990, 250),
    ("Hinge", 790, 80),
    ("Spring Kit", 3500, 40),
    ("Toolbox", 24900, 8),
    ("Cable 2m", 1290, 0),
    ("Lamp", 8990, 25),
];

/// Description-only lines: (description, price in minor units)
const SERVICES: &[(&str, i64)] = &[("Shipping", 4900), ("Gift wrap", 2500), ("Assembly", 19900)];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut orders_per_customer: usize = 2;
    let mut db_path = String::from("./order_system_dev.sqlite");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--orders" | "-o" => {
                if i + 1 < args.len() {
                    orders_per_customer = args[i + 1].parse().unwrap_or(2);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Order System Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -o, --orders <N>   Orders per customer (default: 2)");
                println!("  -d, --db <PATH>    Database file path (default: ./order_system_dev.sqlite)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Order System Seed Data Generator");
    println!("===================================");
    println!("Database: {}", db_path);
    println!("Orders per customer: {}", orders_per_customer);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.customers().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} customers", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();

    // Customers
    let mut customer_ids = Vec::with_capacity(CUSTOMERS.len());
    for (idx, (name, email, phone, street, city, zip, country)) in CUSTOMERS.iter().enumerate() {
        let customer = NewCustomer {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
        };
        let mut address = NewAddress {
            address_type: AddressType::Delivery,
            street: street.to_string(),
            city: city.to_string(),
            zip_code: zip.to_string(),
            country: country.to_string(),
        };

        let (customer_id, _) = db.customers().insert_with_address(&customer, &address).await?;

        if idx % 2 == 0 {
            address.address_type = AddressType::Billing;
            db.addresses().insert(customer_id, &address).await?;
        }
        customer_ids.push(customer_id);
    }
    println!("✓ Created {} customers", customer_ids.len());

    // Products
    let mut products = Vec::with_capacity(PRODUCTS.len());
    for (name, cents, stock) in PRODUCTS {
        let product = NewProduct {
            name: name.to_string(),
            unit_price: Money::from_cents(*cents),
            stock: *stock,
        };
        let id = db.products().insert(&product).await?;
        products.push((id, product.unit_price));
    }
    println!("✓ Created {} products", products.len());

    // Orders
    let mut orders = 0;
    let mut lines = 0;
    for (customer_idx, customer_id) in customer_ids.iter().enumerate() {
        for order_idx in 0..orders_per_customer {
            let seed = customer_idx * 7 + order_idx * 3;

            let order_id = db
                .orders()
                .insert(&NewOrder {
                    customer_id: *customer_id,
                    order_date: Utc::now() - Duration::days((seed % 60) as i64),
                    status: OrderStatus::Created,
                })
                .await?;
            orders += 1;

            for line_idx in 0..(1 + seed % 3) {
                let (product_id, unit_price) = products[(seed + line_idx) % products.len()];
                let quantity = 1 + ((seed + line_idx) % 4) as i64;
                let item = NewOrderItem::new(order_id, Some(product_id), None, quantity, unit_price)?;

                match db.order_items().insert(&item).await {
                    Ok(_) => lines += 1,
                    Err(e) => eprintln!("  Skipped line on order {}: {}", order_id, e),
                }
            }

            if seed % 2 == 0 {
                let (description, cents) = SERVICES[seed % SERVICES.len()];
                let item = NewOrderItem::new(
                    order_id,
                    None,
                    Some(description.to_string()),
                    1,
                    Money::from_cents(cents),
                )?;
                db.order_items().insert(&item).await?;
                lines += 1;
            }

            match seed % 3 {
                1 => {
                    db.orders().update_status(order_id, OrderStatus::Paid).await?;
                }
                2 => {
                    db.orders()
                        .update_status(order_id, OrderStatus::Delivered)
                        .await?;
                }
                _ => {}
            }
        }
    }

    let elapsed = start.elapsed();
    println!("✓ Created {} orders with {} lines", orders, lines);
    println!();

    let overview = db.order_items().overview().await?;
    println!("Overview rows: {}", overview.len());
    println!("✓ Seed complete in {:?}", elapsed);

    db.close().await;
    Ok(())
}
