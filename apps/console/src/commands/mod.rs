//! # Commands Module
//!
//! One async flow per menu action.
//!
//! ## Flow Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  title ──► prompts (re-ask in place on bad input)                      │
//! │              │                                                          │
//! │              ├── Esc anywhere ──► AppError::cancelled(), nothing saved │
//! │              ▼                                                          │
//! │           repository call(s) ──► ✅ message                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every flow takes the console, the database handle and the configuration
//! explicitly:
//! ```rust,ignore
//! async fn create_product<K, W>(console: &mut Console<K, W>, db: &Database, config: &ConfigState) -> AppResult<()>
//! ```

pub mod address;
pub mod customer;
pub mod order;
pub mod order_item;
pub mod product;

use std::io::Write;

use crate::error::AppResult;
use crate::state::ConfigState;
use crate::terminal::{Action, Console, KeySource};
use order_core::validation;
use order_db::Database;

/// Runs the flow bound to a menu action.
///
/// `Action::Exit` is handled by the session loop and is a no-op here.
pub async fn dispatch<K: KeySource, W: Write>(
    action: Action,
    console: &mut Console<K, W>,
    db: &Database,
    config: &ConfigState,
) -> AppResult<()> {
    match action {
        Action::CreateCustomer => customer::create_customer(console, db).await,
        Action::ShowCustomers => customer::show_customers(console, db).await,
        Action::DeleteCustomer => customer::delete_customer(console, db).await,
        Action::AddAddress => address::add_address(console, db).await,
        Action::ShowAddresses => address::show_addresses(console, db).await,
        Action::CreateProduct => product::create_product(console, db, config).await,
        Action::ShowProducts => product::show_products(console, db, config).await,
        Action::DeleteProduct => product::delete_product(console, db).await,
        Action::CreateOrder => order::create_order(console, db).await,
        Action::ShowOrders => order::show_orders(console, db, config).await,
        Action::UpdateOrderStatus => order::update_order_status(console, db).await,
        Action::DeleteOrder => order::delete_order(console, db).await,
        Action::CreateOrderItem => order_item::create_order_item(console, db, config).await,
        Action::ShowOrderItems => order_item::show_order_items(console, db, config).await,
        Action::DeleteOrderItem => order_item::delete_order_item(console, db).await,
        Action::Exit => Ok(()),
    }
}

/// Tables whose ids the operator types in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Record {
    Customer,
    Product,
    Order,
    OrderItem,
}

impl Record {
    fn name(&self) -> &'static str {
        match self {
            Record::Customer => "Customer",
            Record::Product => "Product",
            Record::Order => "Order",
            Record::OrderItem => "Order item",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Record::Customer => "Customer ID",
            Record::Product => "Product ID",
            Record::Order => "Order ID",
            Record::OrderItem => "Order item ID",
        }
    }

    async fn exists(&self, db: &Database, id: i64) -> AppResult<bool> {
        let found = match self {
            Record::Customer => db.customers().exists(id).await?,
            Record::Product => db.products().exists(id).await?,
            Record::Order => db.orders().exists(id).await?,
            Record::OrderItem => db.order_items().get_by_id(id).await?.is_some(),
        };
        Ok(found)
    }
}

/// Asks for the id of an existing record, re-asking until one is found.
pub(crate) async fn prompt_existing<K: KeySource, W: Write>(
    console: &mut Console<K, W>,
    db: &Database,
    record: Record,
) -> AppResult<i64> {
    loop {
        let id = console.prompt(record.label(), |s| validation::record_id(record.label(), s))?;
        if record.exists(db, id).await? {
            return Ok(id);
        }
        console.error(&format!("{} with ID {} does not exist", record.name(), id))?;
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::state::ConfigState;
    use crate::terminal::keys::ScriptedKeys;
    use crate::terminal::Console;
    use order_db::{Database, DbConfig};

    pub type TestConsole = Console<ScriptedKeys, Vec<u8>>;

    pub async fn database() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    pub fn config() -> ConfigState {
        ConfigState::from_lookup(|_| None)
    }

    pub fn console(keys: ScriptedKeys) -> TestConsole {
        Console::new(keys, Vec::new()).with_width(160)
    }

    /// Console that will type `lines`, each followed by Enter.
    pub fn console_with(lines: &[&str]) -> TestConsole {
        console(ScriptedKeys::new().lines(lines))
    }

    pub fn printed(console: &TestConsole) -> String {
        String::from_utf8_lossy(console.output()).into_owned()
    }
}
