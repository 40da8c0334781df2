//! # Order System Console Library
//!
//! Everything behind the `order-system` binary: startup, the menu session
//! and the flows it dispatches to.
//!
//! ## Module Organization
//! ```text
//! order_console/
//! ├── lib.rs          ◄─── You are here (startup & session loop)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   └── config.rs   ◄─── Paths and currency
//! ├── terminal/
//! │   ├── keys.rs     ◄─── Key events and the KeySource seam
//! │   ├── console.rs  ◄─── Output helpers, line editor, prompts
//! │   ├── menu.rs     ◄─── Arrow-key main menu
//! │   └── table.rs    ◄─── Fixed-width report tables
//! ├── commands/
//! │   ├── mod.rs      ◄─── Dispatch and shared id prompt
//! │   ├── customer.rs
//! │   ├── address.rs
//! │   ├── product.rs
//! │   ├── order.rs
//! │   └── order_item.rs
//! └── error.rs        ◄─── AppError for the flows
//! ```
//!
//! ## Session Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  clear ──► draw menu ──► key                                            │
//! │    ▲                      │                                             │
//! │    │            ↑/↓ ──────┤ (redraw)                                    │
//! │    │                      │ Enter                                       │
//! │    │                      ▼                                             │
//! │    │               dispatch(action)                                     │
//! │    │                      │                                             │
//! │    │   Ok ───────────────┤                                              │
//! │    │   Cancelled ────────┤ "Operation cancelled..."                     │
//! │    │   other error ──────┤ ⚠️ message                                   │
//! │    │                      ▼                                             │
//! │    └────────────── "Press any key to continue..."                      │
//! │                                                                         │
//! │  EXIT or Ctrl+C at the menu ──► farewell ──► return                    │
//! │  terminal failure ─────────────► return Err                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod state;
pub mod terminal;

use anyhow::Context;
use crossterm::style::Color;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use error::AppResult;
use order_db::{Database, DbConfig};
use state::ConfigState;
use terminal::{Action, Console, KeySource, Menu, RawModeGuard};

/// Runs the application until the operator exits.
///
/// ## Startup Sequence
/// 1. Resolve configuration (`ORDER_SYSTEM_*` variables, then defaults)
/// 2. Start logging to the log file
/// 3. Open the database, apply pending migrations, check it answers
/// 4. Enter raw mode and run the menu session
/// 5. Restore the terminal and close the pool
pub async fn run() -> anyhow::Result<()> {
    let config = ConfigState::from_env();
    init_tracing(&config.log_path)?;

    info!(db_path = ?config.database_path, "Starting Order System");

    let db = Database::new(DbConfig::new(config.database_path.clone()))
        .await
        .with_context(|| {
            format!(
                "could not open database at {}",
                config.database_path.display()
            )
        })?;
    if !db.health_check().await {
        anyhow::bail!(
            "database at {} does not answer queries",
            config.database_path.display()
        );
    }

    let result = {
        let _raw = RawModeGuard::enable().context("could not switch the terminal to raw mode")?;
        let mut console = Console::stdout();
        run_session(&mut console, &db, &config).await
    };

    db.close().await;
    info!("Order System stopped");

    Ok(result?)
}

/// Menu loop. Returns when the operator exits or the terminal fails.
pub async fn run_session<K: KeySource, W: Write>(
    console: &mut Console<K, W>,
    db: &Database,
    config: &ConfigState,
) -> AppResult<()> {
    let mut menu = Menu::main();

    loop {
        console.clear()?;
        menu.draw(console)?;

        let Some(action) = menu.handle(console.read_key()?) else {
            continue;
        };

        console.clear()?;
        if action == Action::Exit {
            console.blank()?;
            console.centered("Thank you for choosing the Order System App!", Color::Cyan)?;
            console.blank()?;
            console.hint("Press any key to exit...")?;
            console.read_key()?;
            info!("Session ended by operator");
            return Ok(());
        }

        debug!(action = action.label(), "Running menu action");
        match commands::dispatch(action, console, db, config).await {
            Ok(()) => {}
            Err(e) if e.is_cancelled() => {
                console.blank()?;
                console.hint("Operation cancelled. Returning to main menu...")?;
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!(action = action.label(), code = ?e.code, "{}", e.message);
                console.error(&e.message)?;
            }
        }

        console.pause()?;
    }
}

/// Initializes the tracing subscriber, writing to `log_path`.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=order=trace` - Show trace for the order crates only
/// - Default: `info,order=debug,sqlx=warn`
fn init_tracing(log_path: &Path) -> anyhow::Result<()> {
    if let Some(dir) = log_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("could not create log directory {}", dir.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("could not open log file {}", log_path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,order=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("could not initialize logging: {}", e))
}
