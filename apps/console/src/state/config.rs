//! # Configuration State
//!
//! Application configuration resolved once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`ORDER_SYSTEM_*`)
//! 2. Defaults (this file), rooted in the platform data directory
//!
//! Read-only after initialization.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use order_core::Money;

/// File name of the SQLite database inside the data directory.
pub const DATABASE_FILE: &str = "order_system.sqlite";

/// File name of the log inside the data directory.
pub const LOG_FILE: &str = "order-system.log";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Log file (the terminal is owned by the UI)
    pub log_path: PathBuf,

    /// Suffix printed after prices, e.g. `kr`
    pub currency: String,
}

impl Default for ConfigState {
    /// Platform data directory defaults.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/com.order-system.order-system/`
    /// - **Windows**: `%APPDATA%\order-system\order-system\data\`
    /// - **Linux**: `~/.local/share/order-system/`
    ///
    /// Falls back to the working directory when no home directory is known.
    fn default() -> Self {
        let data_dir = ProjectDirs::from("com", "order-system", "order-system")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        ConfigState {
            database_path: data_dir.join(DATABASE_FILE),
            log_path: data_dir.join(LOG_FILE),
            currency: "kr".to_string(),
        }
    }
}

impl ConfigState {
    /// Creates a new ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `ORDER_SYSTEM_DB_PATH`: database file
    /// - `ORDER_SYSTEM_LOG`: log file
    /// - `ORDER_SYSTEM_CURRENCY`: price suffix
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ConfigState::default();

        if let Some(path) = lookup("ORDER_SYSTEM_DB_PATH").filter(|p| !p.trim().is_empty()) {
            config.database_path = PathBuf::from(path);
        }

        if let Some(path) = lookup("ORDER_SYSTEM_LOG").filter(|p| !p.trim().is_empty()) {
            config.log_path = PathBuf::from(path);
        }

        if let Some(currency) = lookup("ORDER_SYSTEM_CURRENCY") {
            config.currency = currency.trim().to_string();
        }

        config
    }

    /// Formats a price with two decimals and the currency suffix.
    ///
    /// ```text
    /// 29.97 kr
    /// ```
    pub fn format_price(&self, amount: Money) -> String {
        if self.currency.is_empty() {
            amount.to_string()
        } else {
            format!("{} {}", amount, self.currency)
        }
    }
}
