//! # State Module
//!
//! State shared by every console flow.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  run()                                                                  │
//! │   ├── ConfigState::from_env()   paths, currency                        │
//! │   └── Database::new(...)        one connection for the session         │
//! │            │                                                            │
//! │            ▼                                                            │
//! │  every flow receives (&mut Console, &Database, &ConfigState)           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is global: both values are created in `run` and passed down.

mod config;

pub use config::{ConfigState, DATABASE_FILE, LOG_FILE};
