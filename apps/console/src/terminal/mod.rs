//! # Terminal Module
//!
//! Everything that touches the screen or the keyboard.
//!
//! - [`keys`] - `Key`, the `KeySource` trait and the crossterm reader
//! - [`console`] - colored output, the line editor and prompt loops
//! - [`menu`] - the arrow-key main menu
//! - [`table`] - pure fixed-width table formatting

pub mod console;
pub mod keys;
pub mod menu;
pub mod table;

pub use console::{Console, RawModeGuard};
pub use keys::{CrosstermKeys, Key, KeySource};
pub use menu::{Action, Menu, MenuEntry};
pub use table::{center_text, table_padding, Table, NO_RECORDS};
