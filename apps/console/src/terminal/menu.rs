//! # Main Menu
//!
//! Vertical command list driven by the arrow keys.
//!
//! ```text
//!        --- CUSTOMER ---           ◄── header, never selectable
//!   >>> CREATE CUSTOMER     <<<     ◄── highlight
//!       SHOW CUSTOMERS
//!       ...
//!                                   ◄── separator, never selectable
//!        --- PRODUCT ---
//!       ...
//!       EXIT
//! ```
//!
//! Up/Down wrap around and skip headers and separators; Enter yields the
//! highlighted [`Action`].

use crossterm::style::Color;
use std::io::Write;

use crate::error::AppResult;
use crate::terminal::console::Console;
use crate::terminal::keys::{Key, KeySource};

/// Everything the menu can dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateCustomer,
    ShowCustomers,
    DeleteCustomer,
    AddAddress,
    ShowAddresses,
    CreateProduct,
    ShowProducts,
    DeleteProduct,
    CreateOrder,
    ShowOrders,
    UpdateOrderStatus,
    DeleteOrder,
    CreateOrderItem,
    ShowOrderItems,
    DeleteOrderItem,
    Exit,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::CreateCustomer => "CREATE CUSTOMER",
            Action::ShowCustomers => "SHOW CUSTOMERS",
            Action::DeleteCustomer => "DELETE CUSTOMER",
            Action::AddAddress => "ADD ADDRESS TO CUSTOMER",
            Action::ShowAddresses => "SHOW ADDRESSES",
            Action::CreateProduct => "CREATE PRODUCT",
            Action::ShowProducts => "SHOW PRODUCTS",
            Action::DeleteProduct => "DELETE PRODUCT",
            Action::CreateOrder => "CREATE ORDER",
            Action::ShowOrders => "SHOW ORDERS",
            Action::UpdateOrderStatus => "UPDATE ORDER STATUS",
            Action::DeleteOrder => "DELETE ORDER",
            Action::CreateOrderItem => "CREATE ORDER ITEM",
            Action::ShowOrderItems => "SHOW ORDER ITEMS",
            Action::DeleteOrderItem => "DELETE ORDER ITEM",
            Action::Exit => "EXIT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    Header(&'static str),
    Separator,
    Item(Action),
}

impl MenuEntry {
    fn is_selectable(&self) -> bool {
        matches!(self, MenuEntry::Item(_))
    }
}

/// Menu entries plus the highlighted position.
#[derive(Debug, Clone)]
pub struct Menu {
    entries: Vec<MenuEntry>,
    position: usize,
}

impl Menu {
    /// Builds a menu with the highlight on the first selectable entry.
    pub fn new(entries: Vec<MenuEntry>) -> Self {
        let position = entries
            .iter()
            .position(MenuEntry::is_selectable)
            .unwrap_or(0);
        Menu { entries, position }
    }

    /// The application's main menu.
    pub fn main() -> Self {
        use Action::*;
        use MenuEntry::{Header, Item, Separator};

        Menu::new(vec![
            Header("--- CUSTOMER ---"),
            Item(CreateCustomer),
            Item(ShowCustomers),
            Item(DeleteCustomer),
            Item(AddAddress),
            Item(ShowAddresses),
            Separator,
            Header("--- PRODUCT ---"),
            Item(CreateProduct),
            Item(ShowProducts),
            Item(DeleteProduct),
            Separator,
            Header("--- ORDER ---"),
            Item(CreateOrder),
            Item(ShowOrders),
            Item(UpdateOrderStatus),
            Item(DeleteOrder),
            Separator,
            Header("--- ORDER ITEM ---"),
            Item(CreateOrderItem),
            Item(ShowOrderItems),
            Item(DeleteOrderItem),
            Separator,
            Item(Exit),
        ])
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn selected(&self) -> Option<Action> {
        match self.entries.get(self.position) {
            Some(MenuEntry::Item(action)) => Some(*action),
            _ => None,
        }
    }

    pub fn move_down(&mut self) {
        self.step(1);
    }

    pub fn move_up(&mut self) {
        self.step(self.entries.len().saturating_sub(1));
    }

    /// Advances by `offset` (mod len) until a selectable entry is reached.
    fn step(&mut self, offset: usize) {
        let len = self.entries.len();
        if !self.entries.iter().any(MenuEntry::is_selectable) {
            return;
        }
        loop {
            self.position = (self.position + offset) % len;
            if self.entries[self.position].is_selectable() {
                break;
            }
        }
    }

    /// Applies a key press; returns the action to run, if any.
    ///
    /// Ctrl+C at the menu means Exit.
    pub fn handle(&mut self, key: Key) -> Option<Action> {
        match key {
            Key::Up => {
                self.move_up();
                None
            }
            Key::Down => {
                self.move_down();
                None
            }
            Key::Enter => self.selected(),
            Key::Interrupt => Some(Action::Exit),
            _ => None,
        }
    }

    /// Draws the whole menu screen.
    pub fn draw<K: KeySource, W: Write>(&self, console: &mut Console<K, W>) -> AppResult<()> {
        console.title("ORDER SYSTEM")?;
        console.centered(
            "Use ↑ and ↓ arrow keys to navigate and Enter to select.",
            Color::White,
        )?;
        console.blank()?;

        for (index, entry) in self.entries.iter().enumerate() {
            match entry {
                MenuEntry::Header(text) => console.centered(text, Color::Blue)?,
                MenuEntry::Separator => console.blank()?,
                MenuEntry::Item(action) if index == self.position => {
                    console.centered(&format!(">>> {:<25} <<<", action.label()), Color::Cyan)?
                }
                MenuEntry::Item(action) => {
                    console.centered(&format!("    {:<25}    ", action.label()), Color::DarkGrey)?
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::keys::ScriptedKeys;

    #[test]
    fn test_starts_on_first_item() {
        let menu = Menu::main();
        assert_eq!(menu.selected(), Some(Action::CreateCustomer));
        assert_eq!(menu.position(), 1);
    }

    #[test]
    fn test_down_skips_separator_and_header() {
        let mut menu = Menu::main();
        for _ in 0..4 {
            menu.move_down();
        }
        assert_eq!(menu.selected(), Some(Action::ShowAddresses));

        menu.move_down();
        assert_eq!(menu.selected(), Some(Action::CreateProduct));
    }

    #[test]
    fn test_wraps_both_ways() {
        let mut menu = Menu::main();
        menu.move_up();
        assert_eq!(menu.selected(), Some(Action::Exit));

        menu.move_down();
        assert_eq!(menu.selected(), Some(Action::CreateCustomer));
    }

    #[test]
    fn test_never_lands_on_non_selectable() {
        let mut menu = Menu::main();
        let len = menu.entries().len();

        for _ in 0..(len * 2) {
            menu.move_down();
            assert!(menu.selected().is_some());
        }
        for _ in 0..(len * 3) {
            menu.move_up();
            assert!(menu.selected().is_some());
        }
    }

    #[test]
    fn test_handle_keys() {
        let mut menu = Menu::main();

        assert_eq!(menu.handle(Key::Down), None);
        assert_eq!(menu.handle(Key::Char('x')), None);
        assert_eq!(menu.handle(Key::Enter), Some(Action::ShowCustomers));
        assert_eq!(menu.handle(Key::Interrupt), Some(Action::Exit));
    }

    #[test]
    fn test_menu_without_items_stays_put() {
        let mut menu = Menu::new(vec![MenuEntry::Header("only"), MenuEntry::Separator]);
        menu.move_down();
        menu.move_up();
        assert_eq!(menu.position(), 0);
        assert_eq!(menu.selected(), None);
    }

    #[test]
    fn test_draw_highlights_selection() {
        let mut console = Console::new(ScriptedKeys::new(), Vec::new()).with_width(100);
        let mut menu = Menu::main();
        menu.move_down();

        menu.draw(&mut console).unwrap();

        let out = String::from_utf8_lossy(console.output()).into_owned();
        assert!(out.contains(">>> SHOW CUSTOMERS"));
        assert!(!out.contains(">>> CREATE CUSTOMER"));
        assert!(out.contains("--- ORDER ITEM ---"));
    }
}
