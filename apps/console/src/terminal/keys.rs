//! # Key Input
//!
//! The few keys the application reacts to, and where they come from.
//!
//! ```text
//! ┌────────────────────┐        ┌──────────────────────┐
//! │ CrosstermKeys      │        │ ScriptedKeys (tests) │
//! │ raw-mode key events│        │ VecDeque<Key>        │
//! └─────────┬──────────┘        └──────────┬───────────┘
//!           └──────────► KeySource ◄───────┘
//!                           │
//!                           ▼
//!                  Console / Menu loop
//! ```

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;

/// A key press, reduced to what the menu and the line editor understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Enter,
    Esc,
    Backspace,
    Char(char),
    /// Ctrl+C. Raw mode swallows the signal, so it arrives as a key.
    Interrupt,
    Other,
}

impl From<KeyEvent> for Key {
    fn from(event: KeyEvent) -> Self {
        match event.code {
            KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
                Key::Interrupt
            }
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Esc,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Char(c) if !c.is_control() => Key::Char(c),
            _ => Key::Other,
        }
    }
}

/// Blocking source of key presses.
pub trait KeySource {
    fn next_key(&mut self) -> io::Result<Key>;
}

/// Reads key presses from the real terminal.
///
/// Expects raw mode to be enabled (see [`RawModeGuard`](super::RawModeGuard)).
#[derive(Debug, Default)]
pub struct CrosstermKeys;

impl KeySource for CrosstermKeys {
    fn next_key(&mut self) -> io::Result<Key> {
        loop {
            // Resize, mouse and focus events are ignored, as are key
            // releases/repeats reported by some platforms.
            if let Event::Key(event) = event::read()? {
                if event.kind == KeyEventKind::Press {
                    return Ok(Key::from(event));
                }
            }
        }
    }
}

/// Pre-recorded key presses.
///
/// Running out of keys is an `UnexpectedEof` error, which ends a session.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScriptedKeys {
    keys: std::collections::VecDeque<Key>,
}

#[cfg(test)]
impl ScriptedKeys {
    pub fn new() -> Self {
        ScriptedKeys::default()
    }

    pub fn key(mut self, key: Key) -> Self {
        self.keys.push_back(key);
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.keys.extend(text.chars().map(Key::Char));
        self
    }

    /// Types `text` and presses Enter.
    pub fn line(self, text: &str) -> Self {
        self.text(text).key(Key::Enter)
    }

    pub fn lines(self, lines: &[&str]) -> Self {
        lines.iter().fold(self, |keys, line| keys.line(line))
    }

    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

#[cfg(test)]
impl KeySource for ScriptedKeys {
    fn next_key(&mut self) -> io::Result<Key> {
        self.keys
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more scripted keys"))
    }
}
