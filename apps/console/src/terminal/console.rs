//! # Console
//!
//! Output helpers and the line editor used by every prompt.
//!
//! ## Prompt Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  prompt("Email", validation::email)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  "Email: " ──► read_line ──┬── Esc ─────────► Err(cancelled)           │
//! │       ▲                    │                                            │
//! │       │                    └── Enter ──► parse(text)                    │
//! │       │                                     │                           │
//! │       └──── ⚠️ error message ◄── Err ───────┤                           │
//! │                                             │                           │
//! │                                   Ok(value) ▼                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Raw mode does not translate `\n`, so every line ends with `\r\n`.

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use std::fmt::Display;
use std::io::{self, Stdout, Write};
use unicode_width::UnicodeWidthChar;

use crate::error::{AppError, AppResult};
use crate::terminal::keys::{CrosstermKeys, Key, KeySource};
use crate::terminal::table::{center_text, LineKind, Table};
use order_core::validation;

/// Width assumed when the terminal size cannot be queried.
const FALLBACK_WIDTH: u16 = 120;

const RULE: &str = "═══════════════════════════════════════";

/// Terminal front end: a key source plus an output stream.
pub struct Console<K, W> {
    keys: K,
    out: W,
    width: Option<u16>,
}

impl Console<CrosstermKeys, Stdout> {
    /// Console on the process terminal.
    pub fn stdout() -> Self {
        Console::new(CrosstermKeys, io::stdout())
    }
}

impl<K: KeySource, W: Write> Console<K, W> {
    pub fn new(keys: K, out: W) -> Self {
        Console {
            keys,
            out,
            width: None,
        }
    }

    /// Pins the width instead of asking the terminal.
    pub fn with_width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Current terminal width, re-read on every call so resizes are honored.
    pub fn width(&self) -> u16 {
        self.width.unwrap_or_else(|| {
            terminal::size()
                .map(|(columns, _)| columns)
                .unwrap_or(FALLBACK_WIDTH)
        })
    }

    // =========================================================================
    // Output
    // =========================================================================

    pub fn clear(&mut self) -> AppResult<()> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        self.out.flush()?;
        Ok(())
    }

    pub fn line(&mut self, text: &str) -> AppResult<()> {
        queue!(self.out, Print(text), Print("\r\n"))?;
        self.out.flush()?;
        Ok(())
    }

    pub fn blank(&mut self) -> AppResult<()> {
        self.line("")
    }

    pub fn colored(&mut self, text: &str, color: Color) -> AppResult<()> {
        queue!(
            self.out,
            SetForegroundColor(color),
            Print(text),
            ResetColor,
            Print("\r\n")
        )?;
        self.out.flush()?;
        Ok(())
    }

    /// Colored line centered against the terminal width.
    pub fn centered(&mut self, text: &str, color: Color) -> AppResult<()> {
        let width = usize::from(self.width().saturating_sub(1));
        let text = center_text(text, width.max(text.chars().count()));
        self.colored(&text, color)
    }

    /// Screen heading between two rules.
    pub fn title(&mut self, title: &str) -> AppResult<()> {
        self.blank()?;
        self.centered(RULE, Color::DarkCyan)?;
        self.centered(title, Color::Cyan)?;
        self.centered(RULE, Color::DarkCyan)?;
        self.blank()
    }

    pub fn error(&mut self, message: &str) -> AppResult<()> {
        self.colored(&format!("⚠️  {}", message), Color::Red)
    }

    pub fn success(&mut self, message: &str) -> AppResult<()> {
        self.colored(&format!("✅ {}", message), Color::Green)
    }

    pub fn hint(&mut self, message: &str) -> AppResult<()> {
        self.colored(message, Color::DarkGrey)
    }

    /// Writes a rendered table, one color per line kind.
    pub fn table(&mut self, table: &Table) -> AppResult<()> {
        for line in table.render(usize::from(self.width())) {
            let color = match line.kind {
                LineKind::Border | LineKind::Placeholder => Color::DarkGrey,
                LineKind::Header => Color::Cyan,
                LineKind::Row => Color::White,
            };
            self.colored(&line.text, color)?;
        }
        Ok(())
    }

    // =========================================================================
    // Input
    // =========================================================================

    pub fn read_key(&mut self) -> AppResult<Key> {
        Ok(self.keys.next_key()?)
    }

    /// Line editor: printable keys append, Backspace deletes, Enter submits.
    ///
    /// ## Errors
    /// Escape or Ctrl+C returns [`AppError::cancelled`].
    pub fn read_line(&mut self) -> AppResult<String> {
        let mut input = String::new();

        loop {
            match self.read_key()? {
                Key::Enter => {
                    self.line("")?;
                    return Ok(input);
                }
                Key::Esc | Key::Interrupt => {
                    self.line("")?;
                    return Err(AppError::cancelled());
                }
                Key::Backspace => {
                    // Wide chars take two cells, combining marks none
                    if let Some(cells) = input.pop().map(|c| c.width().unwrap_or(0)) {
                        let back = "\u{8}".repeat(cells);
                        queue!(self.out, Print(&back), Print(" ".repeat(cells)), Print(&back))?;
                        self.out.flush()?;
                    }
                }
                Key::Char(c) => {
                    input.push(c);
                    queue!(self.out, Print(c))?;
                    self.out.flush()?;
                }
                Key::Up | Key::Down | Key::Other => {}
            }
        }
    }

    /// Prints `label: ` and reads one line.
    pub fn ask(&mut self, label: &str) -> AppResult<String> {
        queue!(self.out, Print(label), Print(": "))?;
        self.out.flush()?;
        self.read_line()
    }

    /// Asks until `parse` accepts the input, reporting each rejection.
    pub fn prompt<T, E, F>(&mut self, label: &str, parse: F) -> AppResult<T>
    where
        E: Display,
        F: Fn(&str) -> Result<T, E>,
    {
        loop {
            let input = self.ask(label)?;
            match parse(&input) {
                Ok(value) => return Ok(value),
                Err(e) => self.error(&e.to_string())?,
            }
        }
    }

    /// `y` / `yes` confirms, anything else declines.
    pub fn confirm(&mut self, question: &str) -> AppResult<bool> {
        let answer = self.ask(&format!("{} (y/n)", question))?;
        Ok(validation::yes_no(&answer))
    }

    /// Waits for any key.
    pub fn pause(&mut self) -> AppResult<()> {
        self.blank()?;
        self.hint("Press any key to continue...")?;
        self.read_key()?;
        Ok(())
    }
}

/// Enables raw mode for its lifetime.
///
/// Dropping the guard (including while unwinding from an error) restores
/// the terminal, shows the cursor and clears the screen.
#[derive(Debug)]
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    pub fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(RawModeGuard { _private: () })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let mut out = io::stdout();
        let _ = queue!(
            out,
            ResetColor,
            Clear(ClearType::All),
            MoveTo(0, 0),
            crossterm::cursor::Show
        );
        let _ = out.flush();
        let _ = terminal::disable_raw_mode();
    }
}
