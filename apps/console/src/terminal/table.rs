//! # Table Renderer
//!
//! Fixed-width report tables, centered against the terminal.
//!
//! ```text
//!            ---------------------------------------
//!            |  ID   |     Name      |  Unit Price  |
//!            ---------------------------------------
//!            |   1   |    Widget     |   9.99 kr    |
//!            ---------------------------------------
//! ◄─padding─►
//! ```
//!
//! Pure formatting: [`Table::render`] returns lines tagged with their kind
//! and the console decides on colors.

/// Shown in place of rows when a report is empty.
pub const NO_RECORDS: &str = "No records found.";

/// Centers `text` in a field of `width` characters.
///
/// Text longer than the field is cut to fit, so columns never shift.
pub fn center_text(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.chars().take(width).collect();
    }

    let left = (width - len) / 2;
    let right = width - len - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

/// Left margin that centers a table of `table_width` in `term_width`.
pub fn table_padding(table_width: usize, term_width: usize) -> usize {
    term_width.saturating_sub(table_width) / 2
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Border,
    Header,
    Row,
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLine {
    pub kind: LineKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Column {
    title: &'static str,
    width: usize,
}

/// A report table: column specs plus string cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates a table from `(title, width)` column specs.
    pub fn new(columns: &[(&'static str, usize)]) -> Self {
        Table {
            columns: columns
                .iter()
                .map(|&(title, width)| Column { title, width })
                .collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row. Missing cells render blank, extra cells are dropped.
    pub fn push_row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Width of a border line: `"| "` + cells joined by `" | "` + `" |"`.
    pub fn width(&self) -> usize {
        let cells: usize = self.columns.iter().map(|c| c.width).sum();
        cells + 3 * self.columns.len() + 1
    }

    fn format_row<'a>(&self, cells: impl Iterator<Item = &'a str>) -> String {
        let mut cells = cells;
        let formatted: Vec<String> = self
            .columns
            .iter()
            .map(|column| center_text(cells.next().unwrap_or(""), column.width))
            .collect();
        format!("| {} |", formatted.join(" | "))
    }

    /// Renders the table for a terminal `term_width` characters wide.
    pub fn render(&self, term_width: usize) -> Vec<TableLine> {
        let width = self.width();
        let padding = " ".repeat(table_padding(width, term_width));
        let line = |kind, text: String| TableLine {
            kind,
            text: format!("{}{}", padding, text),
        };
        let border = "-".repeat(width);

        let mut lines = vec![
            line(LineKind::Border, border.clone()),
            line(
                LineKind::Header,
                self.format_row(self.columns.iter().map(|c| c.title)),
            ),
            line(LineKind::Border, border.clone()),
        ];

        if self.rows.is_empty() {
            lines.push(line(
                LineKind::Placeholder,
                format!("|{}|", center_text(NO_RECORDS, width.saturating_sub(2))),
            ));
            lines.push(line(LineKind::Border, border));
            return lines;
        }

        for row in &self.rows {
            lines.push(line(
                LineKind::Row,
                self.format_row(row.iter().map(String::as_str)),
            ));
            lines.push(line(LineKind::Border, border.clone()));
        }

        lines
    }
}
