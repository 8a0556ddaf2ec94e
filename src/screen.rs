//! In-memory terminal grid.
//!
//! [`ScreenSnapshot`] implements [`TerminalView`] over a list of rows. The
//! CLI builds one from a text dump; tests build them row by row.
//!
//! Dump format: one grid row per text line. A line ending in a single `\`
//! is a soft-wrapped row (the `\` is dropped and the row gets no line-break
//! marker). Every other row except the last is hard-terminated. The cursor
//! sits on the last row unless set explicitly.

use crate::host::TerminalView;

/// Marker for a soft-wrapped row in a screen dump.
const WRAP_MARKER: char = '\\';

/// One grid row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenRow {
    pub text: String,
    /// Row ends in a hard line break.
    pub line_break: bool,
}

/// A fixed snapshot of a terminal grid and its cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenSnapshot {
    rows: Vec<ScreenRow>,
    columns: usize,
    cursor_row: usize,
}

impl ScreenSnapshot {
    /// Empty grid `columns` wide.
    pub fn new(columns: usize) -> Self {
        Self {
            rows: Vec::new(),
            columns,
            cursor_row: 0,
        }
    }

    /// Parse a screen dump. The grid is as wide as its longest row.
    pub fn from_dump(dump: &str) -> Self {
        let mut screen = Self::new(0);
        for line in dump.lines() {
            match line.strip_suffix(WRAP_MARKER) {
                Some(text) => screen.push_wrapped(text),
                None => screen.push_line(line),
            };
        }

        // The cursor row is still being written to.
        if let Some(last) = screen.rows.last_mut() {
            last.line_break = false;
        }
        screen
    }

    /// Append a hard-terminated row and move the cursor to it.
    pub fn push_line(&mut self, text: &str) -> &mut Self {
        self.push_row(text, true)
    }

    /// Append a soft-wrapped row and move the cursor to it.
    pub fn push_wrapped(&mut self, text: &str) -> &mut Self {
        self.push_row(text, false)
    }

    /// Append the row the cursor sits on (no line-break marker).
    pub fn push_cursor_line(&mut self, text: &str) -> &mut Self {
        self.push_row(text, false)
    }

    fn push_row(&mut self, text: &str, line_break: bool) -> &mut Self {
        self.columns = self.columns.max(text.chars().count());
        self.rows.push(ScreenRow {
            text: text.to_string(),
            line_break,
        });
        self.cursor_row = self.rows.len() - 1;
        self
    }

    /// Place the cursor, clamped to the last row.
    pub fn set_cursor_row(&mut self, row: usize) -> &mut Self {
        self.cursor_row = row.min(self.rows.len().saturating_sub(1));
        self
    }

    pub fn rows(&self) -> &[ScreenRow] {
        &self.rows
    }

    /// Text of `row` between two columns, with `'\n'` appended when the
    /// range reaches the end of a hard-terminated row.
    fn row_slice(&self, row: &ScreenRow, start_col: usize, end_col: usize) -> String {
        let mut text: String = row
            .text
            .chars()
            .skip(start_col)
            .take(end_col.saturating_sub(start_col))
            .collect();
        if row.line_break && end_col >= self.columns {
            text.push('\n');
        }
        text
    }
}

impl TerminalView for ScreenSnapshot {
    fn cursor_row(&self) -> usize {
        self.cursor_row
    }

    fn column_count(&self) -> usize {
        self.columns
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn text_range(
        &self,
        start_row: usize,
        start_col: usize,
        end_row: usize,
        end_col: usize,
    ) -> Option<String> {
        if start_row >= self.rows.len() || end_row < start_row {
            return None;
        }
        let end_row = end_row.min(self.rows.len() - 1);

        let mut text = String::new();
        for (index, row) in self.rows[start_row..=end_row].iter().enumerate() {
            let row_index = start_row + index;
            let from = if row_index == start_row { start_col } else { 0 };
            let to = if row_index == end_row {
                end_col
            } else {
                self.columns
            };
            text.push_str(&self.row_slice(row, from, to));
        }
        Some(text)
    }
}
