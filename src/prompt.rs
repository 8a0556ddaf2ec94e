//! Prompt line extraction from a terminal grid.
//!
//! The cursor normally sits on the prompt, so the cursor row is the first
//! candidate. Prompts are not always one row, though:
//!
//! ```text
//! [user@host very/long/path] /dev/pts/42      two-line PS1
//! $ _
//!
//! [user@host a/very/long/and/annoying/appl    wrapped PS1
//! ication/path]$ _
//! ```
//!
//! When the cursor row is at or below `prompt_minlen` characters it is taken
//! to be the tail of such a prompt. The extractor then walks upward to the
//! nearest row ending in a line break, the end of the previous command's
//! output, and starts the candidate on the row just below it. A break on the
//! row directly above the cursor instead ends the first line of a two-line
//! prompt, and the walk continues above it. The first display line of the
//! candidate is the prompt line.

use host_watch_config::HostWatchConfig;

use crate::host::TerminalView;

/// Blank cells a host may pad rows with.
const PADDING: &[char] = &[' ', '\0'];

/// Finds the prompt line in a terminal grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptExtractor {
    prompt_minlen: usize,
    line_minlen: usize,
    max_lookback_rows: usize,
}

impl Default for PromptExtractor {
    fn default() -> Self {
        Self::from_config(&HostWatchConfig::default())
    }
}

impl PromptExtractor {
    pub fn new(prompt_minlen: usize, line_minlen: usize, max_lookback_rows: usize) -> Self {
        Self {
            prompt_minlen,
            line_minlen,
            max_lookback_rows,
        }
    }

    pub fn from_config(config: &HostWatchConfig) -> Self {
        Self::new(
            config.prompt_minlen,
            config.line_minlen,
            config.max_lookback_rows,
        )
    }

    /// Return the prompt line shown in `view`, or `None` when there is no
    /// usable candidate.
    pub fn extract<V: TerminalView + ?Sized>(&self, view: &V) -> Option<String> {
        if view.row_count() == 0 {
            return None;
        }

        let columns = view.column_count();
        let cursor = view.cursor_row();
        let current = view.text_range(cursor, 0, cursor, columns)?;
        if current.is_empty() {
            return None;
        }

        let mut candidate = current;
        if display_len(&candidate) <= self.prompt_minlen {
            log::trace!(
                "cursor row {} is within prompt_minlen {}, searching back",
                cursor,
                self.prompt_minlen
            );
            let start = self.prompt_start_row(view, cursor, columns);
            if start < cursor
                && let Some(text) = view.text_range(start, 0, cursor, columns)
            {
                candidate = text;
            }
        }

        let line = candidate.lines().next()?.trim_end_matches(PADDING);
        if line.is_empty() {
            return None;
        }

        let length = line.chars().count();
        if length < self.line_minlen {
            log::trace!(
                "line '{}' too short ({} < {}), ignoring",
                line,
                length,
                self.line_minlen
            );
            return None;
        }

        Some(line.to_string())
    }

    /// First row of the prompt line that the cursor row belongs to.
    ///
    /// When the row above the cursor is soft-wrapped, the cursor row is the
    /// tail of one long prompt line that starts just below the nearest line
    /// break (the end of the previous command's output). When the row above
    /// ends in a break, the cursor row is the second line of a two-line
    /// prompt and the first line is the logical line ending there.
    fn prompt_start_row<V: TerminalView + ?Sized>(
        &self,
        view: &V,
        cursor: usize,
        columns: usize,
    ) -> usize {
        let top = cursor.saturating_sub(self.max_lookback_rows);
        if cursor <= top {
            return cursor;
        }

        let above = cursor - 1;
        let Some(text) = view.text_range(above, 0, above, columns) else {
            return cursor;
        };
        let first_line_end = if text.ends_with('\n') { above } else { cursor };

        match previous_break(view, top, first_line_end, columns) {
            Some(output_end) => output_end + 1,
            None => top,
        }
    }
}

/// Nearest row in `top..below` (searching upward) that ends in a line break.
///
/// An unreadable row ends the search as if it were the top of the buffer.
fn previous_break<V: TerminalView + ?Sized>(
    view: &V,
    top: usize,
    below: usize,
    columns: usize,
) -> Option<usize> {
    for row in (top..below).rev() {
        let text = view.text_range(row, 0, row, columns)?;
        if text.ends_with('\n') {
            return Some(row);
        }
    }
    None
}

/// Characters in a row, ignoring its line-break marker and trailing padding.
fn display_len(row: &str) -> usize {
    row.trim_end_matches(['\n', '\r'])
        .trim_end_matches(PADDING)
        .chars()
        .count()
}
