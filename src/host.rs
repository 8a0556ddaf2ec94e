//! Contracts between the profile watcher and the terminal emulator hosting it.
//!
//! The watcher never sees widget or PTY types. An emulator implements
//! [`TargetHost`] over its live terminals, and each terminal implements
//! [`WatchTarget`] (grid reads plus profile get/set). In tests and in the CLI
//! the in-memory [`ScreenSnapshot`](crate::screen::ScreenSnapshot) stands in
//! for a terminal.
//!
//! # Notes
//!
//! All methods are called synchronously from the host's event dispatch.
//! Implementations must not retain borrows handed out here beyond the call.

use std::fmt;
use std::hash::Hash;

use thiserror::Error;

/// Failures reported by a host while registering or updating a target.
///
/// None of these abort a watch cycle; the watcher logs them and carries on.
#[derive(Debug, Error)]
pub enum HostError {
    /// The terminal was closed between enumeration and use.
    #[error("terminal target no longer exists")]
    TargetGone,

    /// The host has no profile with this name.
    #[error("unknown profile '{0}'")]
    UnknownProfile(String),

    /// The host refused the content-change subscription.
    #[error("content-change subscription failed: {0}")]
    Subscribe(String),
}

/// Read-only view of a terminal's character grid.
///
/// Rows are numbered from 0 at the top of stored scrollback; the cursor row
/// is in the same numbering. Text returned by [`text_range`](Self::text_range)
/// carries a trailing `'\n'` for every row that ends in a hard line break
/// (the end of a command's output or of a prompt line). Soft-wrapped rows
/// carry none. Trailing blank padding may or may not be present.
pub trait TerminalView {
    /// Row holding the cursor.
    fn cursor_row(&self) -> usize;

    /// Width of the grid in columns.
    fn column_count(&self) -> usize;

    /// Number of readable rows (scrollback plus screen). Zero for an empty
    /// buffer.
    fn row_count(&self) -> usize;

    /// Text from `(start_row, start_col)` through `(end_row, end_col)`.
    ///
    /// Returns `None` when `start_row` is outside the buffer.
    fn text_range(
        &self,
        start_row: usize,
        start_col: usize,
        end_row: usize,
        end_col: usize,
    ) -> Option<String>;

    /// Full text of one row.
    fn row_text(&self, row: usize) -> Option<String> {
        self.text_range(row, 0, row, self.column_count())
    }
}

/// A terminal whose display profile can be switched.
pub trait WatchTarget: TerminalView {
    /// Name of the profile currently active on this terminal, if known.
    fn current_profile(&self) -> Option<String>;

    /// Switch this terminal to `profile`.
    fn set_profile(&mut self, profile: &str) -> Result<(), HostError>;
}

/// The emulator side: live terminals, subscriptions and known profiles.
pub trait TargetHost {
    /// Stable identity of a terminal for as long as it is alive.
    type Id: Copy + Eq + Hash + fmt::Debug;

    /// Handle returned by [`subscribe`](Self::subscribe), given back on
    /// [`unsubscribe`](Self::unsubscribe).
    type Subscription;

    type Target: WatchTarget;

    /// Every live terminal, in the host's enumeration order.
    fn target_ids(&self) -> Vec<Self::Id>;

    fn target_mut(&mut self, id: Self::Id) -> Option<&mut Self::Target>;

    /// Ask to be notified when `id`'s content changes.
    fn subscribe(&mut self, id: Self::Id) -> Result<Self::Subscription, HostError>;

    /// Release a subscription. Called for closed terminals and on detach.
    fn unsubscribe(&mut self, id: Self::Id, subscription: Self::Subscription);

    /// Profile names known to the host, in its listing order.
    fn profile_names(&self) -> Vec<String>;
}
