//! Shared integration test helpers for host-watch.
//!
//! Provides an in-memory terminal host that records every subscription and
//! profile change so watcher behaviour can be asserted without an emulator.
//!
//! ```ignore
//! mod common;
//! use common::{MockHost, prompt_screen};
//! ```

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::collections::HashSet;

use host_watch::host::{HostError, TargetHost, TerminalView, WatchTarget};
use host_watch::screen::ScreenSnapshot;

/// One fake terminal: a grid plus its active profile.
#[derive(Debug, Clone, Default)]
pub struct MockTerminal {
    pub screen: ScreenSnapshot,
    pub profile: Option<String>,
    /// Every profile passed to `set_profile`, including failed ones.
    pub set_calls: Vec<String>,
    /// Make `set_profile` fail with `UnknownProfile`.
    pub reject_profiles: bool,
}

impl MockTerminal {
    pub fn new(screen: ScreenSnapshot) -> Self {
        Self {
            screen,
            ..Self::default()
        }
    }
}

impl TerminalView for MockTerminal {
    fn cursor_row(&self) -> usize {
        self.screen.cursor_row()
    }

    fn column_count(&self) -> usize {
        self.screen.column_count()
    }

    fn row_count(&self) -> usize {
        self.screen.row_count()
    }

    fn text_range(
        &self,
        start_row: usize,
        start_col: usize,
        end_row: usize,
        end_col: usize,
    ) -> Option<String> {
        self.screen.text_range(start_row, start_col, end_row, end_col)
    }
}

impl WatchTarget for MockTerminal {
    fn current_profile(&self) -> Option<String> {
        self.profile.clone()
    }

    fn set_profile(&mut self, profile: &str) -> Result<(), HostError> {
        self.set_calls.push(profile.to_string());
        if self.reject_profiles {
            return Err(HostError::UnknownProfile(profile.to_string()));
        }
        self.profile = Some(profile.to_string());
        Ok(())
    }
}

/// Fake emulator with numbered terminals.
#[derive(Debug, Default)]
pub struct MockHost {
    pub terminals: BTreeMap<u32, MockTerminal>,
    pub profiles: Vec<String>,
    /// Terminals whose subscription request is refused.
    pub refuse_subscribe: HashSet<u32>,
    /// Live subscriptions as `(terminal, handle)`.
    pub subscriptions: Vec<(u32, u64)>,
    pub subscribe_calls: usize,
    pub unsubscribed: Vec<u32>,
    next_handle: u64,
}

impl MockHost {
    pub fn new(profiles: &[&str]) -> Self {
        Self {
            profiles: profiles.iter().map(|p| p.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn add_terminal(&mut self, id: u32, screen: ScreenSnapshot) {
        self.terminals.insert(id, MockTerminal::new(screen));
    }

    pub fn close_terminal(&mut self, id: u32) {
        self.terminals.remove(&id);
    }

    pub fn terminal(&self, id: u32) -> &MockTerminal {
        &self.terminals[&id]
    }

    pub fn terminal_mut(&mut self, id: u32) -> &mut MockTerminal {
        self.terminals.get_mut(&id).expect("terminal exists")
    }

    /// Replace the grid of terminal `id`, as if new output arrived.
    pub fn show(&mut self, id: u32, screen: ScreenSnapshot) {
        self.terminal_mut(id).screen = screen;
    }

    pub fn subscription_count(&self, id: u32) -> usize {
        self.subscriptions.iter().filter(|(t, _)| *t == id).count()
    }
}

impl TargetHost for MockHost {
    type Id = u32;
    type Subscription = u64;
    type Target = MockTerminal;

    fn target_ids(&self) -> Vec<u32> {
        self.terminals.keys().copied().collect()
    }

    fn target_mut(&mut self, id: u32) -> Option<&mut MockTerminal> {
        self.terminals.get_mut(&id)
    }

    fn subscribe(&mut self, id: u32) -> Result<u64, HostError> {
        self.subscribe_calls += 1;
        if self.refuse_subscribe.contains(&id) {
            return Err(HostError::Subscribe(format!("terminal {id} is read-only")));
        }
        self.next_handle += 1;
        self.subscriptions.push((id, self.next_handle));
        Ok(self.next_handle)
    }

    fn unsubscribe(&mut self, id: u32, subscription: u64) {
        self.subscriptions.retain(|entry| *entry != (id, subscription));
        self.unsubscribed.push(id);
    }

    fn profile_names(&self) -> Vec<String> {
        self.profiles.clone()
    }
}

/// A grid with some output above a single-row prompt holding the cursor.
pub fn prompt_screen(prompt: &str) -> ScreenSnapshot {
    let mut screen = ScreenSnapshot::new(80);
    screen
        .push_line("Last login: Mon Oct 12 09:14:02 2026")
        .push_cursor_line(prompt);
    screen
}

/// A grid showing command output with no prompt.
pub fn output_screen() -> ScreenSnapshot {
    let mut screen = ScreenSnapshot::new(80);
    screen
        .push_line("Compiling host-watch v0.3.0")
        .push_cursor_line("    Finished release profile");
    screen
}
