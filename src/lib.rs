// Library exports for the plugin and the `host-watch` CLI.
//
// The plugin is host-agnostic: a terminal application implements the traits
// in `host` and drives a `watcher::HostWatch` from its content-change events.

/// Application version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod debug;

pub mod cli;
pub mod host;
pub mod hostname;
pub mod matcher;
pub mod profile;
pub mod prompt;
pub mod screen;
pub mod watcher;

pub use host_watch_config as config;

pub use host::{HostError, TargetHost, TerminalView, WatchTarget};
pub use matcher::{Detection, HostMatcher};
pub use profile::{ProfileMapping, Resolution};
pub use prompt::PromptExtractor;
pub use screen::ScreenSnapshot;
pub use watcher::{HostWatch, MatcherState};
