//! Default value functions for configuration.
//!
//! Each `default_*` style function here backs a
//! `#[serde(default = "crate::defaults::...")]` attribute on
//! [`HostWatchConfig`](crate::HostWatchConfig).

use crate::config::ReapplyPolicy;

/// Prompt pattern used when none is configured: `user@host`, capturing the
/// word-character run after `@`.
pub const PROMPT_PATTERN: &str = r"[^@]+@(\w+)";

/// Profile applied when nothing matches.
pub const FAILBACK_PROFILE: &str = "default";

// ── Prompt matching ────────────────────────────────────────────────────────

pub fn patterns() -> Vec<String> {
    vec![PROMPT_PATTERN.to_string()]
}

/// At or below this many characters the cursor row is treated as the tail
/// of a wrapped or multi-line prompt.
pub fn prompt_minlen() -> usize {
    3
}

/// Candidate prompt lines shorter than this are ignored.
pub fn line_minlen() -> usize {
    10
}

pub fn max_lookback_rows() -> usize {
    200
}

// ── Profile selection ──────────────────────────────────────────────────────

pub fn failback_profile() -> String {
    FAILBACK_PROFILE.to_string()
}

pub fn reapply() -> ReapplyPolicy {
    ReapplyPolicy::Always
}
