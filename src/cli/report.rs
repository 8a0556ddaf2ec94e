//! Plain-text output for the `check` and `rules` subcommands.

use std::fmt::Write;

use crate::matcher::{Detection, HostMatcher};

/// Describe the outcome of a `check` run.
pub fn render_check(prompt_line: Option<&str>, detection: Option<&Detection>) -> String {
    let mut out = String::new();
    match (prompt_line, detection) {
        (None, _) => out.push_str("no prompt line found\n"),
        (Some(line), None) => {
            let _ = writeln!(out, "prompt:   {line}");
            out.push_str("no prompt pattern matched\n");
        }
        (Some(_), Some(d)) => {
            let _ = writeln!(out, "prompt:   {}", d.prompt_line);
            let _ = writeln!(out, "pattern:  {}", d.prompt_pattern);
            let _ = writeln!(out, "hostname: {}", d.hostname);
            match &d.rule {
                Some(rule) => {
                    let _ = writeln!(out, "profile:  {} (rule {})", d.profile, rule);
                }
                None => {
                    let _ = writeln!(out, "profile:  {} (fallback)", d.profile);
                }
            }
        }
    }
    out
}

/// List the matcher's prompt patterns and profile rules in evaluation order.
pub fn render_rules(matcher: &HostMatcher) -> String {
    let mut out = String::from("prompt patterns:\n");
    for (i, pattern) in matcher.hostnames().patterns().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, pattern);
    }

    out.push_str("profile rules:\n");
    let rules = matcher.mapping().rules();
    if rules.is_empty() {
        out.push_str("  (none)\n");
    }
    for (i, rule) in rules.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, rule);
    }

    let _ = writeln!(out, "fallback: {}", matcher.mapping().fallback());
    out
}
