//! Hostname capture from a prompt line.
//!
//! Each configured prompt pattern is anchored at the start of the line and
//! tried in order. The first pattern that matches with a non-empty capture
//! group 1 supplies the hostname.

use host_watch_config::defaults::PROMPT_PATTERN;
use regex::Regex;

/// A compiled prompt pattern and the source it came from.
#[derive(Debug, Clone)]
struct PromptPattern {
    source: String,
    regex: Regex,
}

/// Hostname found in a prompt line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostnameMatch<'a> {
    pub hostname: &'a str,
    /// Source text of the prompt pattern that matched.
    pub pattern: &'a str,
}

/// Ordered prompt patterns.
#[derive(Debug, Clone)]
pub struct HostnameMatcher {
    patterns: Vec<PromptPattern>,
}

impl Default for HostnameMatcher {
    fn default() -> Self {
        Self::new(&[PROMPT_PATTERN.to_string()])
    }
}

impl HostnameMatcher {
    /// Compile `patterns` in order.
    ///
    /// Patterns that fail to compile or lack a capture group are logged and
    /// skipped. If none survive, the default `user@host` pattern is used.
    pub fn new(patterns: &[String]) -> Self {
        let mut compiled: Vec<PromptPattern> = patterns
            .iter()
            .filter_map(|source| match compile_anchored(source) {
                Ok(regex) if regex.captures_len() > 1 => Some(PromptPattern {
                    source: source.clone(),
                    regex,
                }),
                Ok(_) => {
                    log::warn!(
                        "Prompt pattern '{}' has no capture group for the hostname, skipping",
                        source
                    );
                    None
                }
                Err(e) => {
                    log::warn!("Failed to compile prompt pattern '{}': {}", source, e);
                    None
                }
            })
            .collect();

        if compiled.is_empty() {
            log::warn!(
                "No usable prompt patterns configured, falling back to '{}'",
                PROMPT_PATTERN
            );
            if let Ok(regex) = compile_anchored(PROMPT_PATTERN) {
                compiled.push(PromptPattern {
                    source: PROMPT_PATTERN.to_string(),
                    regex,
                });
            }
        }

        Self { patterns: compiled }
    }

    /// Hostname from the first pattern matching at the start of `line`.
    pub fn find<'a>(&'a self, line: &'a str) -> Option<HostnameMatch<'a>> {
        self.patterns.iter().find_map(|pattern| {
            let hostname = pattern.regex.captures(line)?.get(1)?.as_str();
            if hostname.is_empty() {
                return None;
            }
            log::trace!(
                "prompt pattern '{}' matched '{}' -> {}",
                pattern.source,
                line,
                hostname
            );
            Some(HostnameMatch {
                hostname,
                pattern: &pattern.source,
            })
        })
    }

    /// Pattern sources in evaluation order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.source.as_str())
    }
}

/// Compile `pattern` so it can only match at the start of the input.
fn compile_anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hostname<'a>(matcher: &'a HostnameMatcher, line: &'a str) -> Option<&'a str> {
        matcher.find(line).map(|m| m.hostname)
    }

    #[test]
    fn test_default_pattern() {
        let matcher = HostnameMatcher::default();
        assert_eq!(hostname(&matcher, "pheckel@EMEA0014 ~ $ "), Some("EMEA0014"));
        assert_eq!(hostname(&matcher, "root@kartoffel:~# "), Some("kartoffel"));
        assert_eq!(hostname(&matcher, "me@host_01.example.com $"), Some("host_01"));
    }

    #[test]
    fn test_default_pattern_requires_user() {
        let matcher = HostnameMatcher::default();
        assert_eq!(hostname(&matcher, "@host $"), None);
        assert_eq!(hostname(&matcher, "no at sign here"), None);
    }

    #[test]
    fn test_custom_pattern() {
        let matcher = HostnameMatcher::new(&[r"[^@]+@(\w+):([^#]+)#".to_string()]);
        assert_eq!(hostname(&matcher, "root@kartoffel:~# "), Some("kartoffel"));
        assert_eq!(hostname(&matcher, "pheckel@EMEA0014 ~ $ "), None);
    }

    #[test]
    fn test_first_matching_pattern_wins() {
        let matcher = HostnameMatcher::new(&[
            r"\[[^@]+@([\w-]+) ".to_string(),
            r"[^@]+@(\w+)".to_string(),
        ]);
        let found = matcher.find("[ops@db-primary ~/data]$").unwrap();
        assert_eq!(found.hostname, "db-primary");
        assert_eq!(found.pattern, r"\[[^@]+@([\w-]+) ");

        let found = matcher.find("ops@cache ~ $").unwrap();
        assert_eq!(found.hostname, "cache");
        assert_eq!(found.pattern, r"[^@]+@(\w+)");
    }

    #[test]
    fn test_match_is_anchored_at_line_start() {
        let matcher = HostnameMatcher::new(&[r"(\w+)\$".to_string()]);
        assert_eq!(hostname(&matcher, "box$ "), Some("box"));
        assert_eq!(hostname(&matcher, "  box$ "), None);
    }

    #[test]
    fn test_invalid_and_groupless_patterns_skipped() {
        let matcher = HostnameMatcher::new(&[
            "([unclosed".to_string(),
            r"[^@]+@\w+".to_string(),
            r"[^@]+@(\w+):".to_string(),
        ]);
        assert_eq!(matcher.patterns().collect::<Vec<_>>(), vec![r"[^@]+@(\w+):"]);
    }

    #[test]
    fn test_nothing_usable_falls_back_to_default() {
        let matcher = HostnameMatcher::new(&["(".to_string()]);
        assert_eq!(matcher.patterns().collect::<Vec<_>>(), vec![PROMPT_PATTERN]);

        let matcher = HostnameMatcher::new(&[]);
        assert_eq!(hostname(&matcher, "a@b c"), Some("b"));
    }

    #[test]
    fn test_non_participating_group_tries_next_pattern() {
        let matcher = HostnameMatcher::new(&[
            r"(?:remote@(\w+)|local)".to_string(),
            r"[^@]*@?(\w+)".to_string(),
        ]);
        let found = matcher.find("local shell").unwrap();
        assert_eq!(found.pattern, r"[^@]*@?(\w+)");
    }
}
