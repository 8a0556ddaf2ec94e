//! `profile_patterns` entries: hostname pattern to profile name mappings.
//!
//! Two spellings are accepted in YAML:
//!
//! ```yaml
//! profile_patterns:
//!   - '"jenkins":"inf"'                    # quoted pair, split on ':'
//!   - { pattern: '^itg-.*', profile: itg } # structured
//! ```
//!
//! The pair spelling carries over from plugin configs where the value was a
//! flat list of `"pattern":"profile"` strings. Entries that do not split into
//! exactly two non-empty parts are malformed and dropped by the caller.

use serde::{Deserialize, Serialize};

/// One configured `profile_patterns` entry, as written in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProfilePatternEntry {
    /// `{ pattern: ..., profile: ... }`
    Rule { pattern: String, profile: String },
    /// `"pattern":"profile"`
    Pair(String),
    /// Any other shape. Always malformed.
    Other(serde_yaml_ng::Value),
}

impl ProfilePatternEntry {
    /// Build a structured entry.
    pub fn rule(pattern: impl Into<String>, profile: impl Into<String>) -> Self {
        Self::Rule {
            pattern: pattern.into(),
            profile: profile.into(),
        }
    }

    /// Split the entry into `(pattern, profile)`.
    ///
    /// Returns `None` for malformed entries: a pair that does not split into
    /// exactly two parts on `:`, or either side empty after unquoting.
    pub fn split(&self) -> Option<(String, String)> {
        let (pattern, profile) = match self {
            Self::Rule { pattern, profile } => (pattern.trim().to_string(), profile.trim().to_string()),
            Self::Pair(raw) => {
                let parts: Vec<&str> = raw.split(':').collect();
                if parts.len() != 2 {
                    return None;
                }
                (unquote(parts[0]), unquote(parts[1]))
            }
            Self::Other(_) => return None,
        };

        if pattern.is_empty() || profile.is_empty() {
            return None;
        }
        Some((pattern, profile))
    }
}

/// Strip surrounding whitespace and every single/double quote character.
fn unquote(part: &str) -> String {
    part.trim().replace(['\'', '"'], "")
}
