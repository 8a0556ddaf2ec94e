//! Hostname to profile resolution.
//!
//! A [`ProfileMapping`] is an ordered list of rules. Configured
//! `profile_patterns` come first, in file order, followed by one rule per
//! profile name known to the host, in the host's listing order. Profile names
//! are themselves treated as patterns, so a profile called `web-[0-9]+`
//! catches `web-12`. The first rule that selects a hostname wins; when none
//! does, the fallback profile applies.
//!
//! Rules whose text has no regex metacharacters are kept as literals and
//! compared with `==`. Everything else must match the whole hostname.

use std::fmt;

use regex::Regex;

/// How a rule tests a hostname.
#[derive(Debug, Clone)]
pub enum RuleMatcher {
    /// Exact string comparison.
    Literal(String),
    /// Full-hostname regex match. Holds the source and the anchored regex.
    Pattern { source: String, regex: Regex },
}

impl RuleMatcher {
    /// Classify `pattern` as a literal or compile it as an anchored regex.
    pub fn parse(pattern: &str) -> Result<Self, regex::Error> {
        if is_literal(pattern) {
            return Ok(Self::Literal(pattern.to_string()));
        }
        let regex = Regex::new(&format!("^(?:{pattern})$"))?;
        Ok(Self::Pattern {
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn matches(&self, hostname: &str) -> bool {
        match self {
            Self::Literal(name) => name == hostname,
            Self::Pattern { regex, .. } => regex.is_match(hostname),
        }
    }

    /// Rule text as configured.
    pub fn source(&self) -> &str {
        match self {
            Self::Literal(name) => name,
            Self::Pattern { source, .. } => source,
        }
    }
}

/// Where a rule came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOrigin {
    /// A `profile_patterns` entry.
    Configured,
    /// A profile name listed by the host.
    ProfileName,
}

/// One `pattern -> profile` rule.
#[derive(Debug, Clone)]
pub struct ProfileRule {
    matcher: RuleMatcher,
    profile: String,
    origin: RuleOrigin,
}

impl ProfileRule {
    pub fn matcher(&self) -> &RuleMatcher {
        &self.matcher
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn origin(&self) -> RuleOrigin {
        self.origin
    }

    /// Selects `hostname` if it names this rule's profile outright or
    /// satisfies the rule's matcher.
    pub fn selects(&self, hostname: &str) -> bool {
        hostname == self.profile || self.matcher.matches(hostname)
    }
}

impl fmt::Display for ProfileRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.matcher {
            RuleMatcher::Literal(_) => "literal",
            RuleMatcher::Pattern { .. } => "pattern",
        };
        write!(f, "{} {} -> {}", kind, self.matcher.source(), self.profile)
    }
}

/// Outcome of resolving a hostname.
#[derive(Debug, Clone, Copy)]
pub struct Resolution<'a> {
    pub profile: &'a str,
    /// Rule that selected the profile; `None` means the fallback applied.
    pub rule: Option<&'a ProfileRule>,
}

impl Resolution<'_> {
    pub fn is_fallback(&self) -> bool {
        self.rule.is_none()
    }
}

/// Ordered hostname rules plus the fallback profile.
#[derive(Debug, Clone)]
pub struct ProfileMapping {
    rules: Vec<ProfileRule>,
    fallback: String,
}

impl ProfileMapping {
    /// Build the mapping from configured `(pattern, profile)` pairs followed
    /// by the host's profile names.
    ///
    /// A configured pattern that fails to compile is logged and skipped. A
    /// profile name that is not a valid regex is kept as a literal.
    pub fn new(
        configured: &[(String, String)],
        profile_names: &[String],
        fallback: impl Into<String>,
    ) -> Self {
        let mut rules = Vec::with_capacity(configured.len() + profile_names.len());

        for (pattern, profile) in configured {
            match RuleMatcher::parse(pattern) {
                Ok(matcher) => rules.push(ProfileRule {
                    matcher,
                    profile: profile.clone(),
                    origin: RuleOrigin::Configured,
                }),
                Err(e) => {
                    log::warn!(
                        "Skipping profile pattern '{}' -> '{}': {}",
                        pattern,
                        profile,
                        e
                    );
                }
            }
        }

        for name in profile_names {
            log::trace!("adding profile rule for '{}'", name);
            let matcher = RuleMatcher::parse(name)
                .unwrap_or_else(|_| RuleMatcher::Literal(name.clone()));
            rules.push(ProfileRule {
                matcher,
                profile: name.clone(),
                origin: RuleOrigin::ProfileName,
            });
        }

        Self {
            rules,
            fallback: fallback.into(),
        }
    }

    /// Profile for `hostname`: the first selecting rule, else the fallback.
    pub fn resolve(&self, hostname: &str) -> Resolution<'_> {
        match self.rules.iter().find(|rule| rule.selects(hostname)) {
            Some(rule) => Resolution {
                profile: &rule.profile,
                rule: Some(rule),
            },
            None => Resolution {
                profile: &self.fallback,
                rule: None,
            },
        }
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[ProfileRule] {
        &self.rules
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}

/// Word characters and `-` carry no regex meaning outside a class.
fn is_literal(pattern: &str) -> bool {
    pattern
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(p, q)| (p.to_string(), q.to_string()))
            .collect()
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_configured_rule_selects_profile() {
        let mapping = ProfileMapping::new(
            &pairs(&[("jenkins", "inf"), ("^itg-.*", "itg")]),
            &[],
            "default",
        );
        assert_eq!(mapping.resolve("itg-node3").profile, "itg");
        assert_eq!(mapping.resolve("jenkins").profile, "inf");
    }

    #[test]
    fn test_unmatched_hostname_uses_fallback() {
        let mapping = ProfileMapping::new(&pairs(&[("jenkins", "inf")]), &names(&["mypc"]), "plain");
        let resolution = mapping.resolve("unknown-box");
        assert_eq!(resolution.profile, "plain");
        assert!(resolution.is_fallback());
    }

    #[test]
    fn test_configured_rules_precede_profile_names() {
        let mapping = ProfileMapping::new(
            &pairs(&[("^ip-10-1-.*", "itg")]),
            &names(&["ip-10-1-7"]),
            "default",
        );
        let resolution = mapping.resolve("ip-10-1-7");
        assert_eq!(resolution.profile, "itg");
        assert_eq!(resolution.rule.map(|r| r.origin()), Some(RuleOrigin::Configured));
    }

    #[test]
    fn test_profile_name_rule() {
        let mapping = ProfileMapping::new(&[], &names(&["default", "kartoffel"]), "default");
        let resolution = mapping.resolve("kartoffel");
        assert_eq!(resolution.profile, "kartoffel");
        assert_eq!(
            resolution.rule.map(|r| r.origin()),
            Some(RuleOrigin::ProfileName)
        );
    }

    #[test]
    fn test_profile_name_as_pattern() {
        let mapping = ProfileMapping::new(&[], &names(&["web-[0-9]+"]), "default");
        assert_eq!(mapping.resolve("web-12").profile, "web-[0-9]+");
        assert_eq!(mapping.resolve("web-ab").profile, "default");
    }

    #[test]
    fn test_hostname_equal_to_rule_profile_selects_it() {
        // The pattern does not match, but the hostname names the profile.
        let mapping = ProfileMapping::new(&pairs(&[("^ns[0-9]+", "ovh")]), &[], "default");
        assert_eq!(mapping.resolve("ovh").profile, "ovh");
    }

    #[test]
    fn test_pattern_must_match_whole_hostname() {
        let mapping = ProfileMapping::new(&pairs(&[("^itg-", "itg"), ("sd-[0-9]+", "ovh")]), &[], "default");
        assert_eq!(mapping.resolve("itg-node3").profile, "default");
        assert_eq!(mapping.resolve("sd-42").profile, "ovh");
        assert_eq!(mapping.resolve("xsd-42").profile, "default");
    }

    #[test]
    fn test_literal_is_exact() {
        let mapping = ProfileMapping::new(&pairs(&[("aramis", "local")]), &[], "default");
        assert!(matches!(mapping.rules()[0].matcher(), RuleMatcher::Literal(_)));
        assert_eq!(mapping.resolve("aramis").profile, "local");
        assert_eq!(mapping.resolve("aramis2").profile, "default");
    }

    #[test]
    fn test_invalid_configured_pattern_skipped() {
        let mapping = ProfileMapping::new(
            &pairs(&[("([bad", "x"), ("jenkins", "inf")]),
            &names(&["[prod"]),
            "default",
        );
        assert_eq!(mapping.rules().len(), 2);
        assert_eq!(mapping.rules()[0].profile(), "inf");
        assert!(matches!(mapping.rules()[1].matcher(), RuleMatcher::Literal(_)));
        assert_eq!(mapping.resolve("[prod").profile, "[prod");
    }

    #[test]
    fn test_order_is_deterministic() {
        let mapping = ProfileMapping::new(
            &pairs(&[("b", "two"), ("a", "one")]),
            &names(&["z", "y"]),
            "default",
        );
        let order: Vec<&str> = mapping.rules().iter().map(|r| r.profile()).collect();
        assert_eq!(order, vec!["two", "one", "z", "y"]);
    }

    #[test]
    fn test_first_selecting_rule_wins() {
        let mapping = ProfileMapping::new(
            &pairs(&[("^db-.*", "data"), ("^db-prod.*", "prod")]),
            &[],
            "default",
        );
        assert_eq!(mapping.resolve("db-prod1").profile, "data");
    }

    #[test]
    fn test_rule_display() {
        let mapping = ProfileMapping::new(&pairs(&[("^itg-.*", "itg")]), &names(&["mypc"]), "default");
        assert_eq!(mapping.rules()[0].to_string(), "pattern ^itg-.* -> itg");
        assert_eq!(mapping.rules()[1].to_string(), "literal mypc -> mypc");
    }
}
