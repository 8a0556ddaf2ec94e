//! Prompt-to-profile matching: extraction, hostname capture and resolution
//! combined behind one call.

use host_watch_config::HostWatchConfig;
use serde::Serialize;

use crate::host::TerminalView;
use crate::hostname::HostnameMatcher;
use crate::profile::ProfileMapping;
use crate::prompt::PromptExtractor;

/// Everything learned from one prompt line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detection {
    pub prompt_line: String,
    pub hostname: String,
    /// Prompt pattern that captured the hostname.
    pub prompt_pattern: String,
    /// Profile that should be active.
    pub profile: String,
    /// Profile rule that selected `profile`; `None` when the fallback applied.
    pub rule: Option<String>,
}

/// Compiled matching state, built once from configuration and the host's
/// profile list.
#[derive(Debug, Clone)]
pub struct HostMatcher {
    extractor: PromptExtractor,
    hostnames: HostnameMatcher,
    mapping: ProfileMapping,
}

impl HostMatcher {
    pub fn new(extractor: PromptExtractor, hostnames: HostnameMatcher, mapping: ProfileMapping) -> Self {
        Self {
            extractor,
            hostnames,
            mapping,
        }
    }

    pub fn from_config(config: &HostWatchConfig, profile_names: &[String]) -> Self {
        Self::new(
            PromptExtractor::from_config(config),
            HostnameMatcher::new(&config.patterns),
            ProfileMapping::new(
                &config.profile_rules(),
                profile_names,
                config.failback_profile.clone(),
            ),
        )
    }

    /// Extract the prompt from `view` and resolve its profile.
    pub fn detect<V: TerminalView + ?Sized>(&self, view: &V) -> Option<Detection> {
        let line = self.extractor.extract(view)?;
        self.match_line(&line)
    }

    /// Resolve the profile for an already extracted prompt line. `None` when
    /// no prompt pattern matches.
    pub fn match_line(&self, line: &str) -> Option<Detection> {
        let found = self.hostnames.find(line)?;
        let resolution = self.mapping.resolve(found.hostname);

        match resolution.rule {
            Some(rule) => log::debug!(
                "matching profile '{}' found: line '{}' matches prompt pattern '{}' and profile rule '{}'",
                resolution.profile,
                line,
                found.pattern,
                rule.matcher().source()
            ),
            None => log::debug!(
                "no profile rule for host '{}', using fallback '{}'",
                found.hostname,
                resolution.profile
            ),
        }

        Some(Detection {
            prompt_line: line.to_string(),
            hostname: found.hostname.to_string(),
            prompt_pattern: found.pattern.to_string(),
            profile: resolution.profile.to_string(),
            rule: resolution.rule.map(|r| r.matcher().source().to_string()),
        })
    }

    pub fn extractor(&self) -> &PromptExtractor {
        &self.extractor
    }

    pub fn hostnames(&self) -> &HostnameMatcher {
        &self.hostnames
    }

    pub fn mapping(&self) -> &ProfileMapping {
        &self.mapping
    }
}
