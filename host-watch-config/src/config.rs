//! The `host_watch` configuration section and its loading rules.
//!
//! The section may sit at the top level of a YAML file or under a `plugins`
//! mapping:
//!
//! ```yaml
//! host_watch:
//!   patterns: '[^@]+@(\w+)'
//!   failback_profile: default
//!
//! # or
//! plugins:
//!   HostWatch:
//!     line_minlen: 12
//! ```
//!
//! Every key is optional. A missing file, an empty file, or a file without
//! the section all produce [`HostWatchConfig::default`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;
use crate::profile_patterns::ProfilePatternEntry;

/// Whether an unchanged profile is pushed to the terminal again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReapplyPolicy {
    /// Apply the resolved profile on every matching prompt. Split terminals
    /// can otherwise keep a stale profile.
    #[default]
    Always,
    /// Skip the apply when the resolved profile equals the last one applied
    /// to the same terminal.
    OnChange,
}

/// Settings for prompt extraction and profile selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostWatchConfig {
    /// Prompt regexes, tried in order. Capture group 1 is the hostname.
    /// Accepts a single string or a list.
    #[serde(
        default = "crate::defaults::patterns",
        deserialize_with = "one_or_many"
    )]
    pub patterns: Vec<String>,

    /// Hostname pattern to profile rules, evaluated before profile names.
    #[serde(default)]
    pub profile_patterns: Vec<ProfilePatternEntry>,

    /// Cursor rows at or below this length trigger the backward prompt search.
    #[serde(default = "crate::defaults::prompt_minlen")]
    pub prompt_minlen: usize,

    /// Minimum length of a usable prompt line.
    #[serde(default = "crate::defaults::line_minlen")]
    pub line_minlen: usize,

    /// Profile applied when a prompt matches but no rule selects a profile.
    #[serde(default = "crate::defaults::failback_profile")]
    pub failback_profile: String,

    #[serde(default = "crate::defaults::reapply")]
    pub reapply: ReapplyPolicy,

    /// Upper bound on rows walked upward from the cursor.
    #[serde(default = "crate::defaults::max_lookback_rows")]
    pub max_lookback_rows: usize,
}

impl Default for HostWatchConfig {
    fn default() -> Self {
        Self {
            patterns: crate::defaults::patterns(),
            profile_patterns: Vec::new(),
            prompt_minlen: crate::defaults::prompt_minlen(),
            line_minlen: crate::defaults::line_minlen(),
            failback_profile: crate::defaults::failback_profile(),
            reapply: crate::defaults::reapply(),
            max_lookback_rows: crate::defaults::max_lookback_rows(),
        }
    }
}

/// Top-level shape of a config file. Unknown keys are ignored so the
/// section can live inside a larger host configuration.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default, alias = "HostWatch")]
    host_watch: Option<HostWatchConfig>,
    #[serde(default)]
    plugins: Option<PluginsSection>,
}

#[derive(Debug, Default, Deserialize)]
struct PluginsSection {
    #[serde(default, alias = "HostWatch")]
    host_watch: Option<HostWatchConfig>,
}

impl HostWatchConfig {
    /// Default config file location: `<config_dir>/host-watch/config.yaml`.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("host-watch")
            .join("config.yaml")
    }

    /// Load from [`Self::config_path`].
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load from an explicit path. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("Config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }

        log::info!("Loading config from {:?}", path);
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Parse a YAML document and extract the `host_watch` section.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        let file: ConfigFile = serde_yaml_ng::from_str(contents)?;
        let config = file
            .host_watch
            .or_else(|| file.plugins.and_then(|p| p.host_watch))
            .unwrap_or_else(|| {
                log::debug!("No host_watch section in config, using defaults");
                Self::default()
            });
        config.validate()?;
        Ok(config)
    }

    /// Render as a YAML document with the section key, loadable by
    /// [`Self::from_yaml_str`].
    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        #[derive(Serialize)]
        struct Section<'a> {
            host_watch: &'a HostWatchConfig,
        }
        Ok(serde_yaml_ng::to_string(&Section { host_watch: self })?)
    }

    /// Reject values no caller could do anything useful with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.failback_profile.trim().is_empty() {
            return Err(ConfigError::Validation(
                "failback_profile must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Well-formed `profile_patterns` entries as `(pattern, profile)`, in
    /// configuration order. Malformed entries are logged and skipped.
    pub fn profile_rules(&self) -> Vec<(String, String)> {
        self.profile_patterns
            .iter()
            .filter_map(|entry| {
                let split = entry.split();
                match &split {
                    Some((pattern, profile)) => {
                        log::debug!("profile mapping: {} -> {}", pattern, profile);
                    }
                    None => {
                        log::warn!("Skipping malformed profile_patterns entry {:?}", entry);
                    }
                }
                split
            })
            .collect()
    }
}

/// Accept either `patterns: 'x'` or `patterns: ['x', 'y']`.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(pattern) => vec![pattern],
        OneOrMany::Many(patterns) => patterns,
    })
}
