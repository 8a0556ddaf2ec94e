//! Typed error variants for the host-watch-config crate.
//!
//! Callers that only need a message can propagate these through `anyhow`;
//! callers that want to fall back to defaults on a specific failure can match
//! on the variant.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading configuration.
///
/// A missing file or a missing `host_watch` section is not an error: both
/// resolve to [`HostWatchConfig::default`](crate::HostWatchConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("I/O error reading config '{}': {source}", path.display())]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file contained YAML that could not be parsed into the
    /// expected shape.
    #[error("YAML parse error in config: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    /// A field value failed semantic validation.
    ///
    /// The inner string names the field and why it was rejected.
    #[error("Config validation error: {0}")]
    Validation(String),
}
