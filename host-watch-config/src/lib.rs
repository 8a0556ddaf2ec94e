//! Configuration system for the host-watch profile switcher.
//!
//! This crate provides the `host_watch` configuration section:
//!
//! - Prompt patterns and extraction thresholds
//! - `profile_patterns` hostname-to-profile rules
//! - Fallback profile and reapply policy
//! - YAML loading with defaults for every key

pub mod config;
pub mod defaults;
pub mod error;
pub mod profile_patterns;

// Re-export main types for convenience
pub use config::{HostWatchConfig, ReapplyPolicy};
pub use error::ConfigError;
pub use profile_patterns::ProfilePatternEntry;
