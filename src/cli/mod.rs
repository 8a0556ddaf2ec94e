//! Command-line interface for host-watch.
//!
//! The binary runs the same matcher the plugin uses against a screen dump,
//! so prompt and profile rules can be tried out without a live terminal.
//! Output formatting lives in the [`report`] submodule.

pub mod report;

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::HostWatchConfig;
use crate::matcher::HostMatcher;
use crate::screen::ScreenSnapshot;

/// host-watch - switch terminal profiles based on the host in the prompt
#[derive(Parser)]
#[command(name = "host-watch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to read (default: <config_dir>/host-watch/config.yaml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Set debug log level (overrides RUST_LOG and DEBUG_LEVEL)
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevelArg>,
}

/// Log level argument for CLI
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevelArg::Off => log::LevelFilter::Off,
            LogLevelArg::Error => log::LevelFilter::Error,
            LogLevelArg::Warn => log::LevelFilter::Warn,
            LogLevelArg::Info => log::LevelFilter::Info,
            LogLevelArg::Debug => log::LevelFilter::Debug,
            LogLevelArg::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect the host in a screen dump and print the profile it selects
    Check {
        /// Screen dump, one row per line; `-` reads stdin
        #[arg(long, value_name = "FILE")]
        screen: PathBuf,

        /// Cursor row (default: last row of the dump)
        #[arg(long, value_name = "N")]
        cursor_row: Option<usize>,

        /// Profile name known to the terminal (repeatable, in order)
        #[arg(long = "profile", value_name = "NAME")]
        profiles: Vec<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List prompt patterns and profile rules in evaluation order
    Rules {
        /// Profile name known to the terminal (repeatable, in order)
        #[arg(long = "profile", value_name = "NAME")]
        profiles: Vec<String>,
    },

    /// Print the effective configuration as YAML
    Config,
}

/// Exit code when nothing was detected in the screen dump.
pub const EXIT_NO_MATCH: i32 = 1;

/// Run a parsed command line. Returns the process exit code.
pub fn run(cli: Cli) -> Result<i32> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Check {
            screen,
            cursor_row,
            profiles,
            json,
        } => {
            let mut snapshot = ScreenSnapshot::from_dump(&read_screen(&screen)?);
            if let Some(row) = cursor_row {
                snapshot.set_cursor_row(row);
            }

            let matcher = HostMatcher::from_config(&config, &profiles);
            let prompt_line = matcher.extractor().extract(&snapshot);
            let detection = prompt_line
                .as_deref()
                .and_then(|line| matcher.match_line(line));

            if json {
                println!("{}", serde_json::to_string_pretty(&detection)?);
            } else {
                print!(
                    "{}",
                    report::render_check(prompt_line.as_deref(), detection.as_ref())
                );
            }
            Ok(if detection.is_some() { 0 } else { EXIT_NO_MATCH })
        }
        Commands::Rules { profiles } => {
            let matcher = HostMatcher::from_config(&config, &profiles);
            print!("{}", report::render_rules(&matcher));
            Ok(0)
        }
        Commands::Config => {
            print!("{}", config.to_yaml_string()?);
            Ok(0)
        }
    }
}

/// Load the config from `path`, or from the default location.
fn load_config(path: Option<&Path>) -> Result<HostWatchConfig> {
    match path {
        Some(path) => HostWatchConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => HostWatchConfig::load().context("Failed to load config"),
    }
}

fn read_screen(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut contents = String::new();
        std::io::stdin()
            .read_to_string(&mut contents)
            .context("Failed to read screen dump from stdin")?;
        return Ok(contents);
    }
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read screen dump {}", path.display()))
}
