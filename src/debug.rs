//! Debug logging for host-watch.
//!
//! All `log::info!()` / `log::debug!()` records are routed to a debug file
//! so diagnostics never interleave with the host terminal's own output:
//!
//! - Unix/macOS: `/tmp/host_watch_debug.log`
//! - Windows: `%TEMP%\host_watch_debug.log`
//!
//! Level precedence (first one set wins):
//! 1. The `--log-level` CLI flag
//! 2. `RUST_LOG` (a plain level name; records are mirrored to stderr too)
//! 3. `DEBUG_LEVEL` (0 = off, 1 = error, 2 = info, 3 = debug, 4 = trace)
//! 4. Off

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;

/// Bridge from the `log` facade to the debug file.
struct DebugLogger {
    level: LevelFilter,
    file: Mutex<Option<File>>,
    mirror_stderr: bool,
}

impl DebugLogger {
    fn new(level: LevelFilter, mirror_stderr: bool) -> Self {
        let file = if level == LevelFilter::Off {
            None
        } else {
            // Silently fall back to no file; stderr mirroring still works.
            OpenOptions::new()
                .write(true)
                .truncate(true)
                .create(true)
                .open(log_path())
                .ok()
        };

        let logger = Self {
            level,
            file: Mutex::new(file),
            mirror_stderr,
        };
        logger.write_raw(&format!(
            "\n{}\nhost-watch debug session started at {} (level={})\n{}\n",
            "=".repeat(80),
            timestamp(),
            level,
            "=".repeat(80)
        ));
        logger
    }

    fn write_raw(&self, msg: &str) {
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.write_all(msg.as_bytes());
            let _ = file.flush();
        }
    }
}

impl Log for DebugLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[{}] [{:<5}] [{}] {}\n",
            timestamp(),
            record.level(),
            record.target(),
            record.args()
        );
        self.write_raw(&line);
        if self.mirror_stderr {
            eprint!("{line}");
        }
    }

    fn flush(&self) {
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.flush();
        }
    }
}

static LOGGER: OnceLock<DebugLogger> = OnceLock::new();

/// Path of the debug log file.
pub fn log_path() -> PathBuf {
    #[cfg(unix)]
    let path = PathBuf::from("/tmp/host_watch_debug.log");
    #[cfg(not(unix))]
    let path = std::env::temp_dir().join("host_watch_debug.log");
    path
}

/// Install the debug logger as the global `log` backend.
///
/// Safe to call more than once; only the first call takes effect.
pub fn init_log_bridge(cli_level: Option<LevelFilter>) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let debug_level = std::env::var("DEBUG_LEVEL").ok();
    let level = resolve_level(cli_level, rust_log.as_deref(), debug_level.as_deref());
    let mirror_stderr = rust_log.is_some();

    let logger = LOGGER.get_or_init(|| DebugLogger::new(level, mirror_stderr));
    if log::set_logger(logger).is_ok() {
        log::set_max_level(logger.level);
    }
}

/// Pick the effective level from the CLI flag, `RUST_LOG` and `DEBUG_LEVEL`.
fn resolve_level(
    cli_level: Option<LevelFilter>,
    rust_log: Option<&str>,
    debug_level: Option<&str>,
) -> LevelFilter {
    if let Some(level) = cli_level {
        return level;
    }
    if let Some(value) = rust_log {
        return LevelFilter::from_str(value.trim()).unwrap_or(LevelFilter::Info);
    }
    debug_level
        .map(level_from_debug_env)
        .unwrap_or(LevelFilter::Off)
}

/// Map a numeric `DEBUG_LEVEL` to a level filter.
fn level_from_debug_env(value: &str) -> LevelFilter {
    match value.trim().parse::<u8>() {
        Ok(1) => LevelFilter::Error,
        Ok(2) => LevelFilter::Info,
        Ok(3) => LevelFilter::Debug,
        Ok(4) => LevelFilter::Trace,
        _ => LevelFilter::Off,
    }
}

fn timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_level_mapping() {
        assert_eq!(level_from_debug_env("0"), LevelFilter::Off);
        assert_eq!(level_from_debug_env("1"), LevelFilter::Error);
        assert_eq!(level_from_debug_env(" 2 "), LevelFilter::Info);
        assert_eq!(level_from_debug_env("3"), LevelFilter::Debug);
        assert_eq!(level_from_debug_env("4"), LevelFilter::Trace);
        assert_eq!(level_from_debug_env("9"), LevelFilter::Off);
        assert_eq!(level_from_debug_env("verbose"), LevelFilter::Off);
    }

    #[test]
    fn test_cli_level_takes_precedence() {
        assert_eq!(
            resolve_level(Some(LevelFilter::Warn), Some("trace"), Some("4")),
            LevelFilter::Warn
        );
    }

    #[test]
    fn test_rust_log_before_debug_level() {
        assert_eq!(
            resolve_level(None, Some("debug"), Some("1")),
            LevelFilter::Debug
        );
        // Directive syntax is not understood; fall back to info.
        assert_eq!(
            resolve_level(None, Some("host_watch=trace"), None),
            LevelFilter::Info
        );
    }

    #[test]
    fn test_default_is_off() {
        assert_eq!(resolve_level(None, None, None), LevelFilter::Off);
        assert_eq!(resolve_level(None, None, Some("2")), LevelFilter::Info);
    }

    #[test]
    fn test_log_path_file_name() {
        assert_eq!(
            log_path().file_name().and_then(|n| n.to_str()),
            Some("host_watch_debug.log")
        );
    }
}
