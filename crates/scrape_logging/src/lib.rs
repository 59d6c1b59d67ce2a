#![deny(missing_docs)]
//! Shared logging utilities for the scrape client workspace.
//!
//! This crate provides the `scrape_*` logging macros used across the codebase,
//! the logger initialisation used by the binary, and a minimal test initializer.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! scrape_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! scrape_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! scrape_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! scrape_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! scrape_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Destination for log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    /// Write to the given file only.
    File(PathBuf),
    /// Write to the terminal; warnings and errors go to stderr.
    Terminal,
}

/// Install the global logger for `destination` at `level`.
///
/// A log file that cannot be created is reported on stderr and no logger is
/// installed. A second call changes nothing.
pub fn initialize(destination: LogDestination, level: LevelFilter) {
    let logger = match destination {
        LogDestination::Terminal => terminal_logger(level, timestamped()),
        LogDestination::File(path) => match open_log_file(&path, level, timestamped()) {
            Ok(logger) => logger,
            Err(err) => {
                eprintln!("Warning: log file {} unavailable: {}", path.display(), err);
                return;
            }
        },
    };

    let _ = CombinedLogger::init(vec![logger]);
}

/// Terminal logger for tests; debug level in debug builds, info otherwise.
///
/// Silently does nothing when a logger is already installed.
pub fn initialize_for_tests() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = CombinedLogger::init(vec![terminal_logger(level, Config::default())]);
}

/// RFC 3339 timestamps; module targets only on errors.
fn timestamped() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn terminal_logger(level: LevelFilter, config: Config) -> Box<dyn SharedLogger> {
    TermLogger::new(level, config, TerminalMode::Mixed, ColorChoice::Auto)
}

fn open_log_file(
    path: &Path,
    level: LevelFilter,
    config: Config,
) -> io::Result<Box<dyn SharedLogger>> {
    let file = File::create(path)?;
    let logger: Box<dyn SharedLogger> = WriteLogger::new(level, config, file);
    Ok(logger)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_logger_is_created_in_writable_dir() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("client.log");
        let logger = open_log_file(&path, LevelFilter::Info, timestamped());
        assert!(logger.is_ok());
        assert!(path.exists());
    }

    #[test]
    fn file_logger_is_skipped_when_dir_is_missing() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("missing").join("client.log");
        let logger = open_log_file(&path, LevelFilter::Info, timestamped());
        assert!(logger.is_err());
    }
}
