//! Logging for the OMM texture store
//!
//! - `Logger` trait so an embedding baker can route messages anywhere
//! - Severity levels (Trace, Debug, Info, Warn, Error)
//! - Colored console output by default
//! - ERROR entries carry file:line of the call site
//!
//! Messages are dispatched through the process-wide registry in
//! `context.rs` by the `omm_*!` macros below.

use std::time::SystemTime;
use chrono::{DateTime, Local};
use colored::*;

/// Logger trait for custom logging implementations
///
/// # Example
///
/// ```no_run
/// use omm_texture::omm::log::{format_entry, Logger, LogEntry};
///
/// struct Collector(std::sync::Mutex<Vec<String>>);
///
/// impl Logger for Collector {
///     fn log(&self, entry: &LogEntry) {
///         self.0.lock().unwrap().push(format_entry(entry));
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    fn log(&self, entry: &LogEntry);
}

/// A single log record
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub severity: LogSeverity,
    pub timestamp: SystemTime,
    /// Emitting component, e.g. "omm::Texture"
    pub source: String,
    pub message: String,
    /// Only set for ERROR entries
    pub file: Option<&'static str>,
    pub line: Option<u32>,
}

/// Log severity levels, ordered from most to least verbose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogSeverity {
    /// Fixed-width label used by the console logger
    pub fn label(self) -> &'static str {
        match self {
            LogSeverity::Trace => "TRACE",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO ",
            LogSeverity::Warn => "WARN ",
            LogSeverity::Error => "ERROR",
        }
    }
}

fn format_timestamp(entry: &LogEntry) -> String {
    let datetime: DateTime<Local> = entry.timestamp.into();
    datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

/// ` (file:line)`, or empty unless both parts are known
fn format_location(entry: &LogEntry) -> String {
    match (entry.file, entry.line) {
        (Some(file), Some(line)) => format!(" ({}:{})", file, line),
        _ => String::new(),
    }
}

/// Render an entry as a plain (uncolored) line, for custom loggers
///
/// `[timestamp] [SEVERITY] [source] message (file:line)`
pub fn format_entry(entry: &LogEntry) -> String {
    format!(
        "[{}] [{}] [{}] {}{}",
        format_timestamp(entry),
        entry.severity.label(),
        entry.source,
        entry.message,
        format_location(entry)
    )
}

/// Console logger, colored by severity
///
/// Trace is dimmed, Debug cyan, Info green, Warn yellow, Error bold red.
pub struct DefaultLogger;

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let label = entry.severity.label();
        let severity = match entry.severity {
            LogSeverity::Trace => label.bright_black(),
            LogSeverity::Debug => label.cyan(),
            LogSeverity::Info => label.green(),
            LogSeverity::Warn => label.yellow(),
            LogSeverity::Error => label.red().bold(),
        };

        println!(
            "[{}] [{}] [{}] {}{}",
            format_timestamp(entry),
            severity,
            entry.source.bright_blue(),
            entry.message,
            format_location(entry)
        );
    }
}

// ===== LOGGING MACROS =====

#[macro_export]
macro_rules! omm_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::omm::Context::log(
            $crate::omm::log::LogSeverity::Trace,
            $source,
            format!($($arg)*)
        )
    };
}

#[macro_export]
macro_rules! omm_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::omm::Context::log(
            $crate::omm::log::LogSeverity::Debug,
            $source,
            format!($($arg)*)
        )
    };
}

#[macro_export]
macro_rules! omm_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::omm::Context::log(
            $crate::omm::log::LogSeverity::Info,
            $source,
            format!($($arg)*)
        )
    };
}

#[macro_export]
macro_rules! omm_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::omm::Context::log(
            $crate::omm::log::LogSeverity::Warn,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an ERROR message with the call site's file:line
#[macro_export]
macro_rules! omm_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::omm::Context::log_detailed(
            $crate::omm::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
