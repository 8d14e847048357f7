//! Run log for the operator.
//!
//! Entries are printed to stderr as they happen and kept in a process-wide
//! journal so the CLI can write the whole run as JSON at exit.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Mutex;

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Nesting level for grouped messages
    #[serde(default)]
    pub indent: u8,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), indent: 0 }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Error, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }
}

/// Global journal
pub static JOURNAL: Lazy<LogJournal> = Lazy::new(LogJournal::new);

/// Prints entries and keeps them for the end-of-run dump
pub struct LogJournal {
    entries: Mutex<Vec<LogEntry>>,
}

impl LogJournal {
    pub fn new() -> Self {
        Self { entries: Mutex::new(Vec::new()) }
    }

    /// Print an entry and record it
    pub fn log(&self, entry: LogEntry) {
        let prefix = match entry.level {
            LogLevel::Info => "   ",
            LogLevel::Success => "   ✓",
            LogLevel::Warning => "   ⚠️",
            LogLevel::Error => "   ❌",
        };
        let indent = "   ".repeat(entry.indent as usize);
        eprintln!("{}{} {}", indent, prefix, entry.message);
        self.record(entry);
    }

    /// Record an entry without printing it
    pub fn record(&self, entry: LogEntry) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }
    }

    /// Copy of everything logged so far
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Count of entries at a level
    pub fn count(&self, level: LogLevel) -> usize {
        self.entries
            .lock()
            .map(|e| e.iter().filter(|x| x.level == level).count())
            .unwrap_or(0)
    }

    /// Write the journal as a JSON array
    pub fn write_json(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(&self.snapshot())
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }
}

impl Default for LogJournal {
    fn default() -> Self {
        Self::new()
    }
}

pub fn log_info(msg: impl Into<String>) {
    JOURNAL.log(LogEntry::info(msg));
}

pub fn log_success(msg: impl Into<String>) {
    JOURNAL.log(LogEntry::success(msg));
}

pub fn log_warning(msg: impl Into<String>) {
    JOURNAL.log(LogEntry::warning(msg));
}

pub fn log_error(msg: impl Into<String>) {
    JOURNAL.log(LogEntry::error(msg));
}

pub fn log_info_indent(msg: impl Into<String>, indent: u8) {
    JOURNAL.log(LogEntry::info(msg).with_indent(indent));
}

pub fn log_warning_indent(msg: impl Into<String>, indent: u8) {
    JOURNAL.log(LogEntry::warning(msg).with_indent(indent));
}
