//! Logger implementations.
//!
//! - **TracingLogger**: forwards to `tracing` (production)
//! - **NoopLogger**: discards everything (sync test worker)
//! - **MemoryLogger**: keeps entries in memory so tests can assert on them

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::ports::{Level, Logger};

/// Emits one `tracing` event per message, tagged with `component`.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    tag: String,
}

impl TracingLogger {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::Debug => tracing::debug!(component = %self.tag, "{message}"),
            Level::Info => tracing::info!(component = %self.tag, "{message}"),
            Level::Warn => tracing::warn!(component = %self.tag, "{message}"),
            Level::Error => tracing::error!(component = %self.tag, "{message}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn log(&self, _level: Level, _message: &str) {}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub level: Level,
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Collects every message in memory, for assertions in tests.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything logged so far, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn at_level(&self, level: Level) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|entry| entry.level == level)
            .collect()
    }

    /// True if any entry's message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|entry| entry.message.contains(needle))
    }
}

impl Logger for MemoryLogger {
    fn log(&self, level: Level, message: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(LogEntry {
                level,
                message: message.to_string(),
                at: Utc::now(),
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_logger_keeps_order_and_level() {
        let logger = MemoryLogger::new();
        logger.info("starting");
        logger.error("Task: SendEmail");
        logger.debug("tick");

        let entries = logger.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].message, "starting");
        assert_eq!(logger.at_level(Level::Error).len(), 1);
        assert!(logger.contains("SendEmail"));
        assert!(!logger.contains("smtp"));
    }

    #[test]
    fn entries_serialize_with_lowercase_level() {
        let logger = MemoryLogger::new();
        logger.warn("careful");

        let json = serde_json::to_value(&logger.entries()[0]).unwrap();
        assert_eq!(json["level"], "warn");
        assert_eq!(json["message"], "careful");
    }

    #[test]
    fn noop_and_tracing_loggers_accept_every_level() {
        let tracing_logger = TracingLogger::new("BGW");
        assert_eq!(tracing_logger.tag(), "BGW");

        for level in [Level::Debug, Level::Info, Level::Warn, Level::Error] {
            NoopLogger.log(level, "ignored");
            tracing_logger.log(level, "no subscriber installed");
        }
    }
}
