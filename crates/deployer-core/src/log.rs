use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Debug,
    Info,
    Notice,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Notice => write!(f, "notice"),
            LogLevel::Warning => write!(f, "warning"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// Deployment log. Dispatchers only ever append to it, one call per line.
pub trait LogSink: Send + Sync {
    fn log(&self, message: &str, level: LogLevel);

    fn debug(&self, message: &str) {
        self.log(message, LogLevel::Debug);
    }
}

/// Forwards deployment log lines to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, message: &str, level: LogLevel) {
        match level {
            LogLevel::Debug => tracing::debug!(target: "deployer::log", "{}", message),
            LogLevel::Info | LogLevel::Notice => {
                tracing::info!(target: "deployer::log", "{}", message)
            }
            LogLevel::Warning => tracing::warn!(target: "deployer::log", "{}", message),
            LogLevel::Error => tracing::error!(target: "deployer::log", "{}", message),
        }
    }
}

/// Keeps every message in arrival order.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<(String, LogLevel)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(String, LogLevel)> {
        self.entries
            .lock()
            .map(|e| e.clone())
            .unwrap_or_default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries().into_iter().map(|(m, _)| m).collect()
    }

    /// Streamed output lines with their `> ` prefix removed.
    pub fn output_lines(&self) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter_map(|m| m.strip_prefix("> ").map(str::to_string))
            .collect()
    }
}

impl LogSink for MemorySink {
    fn log(&self, message: &str, level: LogLevel) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((message.to_string(), level));
        }
    }
}
