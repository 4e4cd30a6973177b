#![allow(missing_docs)]

//! Diagnostics produced while loading a route.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// How serious a reported message is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational.
    Information,
    /// Something was substituted or ignored.
    Warning,
    /// A field or file was invalid.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Information => "information",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(label)
    }
}

/// A single reported message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Fatal reports accompany a file load that was abandoned.
    pub fatal: bool,
    pub message: String,
}

/// Receiver for loader messages.
pub trait DiagnosticSink {
    /// Record a message. Fatal messages are only ever reported alongside an `Err`.
    fn report(&mut self, severity: Severity, fatal: bool, message: String);
}

/// Sink that keeps every message and mirrors it to `tracing`.
#[derive(Debug, Default, Clone)]
pub struct DiagnosticLog {
    entries: Vec<Diagnostic>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages in report order.
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Number of messages at the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.severity == severity)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DiagnosticSink for DiagnosticLog {
    fn report(&mut self, severity: Severity, fatal: bool, message: String) {
        match severity {
            Severity::Information => info!("{message}"),
            Severity::Warning => warn!("{message}"),
            Severity::Error if fatal => error!(fatal = true, "{message}"),
            Severity::Error => error!("{message}"),
        }
        self.entries.push(Diagnostic {
            severity,
            fatal,
            message,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_by_severity() {
        let mut log = DiagnosticLog::new();
        log.report(Severity::Warning, false, "substituted".to_string());
        log.report(Severity::Error, false, "bad field".to_string());
        log.report(Severity::Error, true, "bad header".to_string());

        assert_eq!(log.count(Severity::Error), 2);
        assert_eq!(log.count(Severity::Warning), 1);
        assert_eq!(log.count(Severity::Information), 0);
        assert!(log.entries()[2].fatal);
        assert!(!log.is_empty());
    }
}
