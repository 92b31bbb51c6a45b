//! Per-file structured diagnostics
//!
//! Every rule execution gets a [`FileLog`] bound to the file it is working
//! on. Messages are append-only and keep insertion order; severity is used
//! later for display sorting only, never to reorder causality.

use serde::Serialize;
use std::fmt;

/// Message severity. `display_rank` orders errors first for report output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
}

impl Severity {
    /// Sort key for display: error < warn < info < debug.
    pub fn display_rank(self) -> u8 {
        match self {
            Severity::Error => 0,
            Severity::Warn => 1,
            Severity::Info => 2,
            Severity::Debug => 3,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Debug => f.write_str("debug"),
            Severity::Info => f.write_str("info"),
            Severity::Warn => f.write_str("warn"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// One diagnostic message. Never mutated after append.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Identifier of the emitting rule (or pipeline stage).
    pub source: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Append-only diagnostic sink bound to a single file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileLog {
    messages: Vec<Diagnostic>,
}

impl FileLog {
    pub fn new() -> Self {
        FileLog::default()
    }

    fn push(&mut self, severity: Severity, source: &str, text: String, link: Option<String>) {
        self.messages.push(Diagnostic {
            severity,
            source: source.to_string(),
            text,
            link,
        });
    }

    pub fn debug(&mut self, source: &str, text: impl Into<String>) {
        self.push(Severity::Debug, source, text.into(), None);
    }

    pub fn info(&mut self, source: &str, text: impl Into<String>) {
        self.push(Severity::Info, source, text.into(), None);
    }

    pub fn warn(&mut self, source: &str, text: impl Into<String>) {
        self.push(Severity::Warn, source, text.into(), None);
    }

    pub fn error(&mut self, source: &str, text: impl Into<String>) {
        self.push(Severity::Error, source, text.into(), None);
    }

    pub fn error_with_link(
        &mut self,
        source: &str,
        text: impl Into<String>,
        link: impl Into<String>,
    ) {
        self.push(Severity::Error, source, text.into(), Some(link.into()));
    }

    /// Messages in insertion order.
    pub fn messages(&self) -> &[Diagnostic] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.severity == Severity::Error)
    }

    /// Messages cloned and sorted by severity for display. The sort is
    /// stable, so insertion order is preserved within a severity.
    pub fn messages_for_display(&self) -> Vec<Diagnostic> {
        let mut sorted = self.messages.clone();
        sorted.sort_by_key(|m| m.severity.display_rank());
        sorted
    }
}
