//! Diagnostic sink
//!
//! Errors, warnings and debug messages raised while reading definitions
//! and running behaviors. Every record is logged through `tracing`; with
//! capture enabled it is also kept so callers can inspect it.

use crate::error::Result;
use crate::resources::format_message;
use std::fmt::Display;

const MALFORMED_FORMAT_STRING: &str = "Blend.Resources.MalformedFormatStringInput";

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Debug,
}

/// A single reported diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Resource id, or `None` for free-form debug output
    pub id: Option<String>,
    pub message: String,
}

/// Diagnostic sink
#[derive(Debug, Default)]
pub struct Diagnostics {
    capture: bool,
    records: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new(capture: bool) -> Self {
        Self {
            capture,
            records: Vec::new(),
        }
    }

    pub fn set_capture(&mut self, capture: bool) {
        self.capture = capture;
    }

    /// Report a resource-keyed error
    pub fn report_error(&mut self, id: &str, args: &[&dyn Display]) {
        self.record(Severity::Error, id, format_message(id, args));
    }

    /// Report a resource-keyed warning
    pub fn report_warning(&mut self, id: &str, args: &[&dyn Display]) {
        self.record(Severity::Warning, id, format_message(id, args));
    }

    /// Log and keep a formatted record
    ///
    /// A template that fails to format is itself reported as an error
    /// under `Blend.Resources.MalformedFormatStringInput`, in place of the
    /// record it was meant to produce.
    fn record(&mut self, severity: Severity, id: &str, message: Result<String>) {
        match message {
            Ok(message) => {
                match severity {
                    Severity::Error => tracing::error!("{}", message),
                    Severity::Warning => tracing::warn!("{}", message),
                    Severity::Debug => tracing::debug!("{}", message),
                }
                self.push(severity, Some(id), message);
            }
            Err(err) => {
                tracing::error!(resource = id, "{}", err);
                self.push(Severity::Error, Some(MALFORMED_FORMAT_STRING), format!("{err} ({id})"));
            }
        }
    }

    /// Free-form debug output
    pub fn debug(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!("{}", message);
        self.push(Severity::Debug, None, message);
    }

    fn push(&mut self, severity: Severity, id: Option<&str>, message: String) {
        if self.capture {
            self.records.push(Diagnostic {
                severity,
                id: id.map(str::to_string),
                message,
            });
        }
    }

    /// Captured records, oldest first
    pub fn records(&self) -> &[Diagnostic] {
        &self.records
    }

    /// Drain captured records
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.records)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter().filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter().filter(|d| d.severity == Severity::Warning)
    }

    /// Number of captured records with the given resource id
    pub fn count(&self, id: &str) -> usize {
        self.records
            .iter()
            .filter(|d| d.id.as_deref() == Some(id))
            .count()
    }
}
