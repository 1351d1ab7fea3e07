// crates/csr-conformance/src/diagnostics.rs
// ============================================================================
// Module: Conformance Diagnostics
// Description: Structured progress and skip events for conformance runs.
// Purpose: Emit JSON-line diagnostics without hard logging dependencies.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Suites and the runner report progress through a [`DiagnosticSink`]. Events
//! are small serializable records; the bundled sinks write them as JSON lines
//! to stderr or an append-only file, or drop them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Diagnostic event classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Case was not registered because a required feature is unsupported.
    CaseSkipped,
    /// Case was registered with the test engine.
    CaseRegistered,
    /// Lifecycle step inside a running case.
    Step,
    /// Case finished with a recorded status.
    CaseFinished,
}

/// Diagnostic event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticEvent {
    /// Event classification.
    pub event: DiagnosticKind,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Suite (issuer) name when known.
    pub suite: Option<String>,
    /// Case name.
    pub case: String,
    /// Human-readable message.
    pub message: String,
}

impl DiagnosticEvent {
    /// Creates an event with a consistent timestamp.
    #[must_use]
    pub fn new(
        event: DiagnosticKind,
        suite: Option<&str>,
        case: &str,
        message: impl Into<String>,
    ) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event,
            timestamp_ms,
            suite: suite.map(str::to_string),
            case: case.to_string(),
            message: message.into(),
        }
    }

    /// Creates a case-skipped event.
    #[must_use]
    pub fn case_skipped(suite: &str, case: &str, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::CaseSkipped, Some(suite), case, message)
    }

    /// Creates a case-registered event.
    #[must_use]
    pub fn case_registered(suite: &str, case: &str) -> Self {
        Self::new(DiagnosticKind::CaseRegistered, Some(suite), case, "registered")
    }

    /// Creates a lifecycle step event.
    #[must_use]
    pub fn step(suite: &str, case: &str, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Step, Some(suite), case, message)
    }

    /// Creates a case-finished event.
    #[must_use]
    pub fn case_finished(case: &str, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::CaseFinished, None, case, message)
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Append-only destination for diagnostic events.
pub trait DiagnosticSink: Send + Sync {
    /// Record a diagnostic event.
    fn record(&self, event: &DiagnosticEvent);
}

/// Diagnostic sink that logs JSON lines to stderr.
pub struct StderrDiagnosticSink;

impl DiagnosticSink for StderrDiagnosticSink {
    fn record(&self, event: &DiagnosticEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Diagnostic sink that logs JSON lines to a file.
pub struct FileDiagnosticSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileDiagnosticSink {
    /// Opens the diagnostic log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl DiagnosticSink for FileDiagnosticSink {
    fn record(&self, event: &DiagnosticEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op diagnostic sink.
pub struct NoopDiagnosticSink;

impl DiagnosticSink for NoopDiagnosticSink {
    fn record(&self, _event: &DiagnosticEvent) {}
}

// ============================================================================
// SECTION: Tests
// ============================================================================
