// crates/csr-conformance/src/runner.rs
// ============================================================================
// Module: Conformance Case Runner
// Description: Case registration seam and a sequential execution engine.
// Purpose: Register named cases, run them, and summarize the results.
// Dependencies: serde, serde_jcs, thiserror
// ============================================================================

//! ## Overview
//! Suites register cases through [`CaseRegistrar`], so any test engine can host
//! them. [`SuiteRunner`] is the bundled engine: it rejects duplicate names,
//! applies an optional focus filter, runs cases one at a time, converts stray
//! panics into failures, and produces a serializable [`SuiteReport`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::panic::AssertUnwindSafe;
use std::panic::catch_unwind;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;

use crate::diagnostics::DiagnosticEvent;
use crate::diagnostics::DiagnosticSink;
use crate::outcome::CaseFailure;
use crate::outcome::CaseOutcome;
use crate::outcome::FailureStage;
use crate::suite::panic_message;

// ============================================================================
// SECTION: Registration Seam
// ============================================================================

/// Deferred case execution handed to a test engine.
pub type RegisteredCase = Box<dyn FnOnce() -> CaseOutcome + Send + 'static>;

/// Test engine registration surface.
pub trait CaseRegistrar {
    /// Registers a named case for later execution.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] when the engine rejects the case.
    fn register(&mut self, name: &str, case: RegisteredCase) -> Result<(), RunnerError>;
}

/// Runner errors.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// A case with the same name is already registered.
    #[error("duplicate case name: {0}")]
    DuplicateCase(String),
    /// Case names must be non-empty.
    #[error("case name must be non-empty")]
    EmptyCaseName,
    /// Report artifact could not be written.
    #[error("report artifact error: {0}")]
    Artifact(String),
}

// ============================================================================
// SECTION: Reports
// ============================================================================

/// Reported status of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    /// Case passed.
    Passed,
    /// Case failed.
    Failed,
    /// Case was skipped.
    Skipped,
}

impl CaseStatus {
    /// Returns a stable label for the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

/// Result record for one executed case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseReport {
    /// Case name.
    pub name: String,
    /// Reported status.
    pub status: CaseStatus,
    /// Failure or skip message.
    pub message: Option<String>,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
    /// Full outcome.
    pub outcome: CaseOutcome,
}

/// Summary of a runner execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SuiteReport {
    /// Executed cases in registration order.
    pub cases: Vec<CaseReport>,
    /// Registered cases excluded by the focus filter.
    pub filtered: usize,
}

impl SuiteReport {
    /// Returns the number of passed cases.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.count(CaseStatus::Passed)
    }

    /// Returns the number of failed cases.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(CaseStatus::Failed)
    }

    /// Returns the number of skipped cases.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(CaseStatus::Skipped)
    }

    /// Returns true when no case failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Returns the report for a case by name.
    #[must_use]
    pub fn case(&self, name: &str) -> Option<&CaseReport> {
        self.cases.iter().find(|case| case.name == name)
    }

    /// Writes the report as canonical JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Artifact`] when serialization or the write fails.
    pub fn write_json(&self, path: &Path) -> Result<(), RunnerError> {
        let bytes = serde_jcs::to_vec(self).map_err(|err| RunnerError::Artifact(err.to_string()))?;
        fs::write(path, bytes).map_err(|err| RunnerError::Artifact(err.to_string()))
    }

    /// Counts cases with the given status.
    fn count(&self, status: CaseStatus) -> usize {
        self.cases.iter().filter(|case| case.status == status).count()
    }
}

// ============================================================================
// SECTION: Suite Runner
// ============================================================================

/// Sequential case engine.
pub struct SuiteRunner {
    /// Registered cases in registration order.
    cases: Vec<(String, RegisteredCase)>,
    /// Optional substring filter on case names.
    focus: Option<String>,
    /// Destination for case-finished diagnostics.
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl SuiteRunner {
    /// Creates an empty runner.
    #[must_use]
    pub fn new(diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            cases: Vec::new(),
            focus: None,
            diagnostics,
        }
    }

    /// Restricts execution to cases whose name contains `focus`.
    #[must_use]
    pub fn with_focus(mut self, focus: impl Into<String>) -> Self {
        self.focus = Some(focus.into());
        self
    }

    /// Returns the number of registered cases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Returns true when no case is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Returns registered case names in registration order.
    #[must_use]
    pub fn case_names(&self) -> Vec<&str> {
        self.cases.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Runs every focused case and returns the summary.
    #[must_use]
    pub fn run(self) -> SuiteReport {
        let mut report = SuiteReport::default();
        for (name, case) in self.cases {
            if let Some(focus) = &self.focus
                && !name.contains(focus.as_str())
            {
                report.filtered += 1;
                continue;
            }
            let started = Instant::now();
            let outcome = catch_unwind(AssertUnwindSafe(case)).unwrap_or_else(|payload| {
                CaseOutcome::Failed(CaseFailure::new(FailureStage::Body, panic_message(&*payload)))
            });
            let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            let status = match &outcome {
                CaseOutcome::Passed => CaseStatus::Passed,
                CaseOutcome::Failed(_) => CaseStatus::Failed,
                CaseOutcome::Skipped(_) => CaseStatus::Skipped,
            };
            let message = outcome.message();
            let summary = message.as_ref().map_or_else(
                || status.as_str().to_string(),
                |message| format!("{}: {message}", status.as_str()),
            );
            self.diagnostics.record(&DiagnosticEvent::case_finished(&name, summary));
            report.cases.push(CaseReport {
                name,
                status,
                message,
                duration_ms,
                outcome,
            });
        }
        report
    }
}

impl CaseRegistrar for SuiteRunner {
    fn register(&mut self, name: &str, case: RegisteredCase) -> Result<(), RunnerError> {
        if name.trim().is_empty() {
            return Err(RunnerError::EmptyCaseName);
        }
        if self.cases.iter().any(|(existing, _)| existing == name) {
            return Err(RunnerError::DuplicateCase(name.to_string()));
        }
        self.cases.push((name.to_string(), case));
        Ok(())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[path = "runner_tests.rs"]
mod runner_tests;
