// crates/csr-conformance/src/outcome.rs
// ============================================================================
// Module: Case Outcomes
// Description: Result variants for a single conformance case execution.
// Purpose: Keep skips distinct from failures without exception inspection.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A case ends as [`CaseOutcome::Passed`], [`CaseOutcome::Failed`], or
//! [`CaseOutcome::Skipped`]. Skips carry the reason (unsupported features or a
//! disabled feature gate); failures carry the lifecycle stage that failed and,
//! when issuer cleanup also failed after a body failure, the cleanup error
//! alongside the primary one.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::feature::FeatureSet;
use crate::hooks::HookError;

// ============================================================================
// SECTION: Case Errors
// ============================================================================

/// Errors returned by case bodies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaseError {
    /// An expectation about issuer behavior did not hold.
    #[error("assertion failed: {0}")]
    Assertion(String),
    /// A lifecycle hook invoked by the body failed.
    #[error(transparent)]
    Hook(#[from] HookError),
    /// Any other body failure.
    #[error("{0}")]
    Other(String),
}

impl CaseError {
    /// Creates an assertion failure.
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::Assertion(message.into())
    }
}

// ============================================================================
// SECTION: Skip Reasons
// ============================================================================

/// Why a case did not run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// The backend declared required features unsupported.
    UnsupportedFeatures {
        /// Required features the backend cannot satisfy.
        features: FeatureSet,
    },
    /// A process-wide feature gate is not enabled.
    FeatureGateDisabled {
        /// Name of the missing gate.
        gate: String,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFeatures {
                features,
            } => write!(f, "skipping case due to unsupported features: {features}"),
            Self::FeatureGateDisabled {
                gate,
            } => write!(
                f,
                "skipping CertificateSigningRequest controller test since FEATURE_GATE {gate} is \
                 not enabled"
            ),
        }
    }
}

// ============================================================================
// SECTION: Failures
// ============================================================================

/// Lifecycle stage at which a case failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// The create-issuer hook failed; no cleanup ran.
    CreateIssuer,
    /// The case body failed.
    Body,
    /// The delete-issuer hook failed after a passing body.
    DeleteIssuer,
}

impl FailureStage {
    /// Returns a stable label for the stage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateIssuer => "create issuer",
            Self::Body => "case body",
            Self::DeleteIssuer => "delete issuer",
        }
    }
}

/// Failure details for a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseFailure {
    /// Stage that produced the primary failure.
    pub stage: FailureStage,
    /// Primary failure message.
    pub message: String,
    /// Cleanup failure reported alongside a body failure.
    pub cleanup_error: Option<String>,
}

impl CaseFailure {
    /// Creates a failure without a secondary cleanup error.
    #[must_use]
    pub fn new(stage: FailureStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
            cleanup_error: None,
        }
    }
}

impl fmt::Display for CaseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.stage.as_str(), self.message)?;
        if let Some(cleanup) = &self.cleanup_error {
            write!(f, "; issuer cleanup also failed: {cleanup}")?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Case Outcome
// ============================================================================

/// Final result of one case execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum CaseOutcome {
    /// Case body and cleanup completed without error.
    Passed,
    /// Case failed.
    Failed(CaseFailure),
    /// Case was skipped.
    Skipped(SkipReason),
}

impl CaseOutcome {
    /// Returns true when the case passed.
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Returns true when the case failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Returns true when the case was skipped.
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }

    /// Returns the failure or skip message, if any.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Passed => None,
            Self::Failed(failure) => Some(failure.to_string()),
            Self::Skipped(reason) => Some(reason.to_string()),
        }
    }
}
