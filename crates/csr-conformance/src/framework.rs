// crates/csr-conformance/src/framework.rs
// ============================================================================
// Module: Conformance Framework Context
// Description: Shared run context handed to suites, hooks, and cases.
// Purpose: Carry configuration and the diagnostic sink through a run.
// Dependencies: crate::config, crate::diagnostics
// ============================================================================

//! ## Overview
//! A [`Framework`] is created once per conformance run and cloned into every
//! registered case. Cloning is cheap; configuration is immutable once the
//! framework exists.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use crate::config::ConformanceConfig;
use crate::diagnostics::DiagnosticEvent;
use crate::diagnostics::DiagnosticSink;
use crate::diagnostics::NoopDiagnosticSink;
use crate::gates::FeatureGates;

// ============================================================================
// SECTION: Framework
// ============================================================================

/// Run context shared by suites, hooks, and case bodies.
#[derive(Clone)]
pub struct Framework {
    /// Loaded conformance configuration.
    config: Arc<ConformanceConfig>,
    /// Destination for progress and skip diagnostics.
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl Framework {
    /// Creates a framework writing diagnostics to `diagnostics`.
    #[must_use]
    pub fn new(config: ConformanceConfig, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            config: Arc::new(config),
            diagnostics,
        }
    }

    /// Creates a framework that discards diagnostics.
    #[must_use]
    pub fn quiet(config: ConformanceConfig) -> Self {
        Self::new(config, Arc::new(NoopDiagnosticSink))
    }

    /// Returns the conformance configuration.
    #[must_use]
    pub fn config(&self) -> &ConformanceConfig {
        &self.config
    }

    /// Returns the enabled feature gates.
    #[must_use]
    pub fn feature_gates(&self) -> &FeatureGates {
        &self.config.feature_gates
    }

    /// Records a diagnostic event.
    pub fn emit(&self, event: &DiagnosticEvent) {
        self.diagnostics.record(event);
    }
}

impl fmt::Debug for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Framework").field("config", &self.config).finish_non_exhaustive()
    }
}
