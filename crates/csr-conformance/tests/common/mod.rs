// crates/csr-conformance/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Recording sinks and fake issuer backends for suite tests.
// Purpose: Observe hook ordering and diagnostics without a cluster.
// Dependencies: csr-conformance
// ============================================================================

//! ## Overview
//! Shared fixtures: an in-memory diagnostic sink, a fake issuer backend that
//! records every hook invocation, and framework builders with the CSR
//! controller gate on or off.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    reason = "Test-only fixtures favor direct unwrap/expect for clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;

use csr_conformance::ConformanceConfig;
use csr_conformance::DiagnosticEvent;
use csr_conformance::DiagnosticKind;
use csr_conformance::DiagnosticSink;
use csr_conformance::EXPERIMENTAL_CSR_CONTROLLERS;
use csr_conformance::FeatureGates;
use csr_conformance::Framework;
use csr_conformance::HookError;
use csr_conformance::SignerName;
use csr_conformance::SuiteHooks;

// ============================================================================
// SECTION: Diagnostics
// ============================================================================

/// Diagnostic sink that keeps every event in memory.
#[derive(Default)]
pub struct MemoryDiagnosticSink {
    /// Recorded events in emission order.
    events: Mutex<Vec<DiagnosticEvent>>,
}

impl MemoryDiagnosticSink {
    /// Returns a snapshot of recorded events.
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Returns recorded events of one kind.
    pub fn events_of(&self, kind: DiagnosticKind) -> Vec<DiagnosticEvent> {
        self.events().into_iter().filter(|event| event.event == kind).collect()
    }
}

impl DiagnosticSink for MemoryDiagnosticSink {
    fn record(&self, event: &DiagnosticEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Builds a framework with the CSR controller gate enabled or disabled.
pub fn framework(gate_enabled: bool) -> (Framework, Arc<MemoryDiagnosticSink>) {
    let mut config = ConformanceConfig::default();
    if gate_enabled {
        config.feature_gates = FeatureGates::parse(&format!("{EXPERIMENTAL_CSR_CONTROLLERS}=true"));
    }
    let sink = Arc::new(MemoryDiagnosticSink::default());
    (Framework::new(config, Arc::clone(&sink) as Arc<dyn DiagnosticSink>), sink)
}

// ============================================================================
// SECTION: Fake Issuer
// ============================================================================

/// Fake issuer backend recording hook invocations.
#[derive(Clone, Default)]
pub struct FakeIssuer {
    /// Hook invocations in call order.
    calls: Arc<Mutex<Vec<String>>>,
    /// Error returned by create-issuer when set.
    create_error: Option<HookError>,
    /// Error returned by delete-issuer when set.
    delete_error: Option<HookError>,
}

impl FakeIssuer {
    /// Creates a backend whose hooks succeed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes create-issuer fail.
    pub fn failing_create(mut self, message: &str) -> Self {
        self.create_error = Some(HookError::Backend(message.to_string()));
        self
    }

    /// Makes delete-issuer fail.
    pub fn failing_delete(mut self, message: &str) -> Self {
        self.delete_error = Some(HookError::Backend(message.to_string()));
        self
    }

    /// Returns recorded hook invocations.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns the shared call log so case bodies can append to it.
    pub fn log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.calls)
    }

    /// Builds suite hooks bound to this backend.
    pub fn hooks(&self) -> SuiteHooks {
        let create_calls = Arc::clone(&self.calls);
        let create_error = self.create_error.clone();
        let delete_calls = Arc::clone(&self.calls);
        let delete_error = self.delete_error.clone();
        SuiteHooks::new(move |_| {
            create_calls.lock().unwrap().push("create".to_string());
            create_error.clone().map_or_else(|| Ok(SignerName::new("example.com/signer")), Err)
        })
        .with_delete_issuer(move |_, signer| {
            delete_calls.lock().unwrap().push(format!("delete {signer}"));
            delete_error.clone().map_or(Ok(()), Err)
        })
    }
}
