// crates/csr-conformance/src/gates_tests.rs
// ============================================================================
// Module: Feature Gate Unit Tests
// Description: Unit coverage for FEATURE_GATES token parsing.
// Purpose: Ensure a present `name=true` token enables a gate.
// Dependencies: csr-conformance
// ============================================================================

//! ## Overview
//! Unit coverage for `FEATURE_GATES` token parsing.
//! Invariants:
//! - Missing, empty, or malformed tokens leave gates disabled.
//! - Any `name=true` token enables the gate regardless of other tokens.

use super::EXPERIMENTAL_CSR_CONTROLLERS;
use super::FeatureGates;

/// Token enabling the CSR controller gate.
const ENABLE_TOKEN: &str = "ExperimentalCertificateSigningRequestControllers=true";
/// Token carrying a non-enabling value for the CSR controller gate.
const DISABLE_TOKEN: &str = "ExperimentalCertificateSigningRequestControllers=false";

#[test]
fn exact_true_token_enables_gate() {
    let gates = FeatureGates::parse(ENABLE_TOKEN);
    assert!(gates.csr_controllers_enabled());
}

#[test]
fn upper_case_token_enables_gate() {
    let gates = FeatureGates::parse("EXPERIMENTALCERTIFICATESIGNINGREQUESTCONTROLLERS=true");
    assert!(gates.csr_controllers_enabled());
}

#[test]
fn gate_found_among_other_tokens() {
    let raw = format!("AdditionalCertificateOutputFormats=true, {ENABLE_TOKEN}");
    let gates = FeatureGates::parse(&raw);
    assert!(gates.csr_controllers_enabled());
    assert!(gates.is_enabled("AdditionalCertificateOutputFormats"));
}

#[test]
fn empty_and_malformed_inputs_disable_gate() {
    assert!(!FeatureGates::parse("").csr_controllers_enabled());
    assert!(!FeatureGates::parse(EXPERIMENTAL_CSR_CONTROLLERS).csr_controllers_enabled());
    assert!(!FeatureGates::parse("=true,,").csr_controllers_enabled());
}

#[test]
fn non_true_values_disable_gate() {
    assert!(!FeatureGates::parse(DISABLE_TOKEN).csr_controllers_enabled());
    let numeric = FeatureGates::parse("ExperimentalCertificateSigningRequestControllers=1");
    assert!(!numeric.csr_controllers_enabled());
}

#[test]
fn true_token_enables_gate_whatever_its_position() {
    let before = FeatureGates::parse(&format!("{ENABLE_TOKEN},{DISABLE_TOKEN}"));
    assert!(before.csr_controllers_enabled(), "enabling token listed first");
    let after = FeatureGates::parse(&format!("{DISABLE_TOKEN},{ENABLE_TOKEN}"));
    assert!(after.csr_controllers_enabled(), "enabling token listed last");
}

#[test]
fn display_round_trips_through_parse() {
    let mut gates = FeatureGates::new();
    gates.enable("Alpha");
    gates.enable(EXPERIMENTAL_CSR_CONTROLLERS);
    let reparsed = FeatureGates::parse(&gates.to_string());
    assert_eq!(reparsed, gates);
}

#[test]
fn extend_accumulates_enabled_gates() {
    let mut gates = FeatureGates::parse("Alpha=true");
    gates.extend(&FeatureGates::parse("Beta=true,Alpha=false"));
    assert!(gates.is_enabled("alpha"));
    assert!(gates.is_enabled("BETA"));
}
