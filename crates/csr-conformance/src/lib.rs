// crates/csr-conformance/src/lib.rs
// ============================================================================
// Module: CSR Conformance Library
// Description: Reusable conformance suite controller for CSR issuers.
// Purpose: Run backend-agnostic signing-request cases against any issuer.
// Dependencies: serde, thiserror, toml, rand
// ============================================================================

//! ## Overview
//! `csr-conformance` runs a single battery of certificate-signing-request test
//! cases against interchangeable issuer backends. Each backend binds a
//! [`Suite`] to its own lifecycle hooks; the suite decides whether a case is
//! eligible (declared [`Feature`] requirements versus the backend's
//! unsupported set), gates execution on the experimental CSR controller
//! feature gate, and drives create-issuer, body, and delete-issuer around every
//! case.
//!
//! Cases are registered through the [`CaseRegistrar`] seam so any test engine
//! can host them; [`SuiteRunner`] is the bundled sequential engine.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod diagnostics;
pub mod feature;
pub mod framework;
pub mod gates;
pub mod hooks;
pub mod outcome;
pub mod request;
pub mod runner;
pub mod suite;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::AddonsConfig;
pub use config::ConfigError;
pub use config::ConformanceConfig;
pub use config::IngressControllerConfig;
pub use diagnostics::DiagnosticEvent;
pub use diagnostics::DiagnosticKind;
pub use diagnostics::DiagnosticSink;
pub use diagnostics::FileDiagnosticSink;
pub use diagnostics::NoopDiagnosticSink;
pub use diagnostics::StderrDiagnosticSink;
pub use feature::Feature;
pub use feature::FeatureSet;
pub use framework::Framework;
pub use gates::EXPERIMENTAL_CSR_CONTROLLERS;
pub use gates::FeatureGates;
pub use hooks::HookError;
pub use hooks::SignerName;
pub use hooks::SuiteHooks;
pub use outcome::CaseError;
pub use outcome::CaseFailure;
pub use outcome::CaseOutcome;
pub use outcome::FailureStage;
pub use outcome::SkipReason;
pub use request::CertificateSigningRequest;
pub use request::KeyAlgorithm;
pub use request::KeyUsage;
pub use request::SigningKey;
pub use runner::CaseRegistrar;
pub use runner::CaseReport;
pub use runner::CaseStatus;
pub use runner::RegisteredCase;
pub use runner::RunnerError;
pub use runner::SuiteReport;
pub use runner::SuiteRunner;
pub use suite::Registration;
pub use suite::Suite;
pub use suite::SuiteError;
