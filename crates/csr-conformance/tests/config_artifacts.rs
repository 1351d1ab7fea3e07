// crates/csr-conformance/tests/config_artifacts.rs
// ============================================================================
// Module: Config and Artifact Tests
// Description: File-backed configuration flowing into suites and reports.
// Purpose: Ensure on-disk config drives completion and reports persist.
// Dependencies: csr-conformance, serde_json, tempfile
// ============================================================================

//! ## Overview
//! Loads configuration from TOML files, completes suites against it, and
//! writes run reports and diagnostics to disk.

#![allow(
    clippy::use_debug,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only diagnostics are permitted."
)]

use std::fs;
use std::sync::Arc;

use csr_conformance::ConformanceConfig;
use csr_conformance::DiagnosticSink;
use csr_conformance::EXPERIMENTAL_CSR_CONTROLLERS;
use csr_conformance::FeatureSet;
use csr_conformance::FileDiagnosticSink;
use csr_conformance::Framework;
use csr_conformance::NoopDiagnosticSink;
use csr_conformance::Suite;
use csr_conformance::SuiteRunner;
use csr_conformance::feature::ED25519;

mod common;

use common::FakeIssuer;

type TestResult = Result<(), String>;

#[test]
fn config_file_drives_domain_and_gate() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("conformance.toml");
    fs::write(
        &path,
        r#"
feature_gates = ["ExperimentalCertificateSigningRequestControllers"]

[addons.ingress_controller]
domain = "ingress.example.net"
"#,
    )
    .map_err(|err| err.to_string())?;
    let config = ConformanceConfig::read_file(&path).map_err(|err| err.to_string())?;

    let issuer = FakeIssuer::new();
    let mut suite = Suite::new("CA", issuer.hooks()).map_err(|err| err.to_string())?;
    suite.complete(&config);
    if suite.domain("www").map_err(|err| err.to_string())? != "www.ingress.example.net" {
        return Err(format!("unexpected suffix: {}", suite.domain_suffix()));
    }

    let suite = Arc::new(suite);
    let framework = Framework::quiet(config);
    let mut runner = SuiteRunner::new(Arc::new(NoopDiagnosticSink));
    suite
        .it(&mut runner, &framework, "signs a request", &[], |_| Ok(()))
        .map_err(|err| err.to_string())?;
    let report = runner.run();
    if report.passed() != 1 {
        return Err(format!("expected gate from file to enable the case: {report:?}"));
    }
    Ok(())
}

#[test]
fn report_and_diagnostics_are_written_to_disk() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let diagnostics_path = dir.path().join("diagnostics.jsonl");
    let report_path = dir.path().join("report.json");
    let sink =
        Arc::new(FileDiagnosticSink::new(&diagnostics_path).map_err(|err| err.to_string())?);

    let mut config = ConformanceConfig::default();
    config.feature_gates.enable(EXPERIMENTAL_CSR_CONTROLLERS);
    let framework = Framework::new(config.clone(), Arc::clone(&sink) as Arc<dyn DiagnosticSink>);
    let issuer = FakeIssuer::new();
    let mut suite = Suite::new("Vault", issuer.hooks())
        .map_err(|err| err.to_string())?
        .with_unsupported_features(FeatureSet::from([ED25519]));
    suite.complete(&config);
    let suite = Arc::new(suite);

    let mut runner = SuiteRunner::new(sink);
    suite
        .it(&mut runner, &framework, "signs a request", &[], |_| Ok(()))
        .map_err(|err| err.to_string())?;
    suite
        .it(&mut runner, &framework, "signs ed25519", &[ED25519], |_| Ok(()))
        .map_err(|err| err.to_string())?;
    runner.run().write_json(&report_path).map_err(|err| err.to_string())?;

    let report: serde_json::Value =
        serde_json::from_slice(&fs::read(&report_path).map_err(|err| err.to_string())?)
            .map_err(|err| err.to_string())?;
    if report["cases"].as_array().map(Vec::len) != Some(1) {
        return Err(format!("unexpected report: {report}"));
    }

    let diagnostics = fs::read_to_string(&diagnostics_path).map_err(|err| err.to_string())?;
    let kinds: Vec<String> = diagnostics
        .lines()
        .map(|line| {
            serde_json::from_str::<serde_json::Value>(line)
                .map(|value| value["event"].as_str().unwrap_or_default().to_string())
                .map_err(|err| err.to_string())
        })
        .collect::<Result<_, _>>()?;
    for expected in ["case_registered", "case_skipped", "step", "case_finished"] {
        if !kinds.iter().any(|kind| kind == expected) {
            return Err(format!("missing {expected} event in {kinds:?}"));
        }
    }
    Ok(())
}
