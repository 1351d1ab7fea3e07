// crates/csr-conformance/src/suite.rs
// ============================================================================
// Module: Conformance Suite Controller
// Description: Issuer-bound suite that gates and drives conformance cases.
// Purpose: Decide whether a case runs and orchestrate the issuer lifecycle.
// Dependencies: crate::hooks, crate::runner, rand, thiserror
// ============================================================================

//! ## Overview
//! A [`Suite`] binds one issuer backend's hooks to the shared case battery.
//! Callers build it, call [`Suite::complete`] once, wrap it in an [`Arc`], and
//! then call [`Suite::it`] for every case.
//!
//! For each case `it` either skips immediately (a required feature is in the
//! backend's unsupported set) or registers exactly one case with the engine.
//! When the engine runs that case:
//! 1. A disabled CSR controller feature gate skips the case.
//! 2. `create_issuer` produces the signer name; a failure ends the case and no
//!    cleanup runs.
//! 3. The body runs with the signer name.
//! 4. `delete_issuer` runs whenever step 2 succeeded, whatever the body did.
//!
//! Panics from hooks and bodies are captured as failures. A cleanup failure is
//! reported on its own when the body passed, and attached to the body failure
//! otherwise.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::panic::catch_unwind;
use std::panic::resume_unwind;
use std::sync::Arc;

use rand::Rng;
use rand::distributions::Alphanumeric;
use thiserror::Error;

use crate::config::ConformanceConfig;
use crate::diagnostics::DiagnosticEvent;
use crate::feature::Feature;
use crate::feature::FeatureSet;
use crate::framework::Framework;
use crate::gates::EXPERIMENTAL_CSR_CONTROLLERS;
use crate::hooks::HookError;
use crate::hooks::SignerName;
use crate::hooks::SuiteHooks;
use crate::outcome::CaseError;
use crate::outcome::CaseFailure;
use crate::outcome::CaseOutcome;
use crate::outcome::FailureStage;
use crate::outcome::SkipReason;
use crate::request::CertificateSigningRequest;
use crate::request::SigningKey;
use crate::runner::CaseRegistrar;
use crate::runner::RunnerError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Length of labels produced by [`Suite::random_subdomain`].
const RANDOM_LABEL_LENGTH: usize = 12;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Suite usage errors.
#[derive(Debug, Error)]
pub enum SuiteError {
    /// Suite name was empty.
    #[error("suite name must be non-empty")]
    InvalidName,
    /// Suite was used before [`Suite::complete`] ran.
    #[error("suite {0} used before complete()")]
    NotCompleted(String),
    /// Domain label was empty or contained a dot.
    #[error("invalid domain label: '{0}'")]
    InvalidLabel(String),
    /// The test engine rejected the case.
    #[error(transparent)]
    Registration(#[from] RunnerError),
}

// ============================================================================
// SECTION: Registration
// ============================================================================

/// Result of offering a case to a suite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// Case was registered with the engine.
    Registered,
    /// Case was not registered.
    Skipped(SkipReason),
}

// ============================================================================
// SECTION: Suite
// ============================================================================

/// Conformance suite bound to one issuer backend.
#[derive(Debug)]
pub struct Suite {
    /// Issuer name, e.g. `SelfSigned` or `ACME`.
    name: String,
    /// Backend lifecycle hooks.
    hooks: SuiteHooks,
    /// Suffix for generated domain names; empty until completion defaults it.
    domain_suffix: String,
    /// Features this backend cannot satisfy.
    unsupported_features: FeatureSet,
    /// Set once [`Suite::complete`] has run.
    completed: bool,
}

impl Suite {
    /// Creates a suite for the named issuer.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::InvalidName`] when `name` is blank.
    pub fn new(name: impl Into<String>, hooks: SuiteHooks) -> Result<Self, SuiteError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SuiteError::InvalidName);
        }
        Ok(Self {
            name,
            hooks,
            domain_suffix: String::new(),
            unsupported_features: FeatureSet::new(),
            completed: false,
        })
    }

    /// Sets an explicit domain suffix instead of the environment default.
    #[must_use]
    pub fn with_domain_suffix(mut self, domain_suffix: impl Into<String>) -> Self {
        self.domain_suffix = domain_suffix.into();
        self
    }

    /// Declares the features this backend does not support.
    #[must_use]
    pub fn with_unsupported_features(mut self, features: FeatureSet) -> Self {
        self.unsupported_features = features;
        self
    }

    /// Returns the issuer name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the lifecycle hooks.
    #[must_use]
    pub const fn hooks(&self) -> &SuiteHooks {
        &self.hooks
    }

    /// Returns the domain suffix (empty before completion when unset).
    #[must_use]
    pub fn domain_suffix(&self) -> &str {
        &self.domain_suffix
    }

    /// Returns the unsupported feature set.
    #[must_use]
    pub const fn unsupported_features(&self) -> &FeatureSet {
        &self.unsupported_features
    }

    /// Returns true once [`Suite::complete`] has run.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Fills defaults from the environment configuration and marks the suite
    /// complete. An explicit domain suffix is never overwritten.
    pub fn complete(&mut self, config: &ConformanceConfig) {
        if self.domain_suffix.is_empty() {
            self.domain_suffix = config.default_domain().to_string();
        }
        self.completed = true;
    }

    /// Returns true when none of `required` is unsupported by this backend.
    #[must_use]
    pub fn check_features(&self, required: &[Feature]) -> bool {
        self.unsupported_required(required).is_empty()
    }

    /// Returns the members of `required` this backend does not support.
    #[must_use]
    pub fn unsupported_required(&self, required: &[Feature]) -> FeatureSet {
        self.unsupported_features.intersection(required)
    }

    /// Offers a case to the engine.
    ///
    /// Cases requiring an unsupported feature are skipped with one diagnostic
    /// and never registered. Otherwise exactly one case named `case` is
    /// registered; it runs the issuer lifecycle around `body`.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::NotCompleted`] before [`Suite::complete`] and
    /// [`SuiteError::Registration`] when the engine rejects the case.
    pub fn it<F>(
        self: &Arc<Self>,
        registrar: &mut dyn CaseRegistrar,
        framework: &Framework,
        case: &str,
        required: &[Feature],
        body: F,
    ) -> Result<Registration, SuiteError>
    where
        F: FnOnce(&SignerName) -> Result<(), CaseError> + Send + 'static,
    {
        if !self.completed {
            return Err(SuiteError::NotCompleted(self.name.clone()));
        }
        let unsupported = self.unsupported_required(required);
        if !unsupported.is_empty() {
            let reason = SkipReason::UnsupportedFeatures {
                features: unsupported,
            };
            framework.emit(&DiagnosticEvent::case_skipped(&self.name, case, reason.to_string()));
            return Ok(Registration::Skipped(reason));
        }

        let suite = Arc::clone(self);
        let case_framework = framework.clone();
        let case_name = case.to_string();
        registrar.register(
            case,
            Box::new(move || suite.run_case(&case_framework, &case_name, body)),
        )?;
        framework.emit(&DiagnosticEvent::case_registered(&self.name, case));
        Ok(Registration::Registered)
    }

    /// Runs the provision hook, if any, for a request about to be submitted.
    ///
    /// # Errors
    ///
    /// Returns the hook's [`HookError`].
    pub fn provision(
        &self,
        framework: &Framework,
        request: &mut CertificateSigningRequest,
        key: &SigningKey,
    ) -> Result<(), HookError> {
        self.hooks.provision().map_or(Ok(()), |provision| provision(framework, request, key))
    }

    /// Runs the deprovision hook, if any, for a submitted request.
    ///
    /// # Errors
    ///
    /// Returns the hook's [`HookError`].
    pub fn deprovision(
        &self,
        framework: &Framework,
        request: &CertificateSigningRequest,
    ) -> Result<(), HookError> {
        self.hooks.deprovision().map_or(Ok(()), |deprovision| deprovision(framework, request))
    }

    /// Runs `f` between provision and deprovision.
    ///
    /// Deprovision runs whenever provision succeeded, including when `f` fails
    /// or panics. When both `f` and deprovision fail, both errors are reported.
    ///
    /// # Errors
    ///
    /// Returns the provision error, the error from `f`, or the deprovision
    /// error, in that order of precedence.
    pub fn with_provisioned<T, F>(
        &self,
        framework: &Framework,
        request: &mut CertificateSigningRequest,
        key: &SigningKey,
        f: F,
    ) -> Result<T, CaseError>
    where
        F: FnOnce(&CertificateSigningRequest) -> Result<T, CaseError>,
    {
        self.provision(framework, request, key)?;
        let result = catch_unwind(AssertUnwindSafe(|| f(request)));
        let cleanup = self.deprovision(framework, request);
        match (result, cleanup) {
            (Err(payload), _) => resume_unwind(payload),
            (Ok(Ok(value)), Ok(())) => Ok(value),
            (Ok(Ok(_)), Err(err)) => Err(CaseError::Hook(err)),
            (Ok(Err(err)), Ok(())) => Err(err),
            (Ok(Err(err)), Err(cleanup)) => {
                Err(CaseError::Other(format!("{err}; deprovision also failed: {cleanup}")))
            }
        }
    }

    /// Returns `label` joined to the domain suffix.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError`] before completion or for an invalid label.
    pub fn domain(&self, label: &str) -> Result<String, SuiteError> {
        if !self.completed {
            return Err(SuiteError::NotCompleted(self.name.clone()));
        }
        if label.is_empty() || label.contains('.') {
            return Err(SuiteError::InvalidLabel(label.to_string()));
        }
        Ok(format!("{label}.{}", self.domain_suffix))
    }

    /// Returns a random lowercase label joined to the domain suffix.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::NotCompleted`] before completion.
    pub fn random_subdomain(&self) -> Result<String, SuiteError> {
        let label: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(RANDOM_LABEL_LENGTH)
            .map(|byte| char::from(byte).to_ascii_lowercase())
            .collect();
        self.domain(&label)
    }

    /// Executes one registered case.
    fn run_case<F>(&self, framework: &Framework, case: &str, body: F) -> CaseOutcome
    where
        F: FnOnce(&SignerName) -> Result<(), CaseError>,
    {
        if !framework.feature_gates().csr_controllers_enabled() {
            return CaseOutcome::Skipped(SkipReason::FeatureGateDisabled {
                gate: EXPERIMENTAL_CSR_CONTROLLERS.to_string(),
            });
        }

        framework.emit(&DiagnosticEvent::step(&self.name, case, "Creating an issuer resource"));
        let create_issuer = self.hooks.create_issuer();
        let signer = match catch_unwind(AssertUnwindSafe(|| create_issuer(framework))) {
            Ok(Ok(signer)) => signer,
            Ok(Err(err)) => {
                return CaseOutcome::Failed(CaseFailure::new(
                    FailureStage::CreateIssuer,
                    err.to_string(),
                ));
            }
            Err(payload) => {
                return CaseOutcome::Failed(CaseFailure::new(
                    FailureStage::CreateIssuer,
                    panic_message(&*payload),
                ));
            }
        };

        let body_result = match catch_unwind(AssertUnwindSafe(|| body(&signer))) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(err.to_string()),
            Err(payload) => Err(panic_message(&*payload)),
        };
        let cleanup_result = self.delete_issuer(framework, case, &signer);

        match (body_result, cleanup_result) {
            (Ok(()), Ok(())) => CaseOutcome::Passed,
            (Ok(()), Err(cleanup)) => {
                CaseOutcome::Failed(CaseFailure::new(FailureStage::DeleteIssuer, cleanup))
            }
            (Err(message), Ok(())) => {
                CaseOutcome::Failed(CaseFailure::new(FailureStage::Body, message))
            }
            (Err(message), Err(cleanup)) => CaseOutcome::Failed(CaseFailure {
                stage: FailureStage::Body,
                message,
                cleanup_error: Some(cleanup),
            }),
        }
    }

    /// Runs the delete-issuer hook when one is configured.
    fn delete_issuer(
        &self,
        framework: &Framework,
        case: &str,
        signer: &SignerName,
    ) -> Result<(), String> {
        let Some(delete_issuer) = self.hooks.delete_issuer() else {
            return Ok(());
        };
        framework.emit(&DiagnosticEvent::step(&self.name, case, "Cleaning up the issuer resource"));
        match catch_unwind(AssertUnwindSafe(|| delete_issuer(framework, signer))) {
            Ok(result) => result.map_err(|err| err.to_string()),
            Err(payload) => Err(panic_message(&*payload)),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Renders a captured panic payload as a failure message.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        return format!("panicked: {message}");
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return format!("panicked: {message}");
    }
    "panicked with a non-string payload".to_string()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[path = "suite_tests.rs"]
mod suite_tests;
