// crates/csr-conformance/src/hooks.rs
// ============================================================================
// Module: Issuer Lifecycle Hooks
// Description: Backend-specific callbacks bound into a conformance suite.
// Purpose: Let each issuer supply create/delete/provision/deprovision behavior.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A suite drives four hooks. `create_issuer` is required and returns the
//! [`SignerName`] that generated requests target; the other three are optional
//! and are skipped when absent. Hooks may block until backend resources are
//! ready. The suite only orders and invokes hooks; it never owns what they
//! create.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::framework::Framework;
use crate::request::CertificateSigningRequest;
use crate::request::SigningKey;

// ============================================================================
// SECTION: Signer Name
// ============================================================================

/// Identity of the issuer that should sign a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignerName(String);

impl SignerName {
    /// Creates a new signer name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the signer name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SignerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for SignerName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SignerName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors reported by issuer hooks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HookError {
    /// Backend call failed.
    #[error("issuer backend error: {0}")]
    Backend(String),
    /// Backend resource never became ready.
    #[error("issuer not ready: {0}")]
    NotReady(String),
    /// Request could not be prepared for the backend.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

// ============================================================================
// SECTION: Hook Types
// ============================================================================

/// Provisions an issuer and returns its signer name.
pub type CreateIssuerHook = dyn Fn(&Framework) -> Result<SignerName, HookError> + Send + Sync;

/// Releases an issuer created by [`CreateIssuerHook`].
pub type DeleteIssuerHook = dyn Fn(&Framework, &SignerName) -> Result<(), HookError> + Send + Sync;

/// Prepares backend resources just before a request is submitted.
pub type ProvisionHook = dyn Fn(
        &Framework,
        &mut CertificateSigningRequest,
        &SigningKey,
    ) -> Result<(), HookError>
    + Send
    + Sync;

/// Removes resources created by [`ProvisionHook`].
pub type DeprovisionHook =
    dyn Fn(&Framework, &CertificateSigningRequest) -> Result<(), HookError> + Send + Sync;

/// Lifecycle hooks bound to one issuer backend.
#[derive(Clone)]
pub struct SuiteHooks {
    /// Required issuer creation hook.
    create_issuer: Arc<CreateIssuerHook>,
    /// Optional issuer deletion hook.
    delete_issuer: Option<Arc<DeleteIssuerHook>>,
    /// Optional per-request provisioning hook.
    provision: Option<Arc<ProvisionHook>>,
    /// Optional per-request deprovisioning hook.
    deprovision: Option<Arc<DeprovisionHook>>,
}

impl SuiteHooks {
    /// Creates hooks with only the required issuer creation hook.
    pub fn new<F>(create_issuer: F) -> Self
    where
        F: Fn(&Framework) -> Result<SignerName, HookError> + Send + Sync + 'static,
    {
        Self {
            create_issuer: Arc::new(create_issuer),
            delete_issuer: None,
            provision: None,
            deprovision: None,
        }
    }

    /// Sets the issuer deletion hook.
    #[must_use]
    pub fn with_delete_issuer<F>(mut self, delete_issuer: F) -> Self
    where
        F: Fn(&Framework, &SignerName) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.delete_issuer = Some(Arc::new(delete_issuer));
        self
    }

    /// Sets the per-request provisioning hook.
    #[must_use]
    pub fn with_provision<F>(mut self, provision: F) -> Self
    where
        F: Fn(&Framework, &mut CertificateSigningRequest, &SigningKey) -> Result<(), HookError>
            + Send
            + Sync
            + 'static,
    {
        self.provision = Some(Arc::new(provision));
        self
    }

    /// Sets the per-request deprovisioning hook.
    #[must_use]
    pub fn with_deprovision<F>(mut self, deprovision: F) -> Self
    where
        F: Fn(&Framework, &CertificateSigningRequest) -> Result<(), HookError>
            + Send
            + Sync
            + 'static,
    {
        self.deprovision = Some(Arc::new(deprovision));
        self
    }

    /// Returns the issuer creation hook.
    #[must_use]
    pub fn create_issuer(&self) -> &CreateIssuerHook {
        self.create_issuer.as_ref()
    }

    /// Returns the issuer deletion hook when configured.
    #[must_use]
    pub fn delete_issuer(&self) -> Option<&DeleteIssuerHook> {
        self.delete_issuer.as_deref()
    }

    /// Returns the provisioning hook when configured.
    #[must_use]
    pub fn provision(&self) -> Option<&ProvisionHook> {
        self.provision.as_deref()
    }

    /// Returns the deprovisioning hook when configured.
    #[must_use]
    pub fn deprovision(&self) -> Option<&DeprovisionHook> {
        self.deprovision.as_deref()
    }
}

impl fmt::Debug for SuiteHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuiteHooks")
            .field("create_issuer", &true)
            .field("delete_issuer", &self.delete_issuer.is_some())
            .field("provision", &self.provision.is_some())
            .field("deprovision", &self.deprovision.is_some())
            .finish()
    }
}
