// crates/csr-conformance/src/request.rs
// ============================================================================
// Module: Signing Request Model
// Description: Certificate signing request data handed to issuer hooks.
// Purpose: Give provision/deprovision hooks a typed, backend-agnostic request.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Requests are plain data: the harness never parses or signs the PEM payload.
//! Provision hooks may annotate a request before it is submitted; deprovision
//! hooks receive the same request afterwards.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::hooks::SignerName;

// ============================================================================
// SECTION: Key Usage
// ============================================================================

/// Requested key usage on the issued certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum KeyUsage {
    /// Digital signature.
    #[serde(rename = "digital signature")]
    DigitalSignature,
    /// Key encipherment.
    #[serde(rename = "key encipherment")]
    KeyEncipherment,
    /// Certificate signing.
    #[serde(rename = "cert sign")]
    CertSign,
    /// TLS server authentication.
    #[serde(rename = "server auth")]
    ServerAuth,
    /// TLS client authentication.
    #[serde(rename = "client auth")]
    ClientAuth,
    /// Code signing.
    #[serde(rename = "code signing")]
    CodeSigning,
    /// Email protection.
    #[serde(rename = "email protection")]
    EmailProtection,
}

impl KeyUsage {
    /// Returns the wire label for the usage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DigitalSignature => "digital signature",
            Self::KeyEncipherment => "key encipherment",
            Self::CertSign => "cert sign",
            Self::ServerAuth => "server auth",
            Self::ClientAuth => "client auth",
            Self::CodeSigning => "code signing",
            Self::EmailProtection => "email protection",
        }
    }
}

impl fmt::Display for KeyUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Signing Key
// ============================================================================

/// Private key algorithm of a [`SigningKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAlgorithm {
    /// RSA key.
    Rsa,
    /// ECDSA key.
    Ecdsa,
    /// Ed25519 key.
    Ed25519,
}

/// Opaque private key material that produced a request.
///
/// The key is carried through to provision hooks that need it (for example to
/// prove possession to a backend) and is never inspected by the harness.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey {
    /// Key algorithm.
    algorithm: KeyAlgorithm,
    /// PKCS#8 PEM encoding of the key.
    pkcs8_pem: String,
}

impl SigningKey {
    /// Wraps PKCS#8 PEM key material.
    #[must_use]
    pub fn new(algorithm: KeyAlgorithm, pkcs8_pem: impl Into<String>) -> Self {
        Self {
            algorithm,
            pkcs8_pem: pkcs8_pem.into(),
        }
    }

    /// Returns the key algorithm.
    #[must_use]
    pub const fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    /// Returns the PKCS#8 PEM encoding.
    #[must_use]
    pub fn pkcs8_pem(&self) -> &str {
        &self.pkcs8_pem
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("algorithm", &self.algorithm)
            .field("pkcs8_pem", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// SECTION: Certificate Signing Request
// ============================================================================

/// Certificate signing request submitted to an issuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateSigningRequest {
    /// Resource name of the request.
    pub name: String,
    /// Signer expected to fulfil the request.
    pub signer_name: SignerName,
    /// PEM-encoded PKCS#10 request.
    pub request_pem: String,
    /// Requested key usages.
    #[serde(default)]
    pub usages: Vec<KeyUsage>,
    /// Requested certificate lifetime in seconds.
    #[serde(default)]
    pub expiration_seconds: Option<u32>,
    /// Free-form annotations hooks may add before submission.
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

impl CertificateSigningRequest {
    /// Creates a request for the given signer.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        signer_name: SignerName,
        request_pem: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            signer_name,
            request_pem: request_pem.into(),
            usages: Vec::new(),
            expiration_seconds: None,
            annotations: BTreeMap::new(),
        }
    }

    /// Sets the requested key usages.
    #[must_use]
    pub fn with_usages(mut self, usages: impl IntoIterator<Item = KeyUsage>) -> Self {
        self.usages = usages.into_iter().collect();
        self
    }

    /// Sets the requested lifetime.
    #[must_use]
    pub fn with_expiration_seconds(mut self, seconds: u32) -> Self {
        self.expiration_seconds = Some(seconds);
        self
    }

    /// Adds or replaces an annotation.
    pub fn annotate(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.annotations.insert(key.into(), value.into());
    }

    /// Returns an annotation value.
    #[must_use]
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.get(key).map(String::as_str)
    }
}
