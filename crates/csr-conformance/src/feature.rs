// crates/csr-conformance/src/feature.rs
// ============================================================================
// Module: Conformance Features
// Description: Named capabilities declared by cases and backends.
// Purpose: Decide case eligibility by comparing required and unsupported sets.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`Feature`] is an opaque named token for an optional protocol behavior an
//! issuer may or may not implement. Cases declare the features they require;
//! backends declare the features they cannot satisfy as a [`FeatureSet`].
//! Equality, ordering, and hashing are by name only.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::collections::btree_set;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Feature
// ============================================================================

/// Named capability a backend may or may not support.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feature(Cow<'static, str>);

impl Feature {
    /// Creates a feature from a static name.
    #[must_use]
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Creates a feature from an owned or borrowed name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// Returns the feature name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Feature {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Feature {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Well-Known Features
// ============================================================================

/// Requests containing IP address SANs.
pub const IP_ADDRESS: Feature = Feature::from_static("IPAddress");
/// Requests carrying a requested certificate duration.
pub const DURATION: Feature = Feature::from_static("Duration");
/// Requests for wildcard DNS names.
pub const WILDCARDS: Feature = Feature::from_static("Wildcards");
/// Requests signed with ECDSA keys.
pub const ECDSA: Feature = Feature::from_static("ECDSA");
/// Requests signed with Ed25519 keys.
pub const ED25519: Feature = Feature::from_static("Ed25519");
/// Reuse of an existing private key across requests.
pub const REUSE_PRIVATE_KEY: Feature = Feature::from_static("ReusePrivateKey");
/// Requests containing URI SANs.
pub const URI_SANS: Feature = Feature::from_static("URISANs");
/// Requests setting a subject common name.
pub const COMMON_NAME: Feature = Feature::from_static("CommonName");
/// Requests with explicit key usage extensions.
pub const KEY_USAGES: Feature = Feature::from_static("KeyUsages");
/// Requests containing email SANs.
pub const EMAIL_SANS: Feature = Feature::from_static("EmailSANs");
/// Requests for a CA certificate.
pub const ISSUE_CA: Feature = Feature::from_static("IssueCA");
/// Requests with SANs only and no subject.
pub const ONLY_SAN: Feature = Feature::from_static("OnlySAN");
/// Issuers returning the issuing CA alongside the certificate.
pub const SAVE_CA_TO_SECRET: Feature = Feature::from_static("SaveCAToSecret");
/// Issuers returning the root CA alongside the certificate.
pub const SAVE_ROOT_CA_TO_SECRET: Feature = Feature::from_static("SaveRootCAToSecret");
/// Requests with DNS names longer than 64 characters.
pub const LONG_DOMAIN: Feature = Feature::from_static("LongDomain");

/// Returns every well-known feature in declaration order.
#[must_use]
pub fn well_known() -> [Feature; 15] {
    [
        IP_ADDRESS,
        DURATION,
        WILDCARDS,
        ECDSA,
        ED25519,
        REUSE_PRIVATE_KEY,
        URI_SANS,
        COMMON_NAME,
        KEY_USAGES,
        EMAIL_SANS,
        ISSUE_CA,
        ONLY_SAN,
        SAVE_CA_TO_SECRET,
        SAVE_ROOT_CA_TO_SECRET,
        LONG_DOMAIN,
    ]
}

// ============================================================================
// SECTION: Feature Set
// ============================================================================

/// Unique, order-independent set of features.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSet(BTreeSet<Feature>);

impl FeatureSet {
    /// Creates an empty feature set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Adds a feature; duplicates are ignored.
    pub fn add(&mut self, feature: Feature) {
        self.0.insert(feature);
    }

    /// Removes a feature if present.
    pub fn delete(&mut self, feature: &Feature) {
        self.0.remove(feature);
    }

    /// Returns true when the feature is in the set.
    #[must_use]
    pub fn contains(&self, feature: &Feature) -> bool {
        self.0.contains(feature)
    }

    /// Returns true when the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of features in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates features in name order.
    pub fn iter(&self) -> btree_set::Iter<'_, Feature> {
        self.0.iter()
    }

    /// Returns the features sorted by name.
    #[must_use]
    pub fn list(&self) -> Vec<Feature> {
        self.0.iter().cloned().collect()
    }

    /// Returns the members of `required` that are also in this set.
    #[must_use]
    pub fn intersection<'a, I>(&self, required: I) -> Self
    where
        I: IntoIterator<Item = &'a Feature>,
    {
        required.into_iter().filter(|feature| self.contains(feature)).cloned().collect()
    }
}

impl fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, feature) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            f.write_str(feature.as_str())?;
        }
        Ok(())
    }
}

impl FromIterator<Feature> for FeatureSet {
    fn from_iter<T: IntoIterator<Item = Feature>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[Feature; N]> for FeatureSet {
    fn from(value: [Feature; N]) -> Self {
        value.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a FeatureSet {
    type IntoIter = btree_set::Iter<'a, Feature>;
    type Item = &'a Feature;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[path = "feature_tests.rs"]
mod feature_tests;
