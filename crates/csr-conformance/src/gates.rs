// crates/csr-conformance/src/gates.rs
// ============================================================================
// Module: Feature Gates
// Description: Process-wide feature gate switches for the conformance run.
// Purpose: Parse `FEATURE_GATES` tokens into an injectable gate set.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Feature gates arrive as a comma-separated list of `name=value` tokens. A
//! gate is enabled when any token reads `name=true`; tokens without `=`, with
//! an empty name, or with any other value are ignored and never disable a gate
//! another token enabled. Names and values are matched ASCII
//! case-insensitively.
//!
//! The gate set is parsed once when configuration loads and is then passed to
//! suites explicitly, so gating never reads the process environment ad hoc.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable holding the feature gate token list.
pub const FEATURE_GATES_ENV_VAR: &str = "FEATURE_GATES";

/// Gate enabling the experimental certificate-signing-request controllers.
pub const EXPERIMENTAL_CSR_CONTROLLERS: &str = "ExperimentalCertificateSigningRequestControllers";

// ============================================================================
// SECTION: Feature Gates
// ============================================================================

/// Set of enabled feature gates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct FeatureGates {
    /// Lower-cased names of enabled gates.
    enabled: BTreeSet<String>,
}

impl FeatureGates {
    /// Creates an empty gate set (every gate disabled).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            enabled: BTreeSet::new(),
        }
    }

    /// Parses a comma-separated `name=value` token list.
    ///
    /// A gate is enabled when at least one `name=true` token is present.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut gates = Self::new();
        for token in raw.split(',') {
            let Some((name, value)) = token.split_once('=') else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            if value.trim().eq_ignore_ascii_case("true") {
                gates.enable(name);
            }
        }
        gates
    }

    /// Enables a gate by name.
    pub fn enable(&mut self, name: &str) {
        self.enabled.insert(name.to_ascii_lowercase());
    }

    /// Returns true when the named gate is enabled.
    #[must_use]
    pub fn is_enabled(&self, name: &str) -> bool {
        self.enabled.contains(&name.to_ascii_lowercase())
    }

    /// Returns true when the experimental CSR controller gate is enabled.
    #[must_use]
    pub fn csr_controllers_enabled(&self) -> bool {
        self.is_enabled(EXPERIMENTAL_CSR_CONTROLLERS)
    }

    /// Merges another gate set into this one; enabled gates accumulate and
    /// nothing already enabled is turned off.
    pub fn extend(&mut self, other: &Self) {
        self.enabled.extend(other.enabled.iter().cloned());
    }
}

impl fmt::Display for FeatureGates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, name) in self.enabled.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            write!(f, "{name}=true")?;
        }
        Ok(())
    }
}

impl From<Vec<String>> for FeatureGates {
    fn from(value: Vec<String>) -> Self {
        let mut gates = Self::new();
        for name in value {
            gates.enable(&name);
        }
        gates
    }
}

impl From<FeatureGates> for Vec<String> {
    fn from(value: FeatureGates) -> Self {
        value.enabled.into_iter().collect()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[path = "gates_tests.rs"]
mod gates_tests;
