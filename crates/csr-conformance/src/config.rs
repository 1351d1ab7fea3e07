// crates/csr-conformance/src/config.rs
// ============================================================================
// Module: Conformance Configuration
// Description: Environment and addon configuration for conformance runs.
// Purpose: Load, override, and validate the defaults suites complete against.
// Dependencies: serde, toml, thiserror
// ============================================================================

//! ## Overview
//! Configuration is an optional TOML file plus environment overrides. When no
//! file is named (argument or `CSR_CONFORMANCE_CONFIG`), defaults are used.
//! Files are read with a hard size limit and strict UTF-8; environment values
//! are read with strict UTF-8 and fail closed on invalid data. Gates named in
//! `FEATURE_GATES` are added to the gates listed in the file.
//!
//! ```toml
//! feature_gates = ["ExperimentalCertificateSigningRequestControllers"]
//!
//! [addons.ingress_controller]
//! domain = "ingress-nginx.http01.example.com"
//! ```

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::gates::FEATURE_GATES_ENV_VAR;
use crate::gates::FeatureGates;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable used to name the config file.
pub const CONFIG_ENV_VAR: &str = "CSR_CONFORMANCE_CONFIG";
/// Environment variable overriding the ingress controller domain.
pub const DOMAIN_ENV_VAR: &str = "CSR_CONFORMANCE_DOMAIN";
/// Default domain used when suites do not configure a suffix.
pub const DEFAULT_INGRESS_DOMAIN: &str = "ingress-nginx.http01.example.com";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of a DNS name.
pub(crate) const MAX_DOMAIN_LENGTH: usize = 253;
/// Maximum length of a single DNS label.
const MAX_LABEL_LENGTH: usize = 63;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Configuration shared by every suite in a conformance run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConformanceConfig {
    /// Addon configuration providing environment defaults.
    #[serde(default)]
    pub addons: AddonsConfig,
    /// Enabled feature gates.
    #[serde(default)]
    pub feature_gates: FeatureGates,
}

/// Addon configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonsConfig {
    /// Ingress controller addon settings.
    #[serde(default)]
    pub ingress_controller: IngressControllerConfig,
}

/// Ingress controller addon settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressControllerConfig {
    /// Domain appended to generated request names by default.
    #[serde(default = "default_ingress_domain")]
    pub domain: String,
}

impl Default for IngressControllerConfig {
    fn default() -> Self {
        Self {
            domain: default_ingress_domain(),
        }
    }
}

/// Returns the default ingress controller domain.
fn default_ingress_domain() -> String {
    DEFAULT_INGRESS_DOMAIN.to_string()
}

/// Environment values that override file configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    /// Raw `FEATURE_GATES` token list.
    pub feature_gates: Option<String>,
    /// Ingress controller domain override.
    pub domain: Option<String>,
}

impl EnvOverrides {
    /// Reads overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a value is not valid UTF-8.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            feature_gates: read_env_strict(FEATURE_GATES_ENV_VAR)?,
            domain: read_env_strict(DOMAIN_ENV_VAR)?,
        })
    }
}

impl ConformanceConfig {
    /// Loads configuration from disk and the process environment.
    ///
    /// `path` wins over `CSR_CONFORMANCE_CONFIG`; with neither, defaults are
    /// used. Environment overrides are applied last, then the result is
    /// validated.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match resolve_path(path)? {
            Some(resolved) => Self::read_file(&resolved)?,
            None => Self::default(),
        };
        config.apply_overrides(EnvOverrides::from_env()?);
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a configuration file without applying overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed.
    pub fn read_file(path: &Path) -> Result<Self, ConfigError> {
        validate_path(path)?;
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the TOML is malformed.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Applies environment overrides.
    ///
    /// `FEATURE_GATES` can only add gates: a gate enabled by the file stays
    /// enabled whatever other tokens the environment carries. A non-blank
    /// domain replaces the file domain.
    pub fn apply_overrides(&mut self, overrides: EnvOverrides) {
        if let Some(raw) = overrides.feature_gates {
            self.feature_gates.extend(&FeatureGates::parse(&raw));
        }
        if let Some(domain) = overrides.domain {
            let trimmed = domain.trim();
            if !trimmed.is_empty() {
                self.addons.ingress_controller.domain = trimmed.to_string();
            }
        }
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_domain("addons.ingress_controller.domain", &self.addons.ingress_controller.domain)
    }

    /// Returns the default domain suites complete against.
    #[must_use]
    pub fn default_domain(&self) -> &str {
        &self.addons.ingress_controller.domain
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, ConfigError> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("{name} must be valid UTF-8")))
    })
}

/// Resolves the config path from the argument or environment.
fn resolve_path(path: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(path) = path {
        return Ok(Some(path.to_path_buf()));
    }
    match read_env_strict(CONFIG_ENV_VAR)? {
        Some(value) if value.trim().is_empty() => {
            Err(ConfigError::Invalid(format!("{CONFIG_ENV_VAR} must not be empty")))
        }
        Some(value) => Ok(Some(PathBuf::from(value))),
        None => Ok(None),
    }
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a DNS domain used as a request suffix.
pub(crate) fn validate_domain(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if value.len() > MAX_DOMAIN_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for label in value.split('.') {
        if label.is_empty() {
            return Err(ConfigError::Invalid(format!("{field} has an empty label")));
        }
        if label.len() > MAX_LABEL_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} label too long")));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(ConfigError::Invalid(format!(
                "{field} label must not start or end with '-'"
            )));
        }
        if !label.bytes().all(|byte| byte.is_ascii_alphanumeric() || byte == b'-') {
            return Err(ConfigError::Invalid(format!("{field} contains invalid characters")));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
