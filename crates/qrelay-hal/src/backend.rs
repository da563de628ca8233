//! Backend trait and configuration.
//!
//! The [`Backend`] trait is the seam between circuit construction and
//! execution:
//!
//! ```text
//!   capabilities() ──→ validate() ──→ run()
//!    (&ref)            (checked)     (blocking)
//! ```
//!
//! | Method | Required | Returns |
//! |--------|----------|---------|
//! | `name()` | yes | `&str` |
//! | `capabilities()` | yes | `&Capabilities` |
//! | `validate()` | yes | `HalResult<ValidationResult>` |
//! | `run()` | yes | `HalResult<ExecutionResult>` |
//!
//! Execution is synchronous: `run()` returns once every shot has finished.

use serde::{Deserialize, Serialize};

use qrelay_ir::Circuit;

use crate::capability::Capabilities;
use crate::error::{HalError, HalResult};
use crate::result::ExecutionResult;

/// Configuration for a backend instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Name of the backend.
    pub name: String,
    /// Backend-specific settings.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BackendConfig {
    /// Create a new backend configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Add extra configuration.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Read an unsigned integer from the extra map.
    ///
    /// Returns `Ok(None)` when the key is absent.
    pub fn extra_u64(&self, key: &str) -> HalResult<Option<u64>> {
        match self.extra.get(key) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => value.as_u64().map(Some).ok_or_else(|| {
                HalError::Configuration(format!("'{key}' must be a non-negative integer"))
            }),
        }
    }
}

/// Trait for execution backends.
///
/// # Contract
///
/// - `capabilities()` is infallible and cached at construction time.
/// - `validate()` checks a circuit against the backend's limits without
///   running it.
/// - `run()` rejects anything `validate()` would reject, then executes the
///   circuit `shots` times and returns the aggregated counts.
pub trait Backend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Get the capabilities of this backend.
    fn capabilities(&self) -> &Capabilities;

    /// Validate a circuit against backend constraints.
    fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult>;

    /// Execute a circuit for `shots` independent repetitions.
    fn run(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult>;
}

/// Result of circuit validation against backend constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Circuit can be executed as-is.
    Valid,
    /// Circuit cannot run on this backend.
    Invalid {
        /// Reasons the circuit is invalid.
        reasons: Vec<String>,
    },
}

impl ValidationResult {
    /// Check if the circuit is valid.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// Turn an `Invalid` verdict into `HalError::InvalidCircuit`.
    pub fn into_result(self) -> HalResult<()> {
        match self {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid { reasons } => {
                Err(HalError::InvalidCircuit(reasons.join("; ")))
            }
        }
    }
}

/// Trait for creating backends from configuration.
pub trait BackendFactory: Backend + Sized {
    /// Create a backend from configuration.
    fn from_config(config: BackendConfig) -> HalResult<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_config() {
        let config = BackendConfig::new("test").with_extra("seed", serde_json::json!(30));

        assert_eq!(config.name, "test");
        assert_eq!(config.extra_u64("seed").unwrap(), Some(30));
        assert_eq!(config.extra_u64("max_qubits").unwrap(), None);
    }

    #[test]
    fn test_extra_u64_rejects_non_integers() {
        let config = BackendConfig::new("test").with_extra("seed", serde_json::json!("abc"));
        assert!(matches!(
            config.extra_u64("seed"),
            Err(HalError::Configuration(_))
        ));
    }

    #[test]
    fn test_settings_flatten_into_extra() {
        let config: BackendConfig =
            serde_json::from_str(r#"{"name": "simulator", "max_qubits": 8, "seed": null}"#).unwrap();
        assert_eq!(config.name, "simulator");
        assert_eq!(config.extra_u64("max_qubits").unwrap(), Some(8));
        assert_eq!(config.extra_u64("seed").unwrap(), None);
    }

    #[test]
    fn test_validation_result() {
        assert!(ValidationResult::Valid.is_valid());
        assert!(ValidationResult::Valid.into_result().is_ok());

        let invalid = ValidationResult::Invalid {
            reasons: vec!["too wide".into(), "no measurement".into()],
        };
        assert!(!invalid.is_valid());
        match invalid.into_result() {
            Err(HalError::InvalidCircuit(msg)) => assert_eq!(msg, "too wide; no measurement"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
