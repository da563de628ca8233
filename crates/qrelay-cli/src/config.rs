//! Run configuration for the qrelay CLI.
//!
//! Values are resolved with the following precedence (highest first):
//! 1. Command-line flags
//! 2. Environment variables (`QRELAY_` prefix)
//! 3. Configuration file (YAML)
//! 4. Default values

use std::f64::consts::FRAC_PI_4;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use qrelay_adapter_sim::{DEFAULT_MAX_QUBITS, SimulatorBackend};

/// Environment variable overriding `shots`.
pub const ENV_SHOTS: &str = "QRELAY_SHOTS";
/// Environment variable overriding `seed`.
pub const ENV_SEED: &str = "QRELAY_SEED";
/// Environment variable overriding `theta`.
pub const ENV_THETA: &str = "QRELAY_THETA";
/// Environment variable overriding `max_qubits`.
pub const ENV_MAX_QUBITS: &str = "QRELAY_MAX_QUBITS";

/// Settings shared by the simulating subcommands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Shots per run
    #[serde(default = "default_shots")]
    pub shots: u32,

    /// Simulator seed; runs are not reproducible when absent
    #[serde(default)]
    pub seed: Option<u64>,

    /// Source preparation angle in radians
    #[serde(default = "default_theta")]
    pub theta: f64,

    /// Largest circuit the simulator accepts
    #[serde(default = "default_max_qubits")]
    pub max_qubits: u32,
}

fn default_shots() -> u32 {
    1024
}

fn default_theta() -> f64 {
    FRAC_PI_4
}

fn default_max_qubits() -> u32 {
    DEFAULT_MAX_QUBITS
}

impl Default for Config {
    fn default() -> Self {
        Config {
            shots: default_shots(),
            seed: None,
            theta: default_theta(),
            max_qubits: default_max_qubits(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;

        let config: Config =
            serde_yaml_ng::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;

        Ok(config)
    }

    /// Load the file (if any), then apply environment overrides.
    ///
    /// Values are not validated here; flags may still replace them.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Config::default(),
        };

        config.merge_vars(|key| std::env::var(key).ok())
    }

    /// Override fields with the variables `lookup` reports as set.
    ///
    /// Unset variables leave the corresponding fields unchanged.
    pub fn merge_vars<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_SHOTS) {
            self.shots = parse_var(ENV_SHOTS, &v)?;
        }
        if let Some(v) = lookup(ENV_SEED) {
            self.seed = Some(parse_var(ENV_SEED, &v)?);
        }
        if let Some(v) = lookup(ENV_THETA) {
            self.theta = parse_var(ENV_THETA, &v)?;
        }
        if let Some(v) = lookup(ENV_MAX_QUBITS) {
            self.max_qubits = parse_var(ENV_MAX_QUBITS, &v)?;
        }
        Ok(self)
    }

    /// Apply command-line flags on top of everything else.
    pub fn with_overrides(mut self, shots: Option<u32>, seed: Option<u64>, theta: Option<f64>) -> Self {
        if let Some(shots) = shots {
            self.shots = shots;
        }
        if seed.is_some() {
            self.seed = seed;
        }
        if let Some(theta) = theta {
            self.theta = theta;
        }
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shots == 0 {
            return Err(ConfigError::Validation(
                "shots must be greater than 0".to_string(),
            ));
        }

        if self.max_qubits == 0 {
            return Err(ConfigError::Validation(
                "max_qubits must be greater than 0".to_string(),
            ));
        }

        if !self.theta.is_finite() {
            return Err(ConfigError::Validation(format!(
                "theta must be finite, got {}",
                self.theta
            )));
        }

        Ok(())
    }

    /// Simulator honouring `max_qubits` and `seed`.
    pub fn backend(&self) -> SimulatorBackend {
        let backend = SimulatorBackend::with_max_qubits(self.max_qubits);
        match self.seed {
            Some(seed) => backend.with_seed(seed),
            None => backend,
        }
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Validation(format!("{key}: invalid value '{value}'")))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.shots, 1024);
        assert_eq!(config.seed, None);
        assert!((config.theta - FRAC_PI_4).abs() < 1e-12);
        assert_eq!(config.max_qubits, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qrelay.yaml");
        fs::write(&path, "shots: 4096\nseed: 42\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.shots, 4096);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.max_qubits, 20);
    }

    #[test]
    fn test_zero_shots_in_file_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qrelay.yaml");
        fs::write(&path, "shots: 0\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_flag_replaces_invalid_file_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qrelay.yaml");
        fs::write(&path, "shots: 0\nmax_qubits: 12\n").unwrap();

        let config = Config::load(Some(path.as_path()))
            .unwrap()
            .with_overrides(Some(100), None, None);
        assert!(config.validate().is_ok());
        assert_eq!(config.shots, 100);
        assert_eq!(config.max_qubits, 12);
    }

    #[test]
    fn test_flag_replaces_invalid_env_value() {
        let config = Config::default()
            .merge_vars(vars(&[(ENV_SHOTS, "0")]))
            .unwrap()
            .with_overrides(Some(100), None, None);
        assert!(config.validate().is_ok());
        assert_eq!(config.shots, 100);
    }

    #[test]
    fn test_from_file_unknown_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qrelay.yaml");
        fs::write(&path, "shots: 10\nbackend: ibm\n").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_file(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_env_overrides_file() {
        let base = Config {
            shots: 4096,
            ..Config::default()
        };
        let merged = base
            .merge_vars(vars(&[(ENV_SHOTS, "128"), (ENV_SEED, "7")]))
            .unwrap();
        assert_eq!(merged.shots, 128);
        assert_eq!(merged.seed, Some(7));
        assert_eq!(merged.max_qubits, 20);
    }

    #[test]
    fn test_env_invalid_value() {
        let err = Config::default()
            .merge_vars(vars(&[(ENV_THETA, "quarter-turn")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref m) if m.contains(ENV_THETA)));
    }

    #[test]
    fn test_flags_override_env() {
        let config = Config::default()
            .merge_vars(vars(&[(ENV_SHOTS, "128"), (ENV_THETA, "1.0")]))
            .unwrap()
            .with_overrides(Some(64), None, None);
        assert_eq!(config.shots, 64);
        assert!((config.theta - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_validate_zero_max_qubits() {
        let config = Config {
            max_qubits: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_backend_carries_seed() {
        let config = Config::default().with_overrides(None, Some(9), None);
        assert_eq!(config.backend().seed(), Some(9));
    }
}
