use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::metrics::NormOrder;

/// Weight on the static divergence used by `EpeConfig::default()`
pub const DEFAULT_ALPHA: f64 = 0.7;
/// Weight on the derivative divergence used by `EpeConfig::default()`
pub const DEFAULT_BETA: f64 = 0.3;

/// Parameters of the Epe metric computation.
///
/// `alpha` and `beta` are not required to sum to 1 and may be negative; their
/// meaning is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpeConfig {
    /// Weight on the static divergence ϝ
    pub alpha: f64,
    /// Weight on the derivative divergence δϝ
    pub beta: f64,
    /// Norm order used for both divergences
    pub p: NormOrder,
}

impl Default for EpeConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            beta: DEFAULT_BETA,
            p: NormOrder::EUCLIDEAN,
        }
    }
}

impl EpeConfig {
    /// Sets the fusion weights
    pub fn with_weights(mut self, alpha: f64, beta: f64) -> Self {
        self.alpha = alpha;
        self.beta = beta;
        self
    }

    /// Sets the norm order
    pub fn with_norm(mut self, p: NormOrder) -> Self {
        self.p = p;
        self
    }

    /// Parses a TOML table with optional `alpha`, `beta` and `p` keys.
    /// Missing keys keep their defaults; `p` is a number or `"inf"`.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        debug!(
            path = %path.display(),
            alpha = config.alpha,
            beta = config.beta,
            p = %config.p,
            "loaded epe config"
        );
        Ok(config)
    }

    /// Serializes the configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EpeError;

    #[test]
    fn test_defaults() {
        let config = EpeConfig::default();
        assert_eq!(config.alpha, 0.7);
        assert_eq!(config.beta, 0.3);
        assert_eq!(config.p, NormOrder::Finite(2.0));
    }

    #[test]
    fn test_from_toml_full() {
        let config = EpeConfig::from_toml_str("alpha = 0.6\nbeta = 0.4\np = \"inf\"\n").unwrap();
        assert_eq!(config.alpha, 0.6);
        assert_eq!(config.beta, 0.4);
        assert_eq!(config.p, NormOrder::Infinity);
    }

    #[test]
    fn test_from_toml_partial_and_integer_p() {
        let config = EpeConfig::from_toml_str("p = 1").unwrap();
        assert_eq!(config.alpha, DEFAULT_ALPHA);
        assert_eq!(config.beta, DEFAULT_BETA);
        assert_eq!(config.p, NormOrder::Finite(1.0));

        let empty = EpeConfig::from_toml_str("").unwrap();
        assert_eq!(empty, EpeConfig::default());
    }

    #[test]
    fn test_from_toml_rejects_bad_p() {
        let err = EpeConfig::from_toml_str("p = -2").unwrap_err();
        assert!(matches!(err, EpeError::Config(_)));

        let err = EpeConfig::from_toml_str("alpha = \"heavy\"").unwrap_err();
        assert!(matches!(err, EpeError::Config(_)));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = EpeConfig::default().with_weights(0.5, 0.5).with_norm(NormOrder::Infinity);
        let parsed = EpeConfig::from_toml_str(&config.to_toml_string().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = EpeConfig::load("/nonexistent/epes/config.toml").unwrap_err();
        assert!(matches!(err, EpeError::Io(_)));
    }
}
