//! Per-method noise magnitudes.

use crate::error::ConfigError;
use crate::matrix::Method;
use serde::{Deserialize, Serialize};

/// Standard deviation of the Gaussian noise injected into each weighted
/// requirement term, per method. Captured fresh for every run and copied
/// into each simulation unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseConfig {
    #[serde(rename = "SOP")]
    pub sop: f64,

    #[serde(rename = "ML")]
    pub ml: f64,

    #[serde(rename = "AStar")]
    pub astar: f64,
}

impl NoiseConfig {
    pub fn new(sop: f64, ml: f64, astar: f64) -> Self {
        Self { sop, ml, astar }
    }

    /// Same standard deviation for every method.
    pub fn uniform(std_dev: f64) -> Self {
        Self::new(std_dev, std_dev, std_dev)
    }

    /// No noise at all; every trial reproduces the baseline utility.
    pub fn zero() -> Self {
        Self::uniform(0.0)
    }

    /// Returns the standard deviation for `method`.
    pub fn std_dev(&self, method: Method) -> f64 {
        match method {
            Method::Sop => self.sop,
            Method::Ml => self.ml,
            Method::AStar => self.astar,
        }
    }

    /// Rejects negative or non-finite standard deviations.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for method in Method::all() {
            let value = self.std_dev(method);
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::noise(method, value));
            }
        }
        Ok(())
    }
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self::uniform(0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_zero_and_positive() {
        assert!(NoiseConfig::zero().validate().is_ok());
        assert!(NoiseConfig::new(0.0, 0.5, 2.0).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative() {
        let err = NoiseConfig::new(0.1, -0.2, 0.1).validate().unwrap_err();
        match err {
            ConfigError::InvalidNoise { method, value } => {
                assert_eq!(method, Method::Ml);
                assert_eq!(value, -0.2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_rejects_nan() {
        assert!(NoiseConfig::new(0.1, 0.1, f64::NAN).validate().is_err());
    }
}
