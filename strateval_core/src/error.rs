//! Error types for StratEval configuration.

use crate::matrix::Method;
use thiserror::Error;

/// Errors raised while validating run parameters or loading a score matrix.
///
/// All of these are detected before any simulation unit is dispatched.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Total iteration count must be a positive integer
    #[error("Invalid iteration count: {0} (must be at least 1)")]
    InvalidIterations(u64),

    /// A method's noise standard deviation is negative or not finite
    #[error("Invalid noise for {method}: {value} (must be a finite value >= 0)")]
    InvalidNoise { method: Method, value: f64 },

    /// Score matrix JSON could not be parsed
    #[error("Score matrix parse error: {0}")]
    MatrixParse(#[from] serde_json::Error),

    /// Score matrix file could not be read
    #[error("Score matrix I/O error: {0}")]
    MatrixIo(#[from] std::io::Error),

    /// Unrecognized method name
    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    /// Unrecognized environment name
    #[error("Unknown environment: {0}")]
    UnknownEnvironment(String),
}

impl ConfigError {
    /// Creates a noise validation error.
    pub fn noise(method: Method, value: f64) -> Self {
        Self::InvalidNoise { method, value }
    }
}
