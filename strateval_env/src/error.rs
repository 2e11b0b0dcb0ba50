//! Error types for the StratEval environment abstraction.

use thiserror::Error;

/// Errors that can occur in the environment abstraction layer.
#[derive(Debug, Error)]
pub enum EnvError {
    /// No async runtime is available to host unit jobs
    #[error("No tokio runtime available: {0}")]
    NoRuntime(String),

    /// Pool size must be at least one unit
    #[error("Invalid parallelism: {0} (must be at least 1)")]
    InvalidParallelism(usize),
}

impl EnvError {
    /// Creates a missing-runtime error.
    pub fn no_runtime(msg: impl std::fmt::Display) -> Self {
        Self::NoRuntime(msg.to_string())
    }
}
