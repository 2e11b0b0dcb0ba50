//! Run configuration.

use crate::orchestrator::validate_run;
use serde::{Deserialize, Serialize};
use strateval_core::{ConfigError, NoiseConfig, SamplerKind};

/// Configuration for a simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Total trials, split across all units
    pub total_iterations: u64,

    /// Per-method noise standard deviations
    pub noise: NoiseConfig,

    /// Master seed (0 = unseeded, OS entropy)
    pub seed: u64,

    /// Pool size override (None = context default)
    pub units: Option<usize>,

    /// Gaussian noise source
    pub sampler: SamplerKind,
}

impl SimConfig {
    /// Checks the run parameters before anything is dispatched.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_run(self.total_iterations, &self.noise)
    }

    pub fn is_seeded(&self) -> bool {
        self.seed != 0
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            total_iterations: 1000,
            noise: NoiseConfig::default(),
            seed: 0,
            units: None,
            sampler: SamplerKind::BoxMuller,
        }
    }
}
