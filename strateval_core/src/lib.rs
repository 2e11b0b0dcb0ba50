//! StratEval Core - Weighted multi-criteria utility evaluation
//!
//! This library holds the pure-math side of the Monte Carlo evaluation:
//! 1. **Score Matrix**: per-environment requirement weights and baseline scores
//! 2. **Samplers**: standard-normal noise sources (Box-Muller, Ziggurat)
//! 3. **Accumulators**: quantized histograms and running moments, both mergeable
//! 4. **Statistics**: mean, standard deviation, median and kσ intervals
//!
//! Nothing in this crate spawns threads or performs I/O beyond loading a
//! score matrix from disk. Parallel execution lives in `strateval_sim`.

pub mod aggregate;
pub mod error;
pub mod histogram;
pub mod matrix;
pub mod moments;
pub mod noise;
pub mod sampler;
pub mod stats;

// Re-export key types for convenience
pub use aggregate::{AggregateResult, AlignedSeries, Cell};
pub use error::ConfigError;
pub use histogram::Histogram;
pub use matrix::{Environment, Method, MethodScores, Requirement, ScoreMatrix};
pub use moments::MomentAccumulator;
pub use noise::NoiseConfig;
pub use sampler::{BoxMuller, GaussianSource, SamplerKind, Ziggurat};
pub use stats::{ConfidenceInterval, Summary};
