//! Core execution context trait for StratEval simulation units.

use crate::error::EnvError;
use crate::types::RunId;
use rand_chacha::ChaCha8Rng;

/// Pool size used when hardware parallelism cannot be discovered.
pub const DEFAULT_PARALLELISM: usize = 4;

/// Discovered hardware parallelism, or [`DEFAULT_PARALLELISM`].
pub fn discover_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(DEFAULT_PARALLELISM)
}

/// The central interface between the orchestrator and the machine.
///
/// # Implementations
///
/// - **Production**: `TokioContext` - tokio blocking pool, OS entropy
/// - **Deterministic**: `SeededContext` (in `strateval_sim`) - fixed pool,
///   ChaCha8 streams derived from a master seed
///
/// # Determinism
///
/// Everything a run could observe nondeterministically (pool size, unit
/// randomness, run identity) is decided by the implementation.
pub trait ExecutionContext: Send + Sync + 'static {
    /// Number of simulation units a run is partitioned into (always ≥ 1).
    fn parallelism(&self) -> usize;

    /// Spawns a CPU-bound unit job.
    ///
    /// The job owns its inputs and reports back through channels it captured;
    /// the context never inspects the result.
    fn spawn_unit<F>(&self, name: &str, job: F) -> Result<(), EnvError>
    where
        F: FnOnce() + Send + 'static;

    /// Uniform stream for unit `unit` of a run.
    fn unit_rng(&self, unit: usize) -> ChaCha8Rng;

    /// Identity for the `sequence`-th run started on this context.
    fn run_id(&self, sequence: u64) -> RunId;

    /// Returns the context's seed (for logging/debugging).
    ///
    /// In production, returns 0 (not seeded).
    fn seed(&self) -> u64;
}
