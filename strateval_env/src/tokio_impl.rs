//! Production implementation of ExecutionContext using Tokio.

use crate::context::{discover_parallelism, ExecutionContext};
use crate::error::EnvError;
use crate::types::RunId;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use tokio::runtime::Handle;

/// Production context backed by tokio's blocking pool and OS entropy.
///
/// Units are CPU-bound, so they go to `spawn_blocking` rather than the async
/// worker threads. Pool size defaults to the discovered hardware parallelism.
pub struct TokioContext {
    parallelism: usize,
}

impl TokioContext {
    /// Creates a context sized to the machine.
    pub fn new() -> Self {
        Self {
            parallelism: discover_parallelism(),
        }
    }

    /// Creates a context with an explicit pool size.
    pub fn with_parallelism(parallelism: usize) -> Result<Self, EnvError> {
        if parallelism == 0 {
            return Err(EnvError::InvalidParallelism(parallelism));
        }
        Ok(Self { parallelism })
    }

    /// Creates an Arc-wrapped context for sharing.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl Default for TokioContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionContext for TokioContext {
    fn parallelism(&self) -> usize {
        self.parallelism
    }

    fn spawn_unit<F>(&self, name: &str, job: F) -> Result<(), EnvError>
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = Handle::try_current()
            .map_err(|e| EnvError::no_runtime(format!("{} ({})", e, name)))?;
        // Detached: completion is reported through the job's own channel
        handle.spawn_blocking(job);
        Ok(())
    }

    fn unit_rng(&self, _unit: usize) -> ChaCha8Rng {
        ChaCha8Rng::from_entropy()
    }

    fn run_id(&self, _sequence: u64) -> RunId {
        RunId::new()
    }

    fn seed(&self) -> u64 {
        // Production is not seeded
        0
    }
}
