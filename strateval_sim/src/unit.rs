//! Simulation Unit - the stochastic scoring loop.
//!
//! A unit owns an immutable snapshot of its inputs (shared matrix, copied
//! noise config, its own RNG) and produces a local [`AggregateResult`] over
//! its assigned trial count. Units never share mutable state.

use rand::Rng;
use std::sync::Arc;
use strateval_core::{
    AggregateResult, BoxMuller, Environment, GaussianSource, Method, NoiseConfig, SamplerKind,
    ScoreMatrix, Ziggurat,
};
use strateval_env::CancelToken;

/// Minimum number of evenly spaced progress emissions per unit.
pub const PROGRESS_STEPS: u64 = 5;

/// Trials between cancellation checks, independent of progress cadence.
const CANCEL_CHECK_INTERVAL: u64 = 256;

/// When a unit reports progress.
///
/// Emits at trial 0, every `stride` trials and at the last trial, with
/// `stride = max(1, trials / PROGRESS_STEPS)` so small trial counts still get
/// a well-defined cadence.
#[derive(Debug, Clone, Copy)]
pub struct ProgressSchedule {
    trials: u64,
    stride: u64,
}

impl ProgressSchedule {
    pub fn new(trials: u64) -> Self {
        Self {
            trials,
            stride: (trials / PROGRESS_STEPS).max(1),
        }
    }

    pub fn stride(&self) -> u64 {
        self.stride
    }

    /// True if progress should be reported after trial `i` (0-based).
    pub fn should_emit(&self, i: u64) -> bool {
        i % self.stride == 0 || i + 1 == self.trials
    }

    /// Fraction complete after trial `i`.
    pub fn fraction(&self, i: u64) -> f64 {
        ((i + 1) as f64 / self.trials as f64).min(1.0)
    }
}

/// One independent slice of a run.
#[derive(Debug, Clone)]
pub struct SimulationUnit {
    matrix: Arc<ScoreMatrix>,
    noise: NoiseConfig,
    trials: u64,
    sampler: SamplerKind,
}

impl SimulationUnit {
    pub fn new(matrix: Arc<ScoreMatrix>, noise: NoiseConfig, trials: u64) -> Self {
        Self {
            matrix,
            noise,
            trials,
            sampler: SamplerKind::default(),
        }
    }

    /// Sets the Gaussian noise source.
    pub fn with_sampler(mut self, sampler: SamplerKind) -> Self {
        self.sampler = sampler;
        self
    }

    pub fn trials(&self) -> u64 {
        self.trials
    }

    /// Runs the unit, drawing uniforms from `rng`.
    ///
    /// Returns `None` if `cancel` fired before the last trial; nothing else
    /// is reported after that point.
    pub fn run<R, P>(&self, rng: R, cancel: &CancelToken, progress: P) -> Option<AggregateResult>
    where
        R: Rng,
        P: FnMut(f64),
    {
        match self.sampler {
            SamplerKind::BoxMuller => self.run_with(&mut BoxMuller::new(rng), cancel, progress),
            SamplerKind::Ziggurat => self.run_with(&mut Ziggurat::new(rng), cancel, progress),
        }
    }

    /// Runs the unit against an explicit noise source.
    pub fn run_with<G, P>(
        &self,
        source: &mut G,
        cancel: &CancelToken,
        mut progress: P,
    ) -> Option<AggregateResult>
    where
        G: GaussianSource,
        P: FnMut(f64),
    {
        let mut result = AggregateResult::new();

        if self.trials == 0 {
            progress(1.0);
            return Some(result);
        }

        let schedule = ProgressSchedule::new(self.trials);

        for i in 0..self.trials {
            if i % CANCEL_CHECK_INTERVAL == 0 && cancel.is_cancelled() {
                return None;
            }

            for env in Environment::all() {
                let requirements = self.matrix.requirements(env);
                for method in Method::all() {
                    let sigma = self.noise.std_dev(method);
                    let utility: f64 = requirements
                        .iter()
                        .map(|r| r.weighted_score(method) + sigma * source.sample())
                        .sum();
                    result.record(env, method, utility);
                }
            }
            result.complete_trial();

            if schedule.should_emit(i) {
                if cancel.is_cancelled() {
                    return None;
                }
                progress(schedule.fraction(i));
            }
        }

        Some(result)
    }
}
