//! Orchestrator - partitions a run, dispatches units and merges their partials.
//!
//! # Run lifecycle
//!
//! ```text
//!   start_run(total, noise)
//!        │  validate → cancel previous run → partition → spawn P units
//!        ▼
//!   ┌──────────┐  UnitMessage{run, unit, Progress(f)}   ┌──────────────┐
//!   │ unit 0..P│ ─────────────────────────────────────► │ next_event() │
//!   │ (blocking│  UnitMessage{run, unit, Finished(agg)} │  stale? drop │
//!   │   pool)  │ ─────────────────────────────────────► │  merge       │
//!   └──────────┘                                        └──────┬───────┘
//!                                                              ▼
//!                                   RunEvent::Progress / RunEvent::Completed (once)
//! ```
//!
//! Every run gets a fresh channel, cancel token and aggregate. Starting a new
//! run cancels the old token and drops the old receiver; any message that
//! still carries an old run id is discarded.

use crate::unit::SimulationUnit;
use std::sync::Arc;
use strateval_core::{AggregateResult, ConfigError, NoiseConfig, SamplerKind, ScoreMatrix};
use strateval_env::{CancelToken, EnvError, ExecutionContext, RunId};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Errors surfaced by the orchestrator.
#[derive(Debug, Error)]
pub enum RunError {
    /// Run parameters rejected before dispatch
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Units could not be dispatched
    #[error("Environment error: {0}")]
    Env(#[from] EnvError),

    /// Every unit channel closed before all units reported
    #[error("Run {run} stalled: {reported}/{units} units reported")]
    Stalled {
        run: RunId,
        reported: usize,
        units: usize,
    },

    /// Results could not be serialized or written
    #[error("Export failed: {0}")]
    Export(#[from] std::io::Error),
}

/// What a unit reports.
#[derive(Debug)]
pub enum UnitReport {
    /// Fraction of the unit's trials done, in [0, 1]
    Progress(f64),

    /// The unit's complete local result
    Finished(AggregateResult),
}

/// Message from a unit to the orchestrator, tagged with its run.
#[derive(Debug)]
pub struct UnitMessage {
    pub run: RunId,
    pub unit: usize,
    pub report: UnitReport,
}

/// Outbound events of a run.
#[derive(Debug, Clone)]
pub enum RunEvent {
    /// Pool-average progress (unweighted mean of per-unit fractions)
    Progress { run: RunId, fraction: f64 },

    /// All units reported; emitted exactly once per completed run
    Completed {
        run: RunId,
        result: Arc<AggregateResult>,
    },
}

/// Splits `total` trials across `units` units.
///
/// Every unit gets `total / units`; the last unit also absorbs the
/// remainder, so the counts always sum to `total`.
pub fn partition(total: u64, units: usize) -> Vec<u64> {
    let units = units.max(1);
    let base = total / units as u64;
    let mut counts = vec![base; units];
    counts[units - 1] = total - base * (units as u64 - 1);
    counts
}

/// Checks run parameters; nothing is dispatched if this fails.
pub fn validate_run(total_iterations: u64, noise: &NoiseConfig) -> Result<(), ConfigError> {
    if total_iterations == 0 {
        return Err(ConfigError::InvalidIterations(total_iterations));
    }
    noise.validate()
}

/// State of the run currently in flight.
struct ActiveRun {
    id: RunId,
    cancel: CancelToken,
    rx: mpsc::UnboundedReceiver<UnitMessage>,
    unit_progress: Vec<f64>,
    finished: Vec<bool>,
    reported: usize,
    aggregate: AggregateResult,
    stalled: bool,
}

impl ActiveRun {
    fn units(&self) -> usize {
        self.unit_progress.len()
    }

    fn fraction(&self) -> f64 {
        self.unit_progress.iter().sum::<f64>() / self.units() as f64
    }

    fn is_complete(&self) -> bool {
        self.reported == self.units()
    }

    /// Applies a progress report. Returns false if it changed nothing worth
    /// announcing (unknown unit or unit already finished).
    fn apply_progress(&mut self, unit: usize, fraction: f64) -> bool {
        match self.finished.get(unit) {
            Some(false) => {
                let slot = &mut self.unit_progress[unit];
                *slot = slot.max(fraction.clamp(0.0, 1.0));
                true
            }
            _ => false,
        }
    }

    /// Merges a unit's final partial. Returns false for duplicates.
    fn absorb(&mut self, unit: usize, partial: &AggregateResult) -> bool {
        match self.finished.get(unit) {
            Some(false) => {
                self.finished[unit] = true;
                self.unit_progress[unit] = 1.0;
                self.aggregate.merge(partial);
                self.reported += 1;
                true
            }
            _ => false,
        }
    }
}

/// Owns run identity, unit dispatch and aggregate state.
pub struct Orchestrator<C: ExecutionContext> {
    ctx: Arc<C>,
    matrix: Arc<ScoreMatrix>,
    sampler: SamplerKind,
    sequence: u64,
    active: Option<ActiveRun>,
    last_result: Option<Arc<AggregateResult>>,
}

impl<C: ExecutionContext> Orchestrator<C> {
    /// Creates an orchestrator over a shared, read-only score matrix.
    pub fn new(ctx: Arc<C>, matrix: Arc<ScoreMatrix>) -> Self {
        Self {
            ctx,
            matrix,
            sampler: SamplerKind::default(),
            sequence: 0,
            active: None,
            last_result: None,
        }
    }

    /// Sets the noise source used by every unit.
    pub fn with_sampler(mut self, sampler: SamplerKind) -> Self {
        self.sampler = sampler;
        self
    }

    pub fn matrix(&self) -> &Arc<ScoreMatrix> {
        &self.matrix
    }

    /// Id of the run in flight, if any.
    pub fn active_run(&self) -> Option<RunId> {
        self.active.as_ref().map(|run| run.id)
    }

    /// Pool-average progress of the run in flight.
    pub fn progress(&self) -> Option<f64> {
        self.active.as_ref().map(ActiveRun::fraction)
    }

    /// Result of the most recent completed run, if it has not been superseded.
    pub fn last_result(&self) -> Option<Arc<AggregateResult>> {
        self.last_result.clone()
    }

    /// Starts a run, superseding any run in flight.
    ///
    /// The previous run is only superseded once every unit of the new one is
    /// dispatched: a validation or spawn error leaves it untouched.
    pub fn start_run(&mut self, total_iterations: u64, noise: NoiseConfig) -> Result<RunId, RunError> {
        validate_run(total_iterations, &noise)?;

        self.sequence += 1;
        let run = self.ctx.run_id(self.sequence);
        let counts = partition(total_iterations, self.ctx.parallelism());
        let cancel = CancelToken::new();
        let (tx, rx) = mpsc::unbounded_channel();

        info!(
            "Starting run {} ({} iterations across {} units, noise SOP={} ML={} AStar={})",
            run,
            total_iterations,
            counts.len(),
            noise.sop,
            noise.ml,
            noise.astar
        );

        for (index, &trials) in counts.iter().enumerate() {
            let unit = SimulationUnit::new(Arc::clone(&self.matrix), noise, trials)
                .with_sampler(self.sampler);
            let rng = self.ctx.unit_rng(index);
            let unit_cancel = cancel.clone();
            let tx = tx.clone();

            let spawned = self.ctx.spawn_unit(&format!("unit-{}", index), move || {
                let result = unit.run(rng, &unit_cancel, |fraction| {
                    // Receiver gone means the run was superseded
                    let _ = tx.send(UnitMessage {
                        run,
                        unit: index,
                        report: UnitReport::Progress(fraction),
                    });
                });

                if let Some(result) = result {
                    let _ = tx.send(UnitMessage {
                        run,
                        unit: index,
                        report: UnitReport::Finished(result),
                    });
                }
            });

            if let Err(e) = spawned {
                cancel.cancel();
                return Err(e.into());
            }
            debug!("  unit-{} dispatched with {} trials", index, trials);
        }

        self.cancel();
        self.last_result = None;

        let units = counts.len();
        self.active = Some(ActiveRun {
            id: run,
            cancel,
            rx,
            unit_progress: vec![0.0; units],
            finished: vec![false; units],
            reported: 0,
            aggregate: AggregateResult::new(),
            stalled: false,
        });

        Ok(run)
    }

    /// Cancels the run in flight, discarding its partial state.
    pub fn cancel(&mut self) {
        if let Some(run) = self.active.take() {
            run.cancel.cancel();
            info!("Run {} superseded at {:.0}%", run.id, run.fraction() * 100.0);
        }
    }

    /// Waits for the next event of the run in flight.
    ///
    /// Returns `None` when no run is active, or when every unit dropped its
    /// sender before the run completed (a stalled run stays incomplete).
    pub async fn next_event(&mut self) -> Option<RunEvent> {
        loop {
            let active = self.active.as_mut()?;

            let Some(message) = active.rx.recv().await else {
                if !active.stalled {
                    active.stalled = true;
                    warn!(
                        "Run {} stalled: {}/{} units reported",
                        active.id,
                        active.reported,
                        active.units()
                    );
                }
                return None;
            };

            if message.run != active.id {
                debug!("Dropping stale message from run {}", message.run);
                continue;
            }

            match message.report {
                UnitReport::Progress(fraction) => {
                    if active.apply_progress(message.unit, fraction) {
                        debug!("  unit-{} at {:.0}%", message.unit, fraction * 100.0);
                        return Some(RunEvent::Progress {
                            run: active.id,
                            fraction: active.fraction(),
                        });
                    }
                }
                UnitReport::Finished(partial) => {
                    if !active.absorb(message.unit, &partial) {
                        continue;
                    }
                    debug!(
                        "  unit-{} finished ({} trials, {}/{} units)",
                        message.unit,
                        partial.trials(),
                        active.reported,
                        active.units()
                    );
                    if !active.is_complete() {
                        return Some(RunEvent::Progress {
                            run: active.id,
                            fraction: active.fraction(),
                        });
                    }

                    let finished = self.active.take()?;
                    let result = Arc::new(finished.aggregate);
                    info!("Run {} complete ({} trials)", finished.id, result.trials());
                    self.last_result = Some(Arc::clone(&result));
                    return Some(RunEvent::Completed {
                        run: finished.id,
                        result,
                    });
                }
            }
        }
    }

    /// Starts a run and drives it to completion, forwarding progress.
    pub async fn run<P>(
        &mut self,
        total_iterations: u64,
        noise: NoiseConfig,
        mut on_progress: P,
    ) -> Result<Arc<AggregateResult>, RunError>
    where
        P: FnMut(f64),
    {
        let run = self.start_run(total_iterations, noise)?;

        while let Some(event) = self.next_event().await {
            match event {
                RunEvent::Progress { fraction, .. } => on_progress(fraction),
                RunEvent::Completed { result, .. } => return Ok(result),
            }
        }

        let (reported, units) = self
            .active
            .as_ref()
            .map(|a| (a.reported, a.units()))
            .unwrap_or((0, 0));
        Err(RunError::Stalled {
            run,
            reported,
            units,
        })
    }
}
