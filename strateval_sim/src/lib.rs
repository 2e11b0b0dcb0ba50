//! StratEval Parallel Monte Carlo Engine
//!
//! This crate runs the stochastic evaluation of the three decision methods
//! (SOP, ML, A*) across the three deployment environments.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Orchestrator                          │
//! │  run identity · partition · progress · merge · supersede    │
//! │       │                        │                            │
//! │  ┌────▼────┐              ┌────▼────┐                       │
//! │  │  Unit   │     ...      │  Unit   │   (blocking pool)     │
//! │  │   #0    │              │  #P-1   │                       │
//! │  └────┬────┘              └────┬────┘                       │
//! │       │  Arc<ScoreMatrix> (read-only), NoiseConfig (copy)   │
//! │       ▼                        ▼                            │
//! │  local AggregateResult ──► mpsc ──► merged AggregateResult  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use strateval_sim::{Orchestrator, SeededContext};
//! use strateval_core::{NoiseConfig, ScoreMatrix};
//! use std::sync::Arc;
//!
//! let mut orch = Orchestrator::new(SeededContext::shared(42), Arc::new(ScoreMatrix::builtin()));
//! let result = orch.run(10_000, NoiseConfig::uniform(0.1), |_| {}).await?;
//! ```

mod config;
mod context;
mod orchestrator;
mod report;
mod seeds;
mod unit;

pub use config::SimConfig;
pub use context::SeededContext;
pub use orchestrator::{
    partition, validate_run, Orchestrator, RunError, RunEvent, UnitMessage, UnitReport,
};
pub use report::{render_table, render_tables, EnvironmentReport, MethodReport, RunExport};
pub use seeds::DeterministicSeedProvider;
pub use unit::{ProgressSchedule, SimulationUnit, PROGRESS_STEPS};
