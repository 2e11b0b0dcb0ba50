//! StratEval Environment Abstraction Layer
//!
//! This crate separates *what* a Monte Carlo run computes from *where* its
//! simulation units execute and where their randomness comes from, so the
//! same orchestrator runs in **Production** (tokio blocking pool, OS entropy)
//! and in **Deterministic** mode (fixed pool size, seed-derived RNG streams).
//!
//! # Core Concept
//!
//! Every simulation unit is a CPU-bound job with an immutable input snapshot.
//! An [`ExecutionContext`] decides:
//! - how many units a run is split into (`parallelism()`)
//! - where a unit runs (`spawn_unit()`)
//! - which uniform stream a unit draws from (`unit_rng()`)
//!
//! By deriving all unit streams from a single 64-bit seed, any run becomes
//! reproducible via its seed number.
//!
//! # Example
//!
//! ```ignore
//! use strateval_env::{ExecutionContext, TokioContext};
//!
//! let ctx = TokioContext::shared();
//! for unit in 0..ctx.parallelism() {
//!     let rng = ctx.unit_rng(unit);
//!     ctx.spawn_unit("unit", move || simulate(rng))?;
//! }
//! ```

mod cancel;
mod context;
mod error;
mod tokio_impl;
mod types;

pub use cancel::CancelToken;
pub use context::{discover_parallelism, ExecutionContext, DEFAULT_PARALLELISM};
pub use error::EnvError;
pub use tokio_impl::TokioContext;
pub use types::RunId;
