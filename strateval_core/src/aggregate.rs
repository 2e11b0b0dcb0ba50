//! Per (Environment, Method) accumulators and their merge.

use crate::histogram::Histogram;
use crate::matrix::{Environment, Method};
use crate::moments::MomentAccumulator;
use crate::stats::Summary;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Everything accumulated for one (Environment, Method) pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub histogram: Histogram,
    pub moments: MomentAccumulator,

    /// Number of utility values contributed
    pub trials: u64,
}

impl Cell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one trial's utility value into the histogram and moments.
    pub fn record(&mut self, value: f64) {
        self.histogram.record(value);
        self.moments.record(value);
        self.trials += 1;
    }

    pub fn merge(&mut self, other: &Cell) {
        self.histogram.merge(&other.histogram);
        self.moments.merge(&other.moments);
        self.trials += other.trials;
    }

    /// Derives summary statistics from this cell.
    pub fn summary(&self) -> Summary {
        Summary::derive(self)
    }
}

/// Histogram counts of the three methods aligned on a shared bucket axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedSeries {
    /// Union of observed bucket values, ascending
    pub labels: Vec<f64>,

    /// Counts per method (indexed by `Method::index`), zero-filled
    pub counts: [Vec<u64>; 3],
}

/// The nine cells of a run, addressed by (Environment, Method).
///
/// A simulation unit fills one of these locally; the orchestrator merges the
/// partials into a fresh instance per run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    cells: [[Cell; 3]; 3],

    /// Completed trials (each trial touches all nine cells once)
    trials: u64,
}

impl AggregateResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(&self, env: Environment, method: Method) -> &Cell {
        &self.cells[env.index()][method.index()]
    }

    pub fn cell_mut(&mut self, env: Environment, method: Method) -> &mut Cell {
        &mut self.cells[env.index()][method.index()]
    }

    /// Records a utility value for one pair.
    pub fn record(&mut self, env: Environment, method: Method, value: f64) {
        self.cell_mut(env, method).record(value);
    }

    /// Marks one full trial (all pairs recorded) as complete.
    pub fn complete_trial(&mut self) {
        self.trials += 1;
    }

    pub fn trials(&self) -> u64 {
        self.trials
    }

    /// Merges another partial result into this one, cell by cell.
    pub fn merge(&mut self, other: &AggregateResult) {
        for env in Environment::all() {
            for method in Method::all() {
                self.cell_mut(env, method).merge(other.cell(env, method));
            }
        }
        self.trials += other.trials;
    }

    /// Iterates all nine cells in table order.
    pub fn iter(&self) -> impl Iterator<Item = (Environment, Method, &Cell)> + '_ {
        Environment::all().into_iter().flat_map(move |env| {
            Method::all()
                .into_iter()
                .map(move |method| (env, method, self.cell(env, method)))
        })
    }

    pub fn summary(&self, env: Environment, method: Method) -> Summary {
        self.cell(env, method).summary()
    }

    /// Summary statistics for all nine pairs.
    pub fn summaries(&self) -> Vec<(Environment, Method, Summary)> {
        self.iter()
            .map(|(env, method, cell)| (env, method, cell.summary()))
            .collect()
    }

    /// Histogram series of the three methods in `env`, aligned on the union
    /// of their buckets.
    pub fn aligned_series(&self, env: Environment) -> AlignedSeries {
        let axis: BTreeSet<i64> = Method::all()
            .into_iter()
            .flat_map(|m| self.cell(env, m).histogram.iter_indexed().map(|(i, _)| i))
            .collect();

        let counts = Method::all().map(|m| {
            let histogram = &self.cell(env, m).histogram;
            axis.iter()
                .map(|&i| histogram.count_at(i))
                .collect::<Vec<u64>>()
        });

        AlignedSeries {
            labels: axis.into_iter().map(Histogram::bucket_value).collect(),
            counts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_routes_to_cell() {
        let mut agg = AggregateResult::new();
        agg.record(Environment::Airport, Method::Ml, 6.0);
        agg.record(Environment::Airport, Method::Ml, 6.02);

        let cell = agg.cell(Environment::Airport, Method::Ml);
        assert_eq!(cell.trials, 2);
        assert_eq!(cell.histogram.count(6.0), 2);
        assert_eq!(agg.cell(Environment::Urban, Method::Ml).trials, 0);
    }

    #[test]
    fn test_merge_adds_trials_and_cells() {
        let mut a = AggregateResult::new();
        a.record(Environment::Urban, Method::Sop, 7.0);
        a.complete_trial();

        let mut b = AggregateResult::new();
        b.record(Environment::Urban, Method::Sop, 7.5);
        b.complete_trial();
        b.complete_trial();

        a.merge(&b);

        assert_eq!(a.trials(), 3);
        let cell = a.cell(Environment::Urban, Method::Sop);
        assert_eq!(cell.trials, 2);
        assert_eq!(cell.moments.sum, 14.5);
    }

    #[test]
    fn test_aligned_series_zero_fills() {
        let mut agg = AggregateResult::new();
        agg.record(Environment::Suburban, Method::Sop, 5.0);
        agg.record(Environment::Suburban, Method::Ml, 6.0);
        agg.record(Environment::Suburban, Method::AStar, 6.0);
        agg.record(Environment::Suburban, Method::AStar, 7.0);

        let series = agg.aligned_series(Environment::Suburban);

        assert_eq!(series.labels, vec![5.0, 6.0, 7.0]);
        assert_eq!(series.counts[Method::Sop.index()], vec![1, 0, 0]);
        assert_eq!(series.counts[Method::Ml.index()], vec![0, 1, 0]);
        assert_eq!(series.counts[Method::AStar.index()], vec![0, 1, 1]);
    }

    #[test]
    fn test_iter_covers_nine_pairs() {
        let agg = AggregateResult::new();
        assert_eq!(agg.iter().count(), 9);
    }
}
