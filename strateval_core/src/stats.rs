//! Statistics Deriver - summary statistics from an aggregated cell.
//!
//! Mean and standard deviation come from the moment accumulator, the median
//! from the histogram. Confidence intervals are the normal approximation
//! `mean ± k·σ` for k ∈ {1, 2, 3}; they are only as good as the assumption
//! that the perturbed utility sum is roughly Gaussian.

use crate::aggregate::Cell;
use serde::{Deserialize, Serialize};

/// Interval multipliers reported for every cell.
pub const SIGMA_LEVELS: [u32; 3] = [1, 2, 3];

/// `[mean − kσ, mean + kσ]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub k: u32,
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    pub fn around(mean: f64, std_dev: f64, k: u32) -> Self {
        let half_width = k as f64 * std_dev;
        Self {
            k,
            lower: mean - half_width,
            upper: mean + half_width,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Derived statistics for one (Environment, Method) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of samples the statistics were derived from
    pub trials: u64,
    pub mean: f64,
    pub std_dev: f64,
    pub median: f64,

    /// 1σ, 2σ and 3σ intervals
    pub intervals: [ConfidenceInterval; 3],
}

impl Summary {
    /// Derives statistics from a cell.
    ///
    /// With zero trials every field is NaN; callers are expected never to ask,
    /// but a degenerate cell must not panic.
    pub fn derive(cell: &Cell) -> Self {
        let n = cell.trials;
        let mean = cell.moments.mean(n);
        let std_dev = cell.moments.variance(n).sqrt();
        let median = if n == 0 {
            f64::NAN
        } else {
            cell.histogram.median(n)
        };

        Self {
            trials: n,
            mean,
            std_dev,
            median,
            intervals: SIGMA_LEVELS.map(|k| ConfidenceInterval::around(mean, std_dev, k)),
        }
    }

    /// Interval for `k` standard deviations, if it is one of the reported levels.
    pub fn interval(&self, k: u32) -> Option<&ConfidenceInterval> {
        self.intervals.iter().find(|ci| ci.k == k)
    }

    pub fn is_defined(&self) -> bool {
        self.trials > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cell_from(values: &[f64]) -> Cell {
        let mut cell = Cell::new();
        values.iter().for_each(|&v| cell.record(v));
        cell
    }

    #[test]
    fn test_derive_basic() {
        let cell = cell_from(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        let summary = Summary::derive(&cell);

        assert_eq!(summary.trials, 8);
        assert_relative_eq!(summary.mean, 5.0, epsilon = 1e-12);
        assert_relative_eq!(summary.std_dev, 2.0, epsilon = 1e-12);
        assert_eq!(summary.median, 4.0);

        let ci2 = summary.interval(2).unwrap();
        assert_relative_eq!(ci2.lower, 1.0, epsilon = 1e-12);
        assert_relative_eq!(ci2.upper, 9.0, epsilon = 1e-12);
        assert!(summary.interval(4).is_none());
    }

    #[test]
    fn test_median_from_histogram() {
        let mut values = Vec::new();
        values.extend(std::iter::repeat(5.0).take(10));
        values.extend(std::iter::repeat(5.5).take(20));
        values.extend(std::iter::repeat(6.0).take(10));

        let summary = Summary::derive(&cell_from(&values));
        assert_eq!(summary.median, 5.5);
        assert_relative_eq!(summary.mean, 5.5, epsilon = 1e-12);
    }

    #[test]
    fn test_constant_values_have_zero_spread() {
        let summary = Summary::derive(&cell_from(&[3.3; 64]));

        assert_relative_eq!(summary.mean, 3.3, epsilon = 1e-9);
        assert!(summary.std_dev < 1e-5);
        for ci in &summary.intervals {
            assert!(ci.contains(summary.mean));
        }
    }

    #[test]
    fn test_empty_cell_is_nan_not_panic() {
        let summary = Summary::derive(&Cell::new());

        assert!(!summary.is_defined());
        assert!(summary.mean.is_nan());
        assert!(summary.std_dev.is_nan());
        assert!(summary.median.is_nan());
        assert!(summary.intervals.iter().all(|ci| ci.lower.is_nan() && ci.upper.is_nan()));
    }
}
