//! Running first and second moments.

use serde::{Deserialize, Serialize};

/// Running sum and sum of squares.
///
/// After N contributions `sum = Σv` and `sum_squares = Σv²`. Merging adds
/// field-wise, so it is associative and commutative up to float rounding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MomentAccumulator {
    pub sum: f64,
    pub sum_squares: f64,
}

impl MomentAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one value.
    pub fn record(&mut self, value: f64) {
        self.sum += value;
        self.sum_squares += value * value;
    }

    /// Adds another accumulator's moments.
    pub fn merge(&mut self, other: &MomentAccumulator) {
        self.sum += other.sum;
        self.sum_squares += other.sum_squares;
    }

    /// Mean over `n` contributions (NaN when `n == 0`).
    pub fn mean(&self, n: u64) -> f64 {
        self.sum / n as f64
    }

    /// Population variance over `n` contributions, clamped at zero so float
    /// cancellation cannot produce a negative value. NaN when `n == 0`.
    pub fn variance(&self, n: u64) -> f64 {
        if n == 0 {
            return f64::NAN;
        }
        let mean = self.mean(n);
        (self.sum_squares / n as f64 - mean * mean).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_and_variance() {
        let mut acc = MomentAccumulator::new();
        for v in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
            acc.record(v);
        }

        assert_relative_eq!(acc.mean(8), 5.0, epsilon = 1e-12);
        assert_relative_eq!(acc.variance(8), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_merge_matches_single_pass() {
        let values = [1.5, 2.5, 3.25, 8.0, -1.0];
        let mut whole = MomentAccumulator::new();
        values.iter().for_each(|&v| whole.record(v));

        let mut left = MomentAccumulator::new();
        let mut right = MomentAccumulator::new();
        values[..2].iter().for_each(|&v| left.record(v));
        values[2..].iter().for_each(|&v| right.record(v));

        let mut merged = MomentAccumulator::new();
        merged.merge(&right);
        merged.merge(&left);

        assert_relative_eq!(merged.sum, whole.sum, epsilon = 1e-12);
        assert_relative_eq!(merged.sum_squares, whole.sum_squares, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_mean_is_nan() {
        let acc = MomentAccumulator::new();
        assert!(acc.mean(0).is_nan());
        assert!(acc.variance(0).is_nan());
    }

    #[test]
    fn test_variance_never_negative() {
        let mut acc = MomentAccumulator::new();
        for _ in 0..1000 {
            acc.record(7.31);
        }
        assert!(acc.variance(1000) >= 0.0);
    }
}
