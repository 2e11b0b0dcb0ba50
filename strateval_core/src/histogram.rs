//! Quantized frequency table of utility values.
//!
//! Values are bucketed at one-decimal resolution. Internally the key is the
//! fixed-point index `round(value * 10)` so bucket identity never depends on
//! float equality; the display value `index / 10` is produced on the way out.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Buckets per unit of utility.
pub const BUCKETS_PER_UNIT: f64 = 10.0;

/// Frequency table keyed by fixed-point bucket index.
///
/// Invariant: `total()` equals the number of values recorded (directly or
/// through merges). Buckets only ever grow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Histogram {
    buckets: BTreeMap<i64, u64>,
}

impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixed-point bucket index of `value`, rounding halves up.
    pub fn bucket_index(value: f64) -> i64 {
        (value * BUCKETS_PER_UNIT + 0.5).floor() as i64
    }

    /// Display value of a bucket index.
    pub fn bucket_value(index: i64) -> f64 {
        index as f64 / BUCKETS_PER_UNIT
    }

    /// Counts one value.
    pub fn record(&mut self, value: f64) {
        *self.buckets.entry(Self::bucket_index(value)).or_insert(0) += 1;
    }

    /// Adds every bucket of `other` into `self`. Associative and commutative.
    pub fn merge(&mut self, other: &Histogram) {
        for (&index, &count) in &other.buckets {
            *self.buckets.entry(index).or_insert(0) += count;
        }
    }

    /// Sum of all bucket counts.
    pub fn total(&self) -> u64 {
        self.buckets.values().sum()
    }

    /// Number of distinct buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Count in the bucket that `value` falls into.
    pub fn count(&self, value: f64) -> u64 {
        self.count_at(Self::bucket_index(value))
    }

    /// Count stored under a bucket index.
    pub fn count_at(&self, index: i64) -> u64 {
        self.buckets.get(&index).copied().unwrap_or(0)
    }

    /// Iterates `(bucket index, count)` in ascending order.
    pub fn iter_indexed(&self) -> impl Iterator<Item = (i64, u64)> + '_ {
        self.buckets.iter().map(|(&i, &c)| (i, c))
    }

    /// Iterates `(bucket value, count)` in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, u64)> + '_ {
        self.iter_indexed().map(|(i, c)| (Self::bucket_value(i), c))
    }

    /// The raw chart series: ascending `(bucket value, count)` pairs.
    pub fn series(&self) -> Vec<(f64, u64)> {
        self.iter().collect()
    }

    /// Empirical CDF: ascending `(bucket value, cumulative fraction)` pairs.
    pub fn cdf(&self) -> Vec<(f64, f64)> {
        let total = self.total();
        if total == 0 {
            return Vec::new();
        }

        let mut cumulative = 0u64;
        self.iter()
            .map(|(value, count)| {
                cumulative += count;
                (value, cumulative as f64 / total as f64)
            })
            .collect()
    }

    /// Smallest observed bucket value.
    pub fn min_value(&self) -> Option<f64> {
        self.buckets.keys().next().map(|&i| Self::bucket_value(i))
    }

    /// Largest observed bucket value.
    pub fn max_value(&self) -> Option<f64> {
        self.buckets.keys().next_back().map(|&i| Self::bucket_value(i))
    }

    /// Median over `trials` samples: the first bucket (ascending) at which the
    /// cumulative count reaches ⌈trials / 2⌉. Falls back to the largest
    /// observed bucket if the threshold is never reached, and to NaN when the
    /// histogram is empty.
    pub fn median(&self, trials: u64) -> f64 {
        let threshold = trials.div_ceil(2);

        let mut cumulative = 0u64;
        for (index, count) in self.iter_indexed() {
            cumulative += count;
            if cumulative >= threshold {
                return Self::bucket_value(index);
            }
        }

        self.max_value().unwrap_or(f64::NAN)
    }
}

impl FromIterator<f64> for Histogram {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut histogram = Histogram::new();
        for value in iter {
            histogram.record(value);
        }
        histogram
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn with_counts(pairs: &[(f64, u64)]) -> Histogram {
        let mut h = Histogram::new();
        for &(value, count) in pairs {
            for _ in 0..count {
                h.record(value);
            }
        }
        h
    }

    #[test]
    fn test_bucket_rounding() {
        assert_eq!(Histogram::bucket_index(5.04), 50);
        assert_eq!(Histogram::bucket_index(5.06), 51);
        assert_eq!(Histogram::bucket_index(5.149), 51);
        assert_eq!(Histogram::bucket_index(-0.04), 0);
        assert_eq!(Histogram::bucket_value(73), 7.3);
    }

    #[test]
    fn test_record_counts_same_bucket() {
        let h: Histogram = vec![6.01, 5.98, 6.04, 7.2].into_iter().collect();

        assert_eq!(h.count(6.0), 3);
        assert_eq!(h.count(7.2), 1);
        assert_eq!(h.total(), 4);
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn test_median_resolves_middle_bucket() {
        let h = with_counts(&[(5.0, 10), (5.5, 20), (6.0, 10)]);
        assert_eq!(h.median(40), 5.5);
    }

    #[test]
    fn test_median_odd_count() {
        let h = with_counts(&[(1.0, 2), (2.0, 1), (3.0, 2)]);
        // ⌈5/2⌉ = 3 is reached at 2.0
        assert_eq!(h.median(5), 2.0);
    }

    #[test]
    fn test_median_falls_back_to_largest_bucket() {
        let h = with_counts(&[(1.0, 1), (4.2, 1)]);
        // Claimed trial count exceeds the recorded mass
        assert_eq!(h.median(10), 4.2);
    }

    #[test]
    fn test_median_empty_is_nan() {
        assert!(Histogram::new().median(0).is_nan());
    }

    #[test]
    fn test_cdf_ends_at_one() {
        let h = with_counts(&[(5.0, 1), (5.5, 2), (6.0, 1)]);
        let cdf = h.cdf();

        assert_eq!(cdf, vec![(5.0, 0.25), (5.5, 0.75), (6.0, 1.0)]);
        assert!(Histogram::new().cdf().is_empty());
    }

    #[test]
    fn test_series_is_ascending() {
        let h: Histogram = vec![3.0, -1.0, 2.0, 3.0].into_iter().collect();
        assert_eq!(h.series(), vec![(-1.0, 1), (2.0, 1), (3.0, 2)]);
        assert_eq!(h.min_value(), Some(-1.0));
        assert_eq!(h.max_value(), Some(3.0));
    }

    proptest! {
        #[test]
        fn prop_merge_commutes(
            a in prop::collection::vec(-20.0f64..20.0, 0..200),
            b in prop::collection::vec(-20.0f64..20.0, 0..200),
        ) {
            let h1: Histogram = a.iter().copied().collect();
            let h2: Histogram = b.iter().copied().collect();

            let mut left = Histogram::new();
            left.merge(&h1);
            left.merge(&h2);

            let mut right = Histogram::new();
            right.merge(&h2);
            right.merge(&h1);

            prop_assert_eq!(&left, &right);
            prop_assert_eq!(left.total(), (a.len() + b.len()) as u64);
        }

        #[test]
        fn prop_merge_is_associative(
            a in prop::collection::vec(0.0f64..10.0, 0..100),
            b in prop::collection::vec(0.0f64..10.0, 0..100),
            c in prop::collection::vec(0.0f64..10.0, 0..100),
        ) {
            let (h1, h2, h3): (Histogram, Histogram, Histogram) = (
                a.into_iter().collect(),
                b.into_iter().collect(),
                c.into_iter().collect(),
            );

            let mut left = h1.clone();
            left.merge(&h2);
            left.merge(&h3);

            let mut tail = h2.clone();
            tail.merge(&h3);
            let mut right = h1;
            right.merge(&tail);

            prop_assert_eq!(left, right);
        }
    }
}
