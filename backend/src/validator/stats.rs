//! Bucket counting and tolerance helpers
//!
//! Every distribution check reduces to the same shape: map each drawn value
//! to a bucket, count, then compare each count with its expectation.

use serde::{Deserialize, Serialize};

/// Probability mass of the eight unit-width buckets covering [-4, 4) under a
/// standard normal, ordered from the left tail to the right tail.
pub const GAUSSIAN_BUCKET_PROBABILITIES: [f64; 8] = [
    0.0013, 0.0215, 0.1359, 0.3413, 0.3413, 0.1359, 0.0215, 0.0013,
];

/// Offset that moves bucket 0 of the Gaussian histogram to -4.
pub const GAUSSIAN_BUCKET_OFFSET: i64 = (GAUSSIAN_BUCKET_PROBABILITIES.len() / 2) as i64;

/// `|observed - expected| < tolerance`
pub fn within_tolerance(observed: u64, expected: f64, tolerance: f64) -> bool {
    (observed as f64 - expected).abs() < tolerance
}

/// `|observed - expected| < margin * expected`
pub fn within_margin(observed: u64, expected: f64, margin: f64) -> bool {
    within_tolerance(observed, expected, margin * expected)
}

/// Bucket of a [0, 1) value: `floor(value * buckets)`.
///
/// Returns `None` for values outside [0, 1).
pub fn unit_interval_bucket(value: f64, buckets: usize) -> Option<usize> {
    if !(0.0..1.0).contains(&value) {
        return None;
    }
    let index = (value * buckets as f64) as usize;
    // value * buckets can round up to buckets for values just below 1.0
    Some(index.min(buckets - 1))
}

/// Bucket of a full-range integer: `value mod buckets`, always non-negative.
pub fn modulo_bucket(value: i64, buckets: usize) -> usize {
    value.rem_euclid(buckets as i64) as usize
}

/// Bucket of a standard-normal value in the fixed eight-bucket histogram.
///
/// Values outside [-4, 4) are not counted.
pub fn gaussian_bucket(value: f64) -> Option<usize> {
    let shifted = value + GAUSSIAN_BUCKET_OFFSET as f64;
    if !(0.0..GAUSSIAN_BUCKET_PROBABILITIES.len() as f64).contains(&shifted) {
        return None;
    }
    Some(shifted as usize)
}

/// Fixed-size histogram
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCounts {
    counts: Vec<u64>,
}

impl BucketCounts {
    pub fn new(buckets: usize) -> Self {
        Self {
            counts: vec![0; buckets],
        }
    }

    /// Count one observation. Indices past the last bucket are ignored.
    pub fn record(&mut self, index: usize) {
        if let Some(count) = self.counts.get_mut(index) {
            *count += 1;
        }
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Observations counted across all buckets
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// A run of one byte value repeated back to back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteRun {
    /// Index of the first byte of the run
    pub offset: usize,
    pub byte: u8,
    /// Number of identical bytes in the run
    pub length: usize,
}

/// Find runs where a byte repeats at least `repeats` times after its first
/// occurrence (`repeats + 1` identical bytes). Each run is reported once.
///
/// ```
/// use seeded_random_core::validator::stats::repeat_runs;
///
/// let runs = repeat_runs(&[1, 7, 7, 7, 7, 2, 3, 3, 3], 3);
/// assert_eq!(runs.len(), 1);
/// assert_eq!((runs[0].offset, runs[0].byte, runs[0].length), (1, 7, 4));
/// ```
pub fn repeat_runs(bytes: &[u8], repeats: usize) -> Vec<ByteRun> {
    let mut runs = Vec::new();
    let mut start = 0;

    for i in 1..=bytes.len() {
        if i < bytes.len() && bytes[i] == bytes[start] {
            continue;
        }
        let length = i - start;
        if length > repeats {
            runs.push(ByteRun {
                offset: start,
                byte: bytes[start],
                length,
            });
        }
        start = i;
    }

    runs
}
