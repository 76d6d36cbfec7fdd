//! Per-operation check routines
//!
//! Each routine drives one generator operation through its configured number
//! of trials and records every assertion on a [`CheckScope`].

use super::config::{
    BooleanCheckConfig, BucketCheckConfig, BytesCheckConfig, GaussianCheckConfig,
    IntRangeCheckConfig, SeedCheckConfig,
};
use super::failure::{CheckFailure, Diagnostic};
use super::report::CheckResult;
use super::sink::ReportSink;
use super::stats::{
    gaussian_bucket, modulo_bucket, repeat_runs, unit_interval_bucket, within_margin,
    within_tolerance, BucketCounts, GAUSSIAN_BUCKET_OFFSET, GAUSSIAN_BUCKET_PROBABILITIES,
};
use super::ValidationError;
use crate::rng::{Random, RandomError};
use std::fmt::Display;

/// Assertion bookkeeping for one named check
pub(crate) struct CheckScope<'a, S: ReportSink> {
    name: &'static str,
    sink: &'a mut S,
    checks: u64,
    errors: u64,
}

impl<'a, S: ReportSink> CheckScope<'a, S> {
    pub(crate) fn new(name: &'static str, sink: &'a mut S) -> Self {
        Self {
            name,
            sink,
            checks: 0,
            errors: 0,
        }
    }

    fn pass(&mut self) {
        self.checks += 1;
    }

    fn fail(&mut self, failure: CheckFailure) -> Result<(), ValidationError> {
        self.checks += 1;
        self.errors += 1;
        self.sink.emit(&Diagnostic::new(self.name, failure))?;
        Ok(())
    }

    /// Count one assertion; build and emit the failure only when it fails.
    fn verify(
        &mut self,
        passed: bool,
        failure: impl FnOnce() -> CheckFailure,
    ) -> Result<(), ValidationError> {
        if passed {
            self.pass();
            Ok(())
        } else {
            self.fail(failure())
        }
    }

    fn compare_bucket(
        &mut self,
        bucket: impl Display,
        observed: u64,
        expected: f64,
        margin: f64,
    ) -> Result<(), ValidationError> {
        self.verify(within_margin(observed, expected, margin), || {
            CheckFailure::StatisticalDeviation {
                bucket: bucket.to_string(),
                observed,
                expected,
            }
        })
    }

    /// Compare every bucket of a uniform histogram with `iterations / len`.
    /// Buckets are labelled `index + label_offset`.
    fn compare_uniform(
        &mut self,
        counts: &BucketCounts,
        iterations: u64,
        margin: f64,
        label_offset: i64,
    ) -> Result<(), ValidationError> {
        let expected = iterations as f64 / counts.len() as f64;
        for (index, &observed) in counts.counts().iter().enumerate() {
            self.compare_bucket(index as i64 + label_offset, observed, expected, margin)?;
        }
        Ok(())
    }

    fn verify_contained(&mut self, value: i64, low: i64, high: i64) -> Result<(), ValidationError> {
        self.verify((low..=high).contains(&value), || CheckFailure::RangeViolation {
            value,
            low,
            high,
        })
    }

    /// One assertion that a call with invalid arguments was rejected
    fn verify_rejected<T>(
        &mut self,
        call: &str,
        outcome: Result<T, RandomError>,
    ) -> Result<(), ValidationError> {
        self.verify(outcome.is_err(), || CheckFailure::PreconditionNotEnforced {
            call: call.to_string(),
        })
    }

    /// One assertion per element pairing `expected` with `acquired`.
    fn compare_sequence(
        &mut self,
        expected: &[i32],
        acquired: impl IntoIterator<Item = i32>,
    ) -> Result<(), ValidationError> {
        for (index, (&expected, acquired)) in expected.iter().zip(acquired).enumerate() {
            self.verify(acquired == expected, || CheckFailure::ReproducibilityMismatch {
                index,
                acquired: i64::from(acquired),
                expected: i64::from(expected),
            })?;
        }
        Ok(())
    }

    pub(crate) fn finish(self) -> CheckResult {
        CheckResult {
            name: self.name.to_string(),
            errors: self.errors,
            checks: self.checks,
        }
    }
}

pub(crate) fn next_boolean<S: ReportSink>(
    scope: &mut CheckScope<'_, S>,
    rng: &mut Random,
    config: &BooleanCheckConfig,
) -> Result<(), ValidationError> {
    let true_count = (0..config.iterations).filter(|_| rng.next_boolean()).count() as u64;
    let false_count = config.iterations - true_count;
    tracing::debug!(true_count, false_count, "boolean balance");

    let expected = config.iterations as f64 / 2.0;
    let tolerance = config.margin * config.iterations as f64;
    for (label, observed) in [("true", true_count), ("false", false_count)] {
        scope.verify(within_tolerance(observed, expected, tolerance), || {
            CheckFailure::StatisticalDeviation {
                bucket: label.to_string(),
                observed,
                expected,
            }
        })?;
    }
    Ok(())
}

/// Smoke test only: flags improbable runs of identical bytes. It says
/// nothing about the distribution of byte values.
pub(crate) fn next_bytes<S: ReportSink>(
    scope: &mut CheckScope<'_, S>,
    rng: &mut Random,
    config: &BytesCheckConfig,
) -> Result<(), ValidationError> {
    let mut buffer = vec![0u8; config.buffer_len];
    for _ in 0..config.buffers {
        rng.next_bytes(&mut buffer);

        let runs = repeat_runs(&buffer, config.repeats);
        if runs.is_empty() {
            scope.pass();
        }
        for run in runs {
            scope.fail(CheckFailure::UnlikelyByteRun {
                offset: run.offset,
                byte: run.byte,
                length: run.length,
            })?;
        }
    }
    Ok(())
}

pub(crate) fn next_double<S: ReportSink>(
    scope: &mut CheckScope<'_, S>,
    rng: &mut Random,
    config: &BucketCheckConfig,
) -> Result<(), ValidationError> {
    let buckets = config.buckets as usize;
    let mut counts = BucketCounts::new(buckets);
    for _ in 0..config.iterations {
        let value = rng.next_double();
        match unit_interval_bucket(value, buckets) {
            Some(index) => counts.record(index),
            None => scope.fail(CheckFailure::OutsideUnitInterval { value })?,
        }
    }
    scope.compare_uniform(&counts, config.iterations, config.margin, 0)
}

pub(crate) fn next_float<S: ReportSink>(
    scope: &mut CheckScope<'_, S>,
    rng: &mut Random,
    config: &BucketCheckConfig,
) -> Result<(), ValidationError> {
    let buckets = config.buckets as usize;
    let mut counts = BucketCounts::new(buckets);
    for _ in 0..config.iterations {
        let value = f64::from(rng.next_float());
        match unit_interval_bucket(value, buckets) {
            Some(index) => counts.record(index),
            None => scope.fail(CheckFailure::OutsideUnitInterval { value })?,
        }
    }
    scope.compare_uniform(&counts, config.iterations, config.margin, 0)
}

pub(crate) fn next_gaussian<S: ReportSink>(
    scope: &mut CheckScope<'_, S>,
    rng: &mut Random,
    config: &GaussianCheckConfig,
) -> Result<(), ValidationError> {
    let mut counts = BucketCounts::new(GAUSSIAN_BUCKET_PROBABILITIES.len());
    for _ in 0..config.iterations {
        if let Some(index) = gaussian_bucket(rng.next_gaussian()) {
            counts.record(index);
        }
    }
    tracing::debug!(
        outside = config.iterations - counts.total(),
        "gaussian values beyond four standard deviations"
    );

    for (index, (&observed, probability)) in counts
        .counts()
        .iter()
        .zip(GAUSSIAN_BUCKET_PROBABILITIES)
        .enumerate()
    {
        let low = index as i64 - GAUSSIAN_BUCKET_OFFSET;
        let expected = config.iterations as f64 * probability;
        scope.compare_bucket(
            format!("{}..{}", low, low + 1),
            observed,
            expected,
            config.margin,
        )?;
    }
    Ok(())
}

pub(crate) fn next_int<S: ReportSink>(
    scope: &mut CheckScope<'_, S>,
    rng: &mut Random,
    config: &BucketCheckConfig,
) -> Result<(), ValidationError> {
    let buckets = config.buckets as usize;
    let mut counts = BucketCounts::new(buckets);
    for _ in 0..config.iterations {
        counts.record(modulo_bucket(i64::from(rng.next_int()), buckets));
    }
    scope.compare_uniform(&counts, config.iterations, config.margin, 0)
}

pub(crate) fn next_int_below<S: ReportSink>(
    scope: &mut CheckScope<'_, S>,
    rng: &mut Random,
    config: &BucketCheckConfig,
) -> Result<(), ValidationError> {
    let n = config.buckets as i32;
    let mut counts = BucketCounts::new(config.buckets as usize);
    for _ in 0..config.iterations {
        let value = rng.next_int_below(n)?;
        scope.verify_contained(i64::from(value), 0, i64::from(n) - 1)?;
        counts.record(value as usize);
    }
    scope.compare_uniform(&counts, config.iterations, config.margin, 0)?;

    scope.verify_rejected("next_int_below(0)", rng.next_int_below(0))
}

pub(crate) fn next_int_between<S: ReportSink>(
    scope: &mut CheckScope<'_, S>,
    rng: &mut Random,
    config: &IntRangeCheckConfig,
) -> Result<(), ValidationError> {
    for _ in 0..config.iterations {
        for &(low, high) in &config.containment {
            let value = rng.next_int_between(low, high)?;
            scope.verify_contained(i64::from(value), i64::from(low), i64::from(high))?;
        }
    }

    let (low, high) = (i64::from(config.low), i64::from(config.high));
    let mut counts = BucketCounts::new(config.span() as usize);
    for _ in 0..config.iterations {
        let value = i64::from(rng.next_int_between(config.low, config.high)?);
        scope.verify_contained(value, low, high)?;
        counts.record((value - low) as usize);
    }
    scope.compare_uniform(&counts, config.iterations, config.margin, low)?;

    scope.verify_rejected("next_int_between(1, 0)", rng.next_int_between(1, 0))
}

pub(crate) fn next_long<S: ReportSink>(
    scope: &mut CheckScope<'_, S>,
    rng: &mut Random,
    config: &BucketCheckConfig,
) -> Result<(), ValidationError> {
    let buckets = config.buckets as usize;
    let mut counts = BucketCounts::new(buckets);
    for _ in 0..config.iterations {
        counts.record(modulo_bucket(rng.next_long(), buckets));
    }
    scope.compare_uniform(&counts, config.iterations, config.margin, 0)
}

/// Reseeding must be a total reset.
///
/// The subject generator records a baseline right after seeding. Each
/// repetition then disturbs it with a varying number of mixed draws (the
/// count comes from `perturber`, a separate generator, so it really varies),
/// reseeds, and compares a fresh sequence against the baseline element by
/// element.
pub(crate) fn set_seed<S: ReportSink>(
    scope: &mut CheckScope<'_, S>,
    perturber: &mut Random,
    config: &SeedCheckConfig,
) -> Result<(), ValidationError> {
    let mut subject = Random::new(config.seed);
    let baseline: Vec<i32> = (0..config.sequence_len).map(|_| subject.next_int()).collect();

    let mut scratch = [0u8; 3];
    for _ in 0..config.repetitions {
        let draws = perturber.next_int_below(config.max_perturbation)?;
        for step in 0..draws {
            match step % 4 {
                0 => {
                    subject.next_int();
                }
                1 => {
                    subject.next_gaussian();
                }
                2 => subject.next_bytes(&mut scratch),
                _ => {
                    subject.next_double();
                }
            }
        }

        subject.set_seed(config.seed);
        scope.compare_sequence(&baseline, (0..baseline.len()).map(|_| subject.next_int()))?;
    }
    Ok(())
}
