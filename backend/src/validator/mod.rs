//! Statistical validator
//!
//! Drives a [`Random`] through every operation at high sample counts and
//! checks the observed frequencies against their theoretical expectations.
//!
//! # Failure policy
//!
//! Statistical deviations, range violations and reproducibility mismatches
//! are recorded and counted; the run always continues to a complete report.
//! Only a broken config, a rejected generator call or a failing sink stop a
//! run ([`ValidationError`]).
//!
//! # Example
//!
//! ```
//! use seeded_random_core::{Check, CollectingSink, Validator, ValidatorConfig};
//!
//! let mut config = ValidatorConfig::default();
//! config.seed = Some(7);
//! config.set_seed.repetitions = 5;
//!
//! let mut validator = Validator::new(config, CollectingSink::new()).unwrap();
//! let result = validator.run(Check::SetSeed).unwrap();
//! assert_eq!(result.errors, 0);
//! assert_eq!(result.checks, 50);
//! ```

mod checks;
pub mod config;
pub mod failure;
pub mod report;
pub mod sink;
pub mod stats;

pub use config::ValidatorConfig;
pub use failure::{CheckFailure, Diagnostic, Value};
pub use report::{CheckResult, ValidationReport};
pub use sink::{CollectingSink, ReportSink, TracingSink, WriterSink};

use crate::rng::{Random, RandomError};
use checks::CheckScope;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use thiserror::Error;

/// Conditions that stop a validation run
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Generator precondition violated: {0}")]
    Precondition(#[from] RandomError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The fixed battery of checks, in run order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Check {
    NextBoolean,
    NextBytes,
    NextDouble,
    NextFloat,
    NextGaussian,
    NextInt,
    NextIntBelow,
    NextIntBetween,
    NextLong,
    SetSeed,
}

impl Check {
    pub const ALL: [Check; 10] = [
        Check::NextBoolean,
        Check::NextBytes,
        Check::NextDouble,
        Check::NextFloat,
        Check::NextGaussian,
        Check::NextInt,
        Check::NextIntBelow,
        Check::NextIntBetween,
        Check::NextLong,
        Check::SetSeed,
    ];

    /// Report entry name
    pub fn name(self) -> &'static str {
        match self {
            Check::NextBoolean => "nextBoolean",
            Check::NextBytes => "nextBytes",
            Check::NextDouble => "nextDouble",
            Check::NextFloat => "nextFloat",
            Check::NextGaussian => "nextGaussian",
            Check::NextInt => "nextInt",
            Check::NextIntBelow => "nextInt(int)",
            Check::NextIntBetween => "nextInt(low, high)",
            Check::NextLong => "nextLong",
            Check::SetSeed => "setSeed",
        }
    }

    /// Look a check up by its report name.
    pub fn from_name(name: &str) -> Option<Check> {
        Check::ALL.into_iter().find(|check| check.name() == name)
    }

    /// Position in [`Check::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runs the check battery against fresh generators and accumulates a report
pub struct Validator<S: ReportSink> {
    config: ValidatorConfig,
    sink: S,
    report: ValidationReport,
}

impl<S: ReportSink> Validator<S> {
    /// Create a validator. The config is validated up front.
    pub fn new(config: ValidatorConfig, sink: S) -> Result<Self, ValidationError> {
        config.validate()?;
        let report = ValidationReport::new(config.name.clone());
        Ok(Self {
            config,
            sink,
            report,
        })
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    pub fn into_parts(self) -> (ValidationReport, S) {
        (self.report, self.sink)
    }

    /// Run every check once, in [`Check::ALL`] order, on a fresh report.
    pub fn run_all(&mut self) -> Result<&ValidationReport, ValidationError> {
        self.report = ValidationReport::new(self.config.name.clone());
        tracing::info!(run_id = %self.report.run_id(), "{}::Initiating Tests.", self.config.name);

        for check in Check::ALL {
            self.run(check)?;
        }

        tracing::info!(
            checks = self.report.total_checks(),
            errors = self.report.total_errors(),
            "validation finished"
        );
        Ok(&self.report)
    }

    /// Run a single check and record its result.
    ///
    /// Each check gets its own generator: `Random::new(seed + index)` when
    /// the config carries a master seed, system entropy otherwise.
    pub fn run(&mut self, check: Check) -> Result<CheckResult, ValidationError> {
        let mut rng = self.generator_for(check);
        let span = tracing::info_span!("check", name = check.name());
        let _guard = span.enter();
        tracing::info!(seed = rng.seed(), "Test {}...", check);
        let started = Instant::now();

        let config = &self.config;
        let mut scope = CheckScope::new(check.name(), &mut self.sink);
        match check {
            Check::NextBoolean => checks::next_boolean(&mut scope, &mut rng, &config.boolean)?,
            Check::NextBytes => checks::next_bytes(&mut scope, &mut rng, &config.bytes)?,
            Check::NextDouble => checks::next_double(&mut scope, &mut rng, &config.double)?,
            Check::NextFloat => checks::next_float(&mut scope, &mut rng, &config.float)?,
            Check::NextGaussian => checks::next_gaussian(&mut scope, &mut rng, &config.gaussian)?,
            Check::NextInt => checks::next_int(&mut scope, &mut rng, &config.int)?,
            Check::NextIntBelow => checks::next_int_below(&mut scope, &mut rng, &config.int_below)?,
            Check::NextIntBetween => {
                checks::next_int_between(&mut scope, &mut rng, &config.int_between)?
            }
            Check::NextLong => checks::next_long(&mut scope, &mut rng, &config.long)?,
            Check::SetSeed => checks::set_seed(&mut scope, &mut rng, &config.set_seed)?,
        }
        let result = scope.finish();

        tracing::info!(
            checks = result.checks,
            errors = result.errors,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "done."
        );

        self.report.record(result.clone());
        Ok(result)
    }

    fn generator_for(&self, check: Check) -> Random {
        match self.config.seed {
            Some(seed) => Random::new(seed.wrapping_add(check.index() as i64)),
            None => Random::from_entropy(),
        }
    }
}
