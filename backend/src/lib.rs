//! Seeded Random Core
//!
//! Seedable pseudo-random value generator with a statistical self-test
//! harness.
//!
//! # Architecture
//!
//! - **rng**: Generator (`Random`) over an owned xorshift64* engine, plus the
//!   explicit system-entropy seed source
//! - **validator**: Statistical validator, its configuration, report and
//!   report sinks
//!
//! # Critical Invariants
//!
//! 1. An explicit seed fully determines every output sequence
//! 2. `set_seed` is a total reset, independent of prior history
//! 3. Bounded integer draws: `next_int_below(n)` is [0, n),
//!    `next_int_between(low, high)` is [low, high]
//! 4. Statistical failures are counted, never fatal

// Module declarations
pub mod rng;
pub mod validator;

// Re-exports for convenience
pub use rng::{Random, RandomError};
pub use validator::{
    Check, CheckFailure, CheckResult, CollectingSink, Diagnostic, ReportSink, TracingSink,
    ValidationError, ValidationReport, Validator, ValidatorConfig, WriterSink,
};
