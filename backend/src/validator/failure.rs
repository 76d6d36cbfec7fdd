//! Recorded check failures
//!
//! None of these stop a run. Each one is counted against the check that
//! produced it and handed to the report sink as a [`Diagnostic`].

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A value attached to a diagnostic (acquired or expected)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{:.1}", v),
            Value::Text(v) => f.write_str(v),
        }
    }
}

/// Why a single assertion failed
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum CheckFailure {
    /// Bucket count outside its tolerance band
    #[error("percentage problem [{bucket}]: acquired ({observed}); expected ({expected:.1})")]
    StatisticalDeviation {
        bucket: String,
        observed: u64,
        expected: f64,
    },

    /// Generated value outside an inclusive bound
    #[error("value outside expected interval [{low}, {high}]: [{value}]")]
    RangeViolation { value: i64, low: i64, high: i64 },

    /// Unit-interval value outside [0, 1)
    #[error("value outside expected interval [0, 1): [{value}]")]
    OutsideUnitInterval { value: f64 },

    /// Post-reseed output differs from the recorded baseline
    #[error("sequence diverged after reseed at index {index}: acquired ({acquired}); expected ({expected})")]
    ReproducibilityMismatch {
        index: usize,
        acquired: i64,
        expected: i64,
    },

    /// Improbable (not impossible) run of identical bytes
    #[error("unlikely sequence of bytes occurred: {length} x {byte:#04x} at offset {offset}")]
    UnlikelyByteRun {
        offset: usize,
        byte: u8,
        length: usize,
    },

    /// Generator accepted arguments it must reject
    #[error("{call} accepted an invalid argument")]
    PreconditionNotEnforced { call: String },
}

impl CheckFailure {
    /// Value the generator actually produced, if the failure carries one.
    pub fn acquired(&self) -> Option<Value> {
        match self {
            CheckFailure::StatisticalDeviation { observed, .. } => Some(Value::Int(*observed as i64)),
            CheckFailure::RangeViolation { value, .. } => Some(Value::Int(*value)),
            CheckFailure::OutsideUnitInterval { value } => Some(Value::Float(*value)),
            CheckFailure::ReproducibilityMismatch { acquired, .. } => Some(Value::Int(*acquired)),
            CheckFailure::UnlikelyByteRun { length, .. } => Some(Value::Int(*length as i64)),
            CheckFailure::PreconditionNotEnforced { .. } => None,
        }
    }

    /// Value the check expected, if the failure carries one.
    pub fn expected(&self) -> Option<Value> {
        match self {
            CheckFailure::StatisticalDeviation { expected, .. } => Some(Value::Float(*expected)),
            CheckFailure::RangeViolation { low, high, .. } => {
                Some(Value::Text(format!("[{}, {}]", low, high)))
            }
            CheckFailure::OutsideUnitInterval { .. } => Some(Value::Text("[0, 1)".to_string())),
            CheckFailure::ReproducibilityMismatch { expected, .. } => Some(Value::Int(*expected)),
            CheckFailure::UnlikelyByteRun { .. } => None,
            CheckFailure::PreconditionNotEnforced { .. } => {
                Some(Value::Text("rejected call".to_string()))
            }
        }
    }
}

/// One failed assertion, labelled with the check that ran it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub check: String,
    pub failure: CheckFailure,
}

impl Diagnostic {
    pub fn new(check: impl Into<String>, failure: CheckFailure) -> Self {
        Self {
            check: check.into(),
            failure,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.check, self.failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deviation_line() {
        let diagnostic = Diagnostic::new(
            "nextDouble",
            CheckFailure::StatisticalDeviation {
                bucket: "12".to_string(),
                observed: 19_200,
                expected: 20_000.0,
            },
        );
        assert_eq!(
            diagnostic.to_string(),
            "nextDouble: percentage problem [12]: acquired (19200); expected (20000.0)"
        );
        assert_eq!(diagnostic.failure.acquired(), Some(Value::Int(19_200)));
        assert_eq!(diagnostic.failure.expected(), Some(Value::Float(20_000.0)));
    }

    #[test]
    fn test_byte_run_line() {
        let failure = CheckFailure::UnlikelyByteRun {
            offset: 40,
            byte: 0x0a,
            length: 4,
        };
        assert_eq!(
            failure.to_string(),
            "unlikely sequence of bytes occurred: 4 x 0x0a at offset 40"
        );
        assert_eq!(failure.expected(), None);
    }

    #[test]
    fn test_range_violation_values() {
        let failure = CheckFailure::RangeViolation {
            value: 11,
            low: 5,
            high: 10,
        };
        assert_eq!(failure.acquired(), Some(Value::Int(11)));
        assert_eq!(
            failure.expected().map(|v| v.to_string()),
            Some("[5, 10]".to_string())
        );
    }

    #[test]
    fn test_failure_json_is_tagged() {
        let failure = CheckFailure::PreconditionNotEnforced {
            call: "next_int_below(0)".to_string(),
        };
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["kind"], "PreconditionNotEnforced");
        assert_eq!(json["call"], "next_int_below(0)");
    }
}
