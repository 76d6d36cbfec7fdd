//! Validator configuration
//!
//! Sample sizes, bucket counts and tolerance margins for every check. The
//! defaults are the full-size battery; tests and quick runs shrink them.
//!
//! Loaded from JSON with every field optional, at any depth. A partial
//! per-check object keeps that check's own defaults for the fields it omits:
//!
//! ```
//! use seeded_random_core::ValidatorConfig;
//!
//! let config = ValidatorConfig::from_json_str(r#"{
//!     "seed": 42,
//!     "double": { "iterations": 100000, "buckets": 10 }
//! }"#).unwrap();
//!
//! assert_eq!(config.seed, Some(42));
//! assert_eq!(config.double.buckets, 10);
//! assert_eq!(config.double.margin, 0.03); // from the double defaults
//! assert_eq!(config.float.buckets, 500); // untouched default
//! ```

use super::ValidationError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Uniform histogram check: `iterations` draws into `buckets` equal buckets,
/// each within `margin × iterations / buckets` of its expectation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketCheckConfig {
    pub iterations: u64,
    pub buckets: u32,
    /// Relative tolerance (0.03 = 3%)
    pub margin: f64,
}

impl BucketCheckConfig {
    pub const fn new(iterations: u64, buckets: u32, margin: f64) -> Self {
        Self {
            iterations,
            buckets,
            margin,
        }
    }

    /// Expected count per bucket
    pub fn expected_per_bucket(&self) -> f64 {
        self.iterations as f64 / f64::from(self.buckets)
    }

    fn validate(&self, check: &str) -> Result<(), ValidationError> {
        if self.buckets == 0 {
            return Err(invalid(check, "buckets must be > 0"));
        }
        if u64::from(self.buckets) > MAX_HISTOGRAM_BUCKETS {
            return Err(invalid(
                check,
                &format!("buckets must be <= {}", MAX_HISTOGRAM_BUCKETS),
            ));
        }
        if self.iterations < u64::from(self.buckets) {
            return Err(invalid(check, "iterations must be at least buckets"));
        }
        validate_margin(check, self.margin)
    }
}

/// Coin balance check: true and false counts each within
/// `margin × iterations` of `iterations / 2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BooleanCheckConfig {
    pub iterations: u64,
    pub margin: f64,
}

/// Gaussian histogram check over the fixed eight buckets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaussianCheckConfig {
    pub iterations: u64,
    pub margin: f64,
}

/// Byte-stream smoke test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BytesCheckConfig {
    /// Number of buffers filled
    pub buffers: u32,
    pub buffer_len: usize,
    /// Repeats after the first byte that make a run suspicious
    pub repeats: usize,
}

/// Bounded-range check: containment on each `containment` interval, then a
/// uniform histogram over `[low, high]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntRangeCheckConfig {
    pub iterations: u64,
    pub containment: Vec<(i32, i32)>,
    pub low: i32,
    pub high: i32,
    pub margin: f64,
}

impl IntRangeCheckConfig {
    /// Number of distinct values in `[low, high]`
    pub fn span(&self) -> u64 {
        (i64::from(self.high) - i64::from(self.low) + 1).max(0) as u64
    }
}

/// Seed-reproducibility check
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedCheckConfig {
    pub seed: i64,
    /// Length of the recorded baseline
    pub sequence_len: usize,
    pub repetitions: u32,
    /// Perturbation draws per repetition are picked from [0, max_perturbation)
    pub max_perturbation: i32,
}

/// Upper limit on the width of any histogram (uniform checks and the
/// bounded-range spread)
pub const MAX_HISTOGRAM_BUCKETS: u64 = 1 << 20;

/// Integer-family defaults (`int`, `int_below`, `long`)
impl Default for BucketCheckConfig {
    fn default() -> Self {
        Self::new(10_000_000, 500, 0.04)
    }
}

impl Default for BooleanCheckConfig {
    fn default() -> Self {
        Self {
            iterations: 100_000,
            margin: 0.01,
        }
    }
}

impl Default for GaussianCheckConfig {
    fn default() -> Self {
        Self {
            iterations: 20_000_000,
            margin: 0.05,
        }
    }
}

impl Default for BytesCheckConfig {
    fn default() -> Self {
        Self {
            buffers: 10_000,
            buffer_len: 1_000,
            repeats: 3,
        }
    }
}

impl Default for IntRangeCheckConfig {
    fn default() -> Self {
        Self {
            iterations: 10_000_000,
            containment: vec![(-20, -5), (-20, 15), (5, 10)],
            low: 100,
            high: 400,
            margin: 0.03,
        }
    }
}

impl Default for SeedCheckConfig {
    fn default() -> Self {
        Self {
            seed: 5,
            sequence_len: 10,
            repetitions: 100,
            max_perturbation: 1_000,
        }
    }
}

/// Full validator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Name printed in the report header
    pub name: String,

    /// Master seed. When set, check `i` runs on `Random::new(seed + i)`;
    /// otherwise every check seeds from system entropy.
    pub seed: Option<i64>,

    pub boolean: BooleanCheckConfig,
    pub bytes: BytesCheckConfig,
    pub double: BucketCheckConfig,
    pub float: BucketCheckConfig,
    pub gaussian: GaussianCheckConfig,
    pub int: BucketCheckConfig,
    /// `buckets` doubles as the exclusive bound passed to `next_int_below`
    pub int_below: BucketCheckConfig,
    pub int_between: IntRangeCheckConfig,
    pub long: BucketCheckConfig,
    pub set_seed: SeedCheckConfig,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            name: "Random (class)".to_string(),
            seed: None,
            boolean: BooleanCheckConfig::default(),
            bytes: BytesCheckConfig::default(),
            double: BucketCheckConfig::new(20_000_000, 1_000, 0.03),
            float: BucketCheckConfig::new(20_000_000, 500, 0.03),
            gaussian: GaussianCheckConfig::default(),
            int: BucketCheckConfig::default(),
            int_below: BucketCheckConfig::default(),
            int_between: IntRangeCheckConfig::default(),
            long: BucketCheckConfig::default(),
            set_seed: SeedCheckConfig::default(),
        }
    }
}

impl ValidatorConfig {
    /// Parse a JSON config; absent fields keep their defaults.
    ///
    /// The document is laid over `ValidatorConfig::default()`, so a partial
    /// per-check object falls back to that check's own battery values (the
    /// `double` and `float` histograms differ from the `BucketCheckConfig`
    /// default).
    pub fn from_json_str(json: &str) -> Result<Self, ValidationError> {
        let overrides: Value = serde_json::from_str(json)?;
        let mut merged = serde_json::to_value(Self::default())?;
        overlay(&mut merged, overrides);
        let config: Self = serde_json::from_value(merged)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot produce meaningful checks.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.boolean.iterations == 0 {
            return Err(invalid("boolean", "iterations must be > 0"));
        }
        validate_margin("boolean", self.boolean.margin)?;

        if self.bytes.buffer_len == 0 {
            return Err(invalid("bytes", "buffer_len must be > 0"));
        }
        if self.bytes.repeats == 0 {
            return Err(invalid("bytes", "repeats must be > 0"));
        }

        self.double.validate("double")?;
        self.float.validate("float")?;
        self.int.validate("int")?;
        self.long.validate("long")?;
        self.int_below.validate("int_below")?;

        if self.gaussian.iterations == 0 {
            return Err(invalid("gaussian", "iterations must be > 0"));
        }
        validate_margin("gaussian", self.gaussian.margin)?;

        let range = &self.int_between;
        if range.low > range.high {
            return Err(invalid("int_between", "low must be <= high"));
        }
        if range.span() > MAX_HISTOGRAM_BUCKETS {
            return Err(invalid(
                "int_between",
                &format!("high - low + 1 must be <= {}", MAX_HISTOGRAM_BUCKETS),
            ));
        }
        if range.iterations < range.span() {
            return Err(invalid("int_between", "iterations must be at least high - low + 1"));
        }
        if let Some((low, high)) = range.containment.iter().find(|(low, high)| low > high) {
            return Err(invalid(
                "int_between",
                &format!("containment interval [{}, {}] is inverted", low, high),
            ));
        }
        validate_margin("int_between", range.margin)?;

        if self.set_seed.sequence_len == 0 {
            return Err(invalid("set_seed", "sequence_len must be > 0"));
        }
        if self.set_seed.max_perturbation < 1 {
            return Err(invalid("set_seed", "max_perturbation must be >= 1"));
        }

        Ok(())
    }
}

/// Replace `base` with `patch`, recursing where both sides are objects.
/// Arrays and scalars are replaced whole.
fn overlay(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                match base.get_mut(&key) {
                    Some(slot) => overlay(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, patch) => *slot = patch,
    }
}

fn validate_margin(check: &str, margin: f64) -> Result<(), ValidationError> {
    if !(margin.is_finite() && margin > 0.0) {
        return Err(invalid(check, "margin must be a positive finite number"));
    }
    Ok(())
}

fn invalid(check: &str, reason: &str) -> ValidationError {
    ValidationError::InvalidConfig(format!("{}: {}", check, reason))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ValidatorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_expected_per_bucket() {
        let config = ValidatorConfig::default();
        assert_eq!(config.double.expected_per_bucket(), 20_000.0);
        assert_eq!(config.int_between.span(), 301);
    }

    #[test]
    fn test_zero_buckets_rejected() {
        let mut config = ValidatorConfig::default();
        config.float.buckets = 0;
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid config: float: buckets must be > 0");
    }

    #[test]
    fn test_non_positive_margin_rejected() {
        for margin in [0.0, -0.01, f64::NAN, f64::INFINITY] {
            let mut config = ValidatorConfig::default();
            config.gaussian.margin = margin;
            assert!(
                matches!(config.validate(), Err(ValidationError::InvalidConfig(_))),
                "margin {} accepted",
                margin
            );
        }
    }

    #[test]
    fn test_inverted_ranges_rejected() {
        let mut config = ValidatorConfig::default();
        config.int_between.low = 10;
        config.int_between.high = 9;
        assert!(config.validate().is_err());

        let mut config = ValidatorConfig::default();
        config.int_between.containment.push((3, -3));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_spread_rejected() {
        let mut config = ValidatorConfig::default();
        config.int_between.low = i32::MIN;
        config.int_between.high = i32::MAX;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_partial_override() {
        let config = ValidatorConfig::from_json_str(
            r#"{ "name": "quick", "set_seed": { "seed": 9, "sequence_len": 4, "repetitions": 3, "max_perturbation": 10 } }"#,
        )
        .unwrap();
        assert_eq!(config.name, "quick");
        assert_eq!(config.set_seed.seed, 9);
        assert_eq!(config.seed, None);
        assert_eq!(config.boolean, ValidatorConfig::default().boolean);
    }

    #[test]
    fn test_json_partial_check_keeps_its_defaults() {
        let config = ValidatorConfig::from_json_str(r#"{ "double": { "buckets": 10 } }"#).unwrap();
        let defaults = ValidatorConfig::default();

        assert_eq!(config.double.buckets, 10);
        assert_eq!(config.double.iterations, defaults.double.iterations);
        assert_eq!(config.double.margin, defaults.double.margin);
        assert_eq!(config.float, defaults.float);

        let config =
            ValidatorConfig::from_json_str(r#"{ "int_between": { "low": -3, "high": 3 } }"#).unwrap();
        assert_eq!((config.int_between.low, config.int_between.high), (-3, 3));
        assert_eq!(config.int_between.containment, defaults.int_between.containment);
        assert_eq!(config.int_between.iterations, defaults.int_between.iterations);
    }

    #[test]
    fn test_nested_configs_deserialize_from_partial_objects() {
        let bucket: BucketCheckConfig = serde_json::from_str(r#"{ "margin": 0.5 }"#).unwrap();
        assert_eq!(bucket, BucketCheckConfig::new(10_000_000, 500, 0.5));

        let seed: SeedCheckConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(seed, SeedCheckConfig::default());

        let config: ValidatorConfig =
            serde_json::from_str(r#"{ "gaussian": { "iterations": 1000 } }"#).unwrap();
        assert_eq!(config.gaussian.iterations, 1000);
        assert_eq!(config.gaussian.margin, 0.05);
    }

    #[test]
    fn test_oversized_uniform_histogram_rejected() {
        let mut config = ValidatorConfig::default();
        config.double.buckets = u32::MAX;
        config.double.iterations = u64::MAX;
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Invalid config: double: buckets must be <= {}", MAX_HISTOGRAM_BUCKETS)
        );

        let result = ValidatorConfig::from_json_str(r#"{ "long": { "buckets": 4000000000 } }"#);
        assert!(matches!(result, Err(ValidationError::InvalidConfig(_))));
    }

    #[test]
    fn test_json_invalid_values_rejected() {
        let result = ValidatorConfig::from_json_str(r#"{ "bytes": { "buffers": 1, "buffer_len": 0, "repeats": 3 } }"#);
        assert!(matches!(result, Err(ValidationError::InvalidConfig(_))));
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        let result = ValidatorConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(ValidationError::Json(_))));
    }

    #[test]
    fn test_config_json_roundtrip() {
        let config = ValidatorConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let decoded = ValidatorConfig::from_json_str(&json).unwrap();
        assert_eq!(decoded, config);
    }
}
