//! Validation report
//!
//! Per-check error counts in run order, plus the running total of assertions
//! evaluated. Renders as the classic text summary or as JSON.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use uuid::Uuid;

/// Outcome of one named check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    /// Failed assertions
    pub errors: u64,
    /// Assertions evaluated
    pub checks: u64,
}

impl CheckResult {
    pub fn passed(&self) -> bool {
        self.errors == 0
    }
}

/// Summary of a validation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    run_id: Uuid,
    name: String,
    results: Vec<CheckResult>,
    total_checks: u64,
}

impl ValidationReport {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            name: name.into(),
            results: Vec::new(),
            total_checks: 0,
        }
    }

    /// Add a check outcome.
    ///
    /// A result whose name is already present is folded into the earlier
    /// entry (errors and checks both add up), so names stay unique and
    /// `total_checks` is always the sum of the per-check counts.
    pub fn record(&mut self, result: CheckResult) {
        self.total_checks += result.checks;
        match self.results.iter_mut().find(|r| r.name == result.name) {
            Some(existing) => {
                existing.errors += result.errors;
                existing.checks += result.checks;
            }
            None => self.results.push(result),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Results in the order the checks ran
    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    pub fn get(&self, name: &str) -> Option<&CheckResult> {
        self.results.iter().find(|r| r.name == name)
    }

    /// Error count of one named check
    pub fn errors(&self, name: &str) -> Option<u64> {
        self.get(name).map(|r| r.errors)
    }

    pub fn total_checks(&self) -> u64 {
        self.total_checks
    }

    pub fn total_errors(&self) -> u64 {
        self.results.iter().map(|r| r.errors).sum()
    }

    pub fn passed(&self) -> bool {
        self.total_errors() == 0
    }

    /// Text summary, as printed by the `Display` impl.
    pub fn render(&self) -> String {
        self.to_string()
    }

    pub fn write_to(&self, out: &mut impl io::Write) -> io::Result<()> {
        write!(out, "{}", self)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// ```text
/// Random (class) Error Report:
///     Test nextBoolean: 0 errors.
///     Total number of checks: 2
///     Total number of errors: 0
/// ```
impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} Error Report:", self.name)?;
        for result in &self.results {
            writeln!(f, "\tTest {}: {} errors.", result.name, result.errors)?;
        }
        writeln!(f, "\tTotal number of checks: {}", self.total_checks)?;
        writeln!(f, "\tTotal number of errors: {}", self.total_errors())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, errors: u64, checks: u64) -> CheckResult {
        CheckResult {
            name: name.to_string(),
            errors,
            checks,
        }
    }

    #[test]
    fn test_render_format() {
        let mut report = ValidationReport::new("Random (class)");
        report.record(result("nextBoolean", 0, 2));
        report.record(result("setSeed", 1, 1000));

        assert_eq!(
            report.render(),
            "Random (class) Error Report:\n\
             \tTest nextBoolean: 0 errors.\n\
             \tTest setSeed: 1 errors.\n\
             \tTotal number of checks: 1002\n\
             \tTotal number of errors: 1\n"
        );
    }

    #[test]
    fn test_repeated_check_accumulates() {
        let mut report = ValidationReport::new("r");
        report.record(result("nextInt", 2, 500));
        report.record(result("nextInt", 0, 500));

        assert_eq!(report.results().len(), 1);
        assert_eq!(report.get("nextInt"), Some(&result("nextInt", 2, 1000)));
        assert_eq!(report.total_checks(), 1000);
        assert_eq!(report.total_errors(), 2);
        assert!(!report.passed());
    }

    #[test]
    fn test_display_matches_render_and_writer() {
        let mut report = ValidationReport::new("r");
        report.record(result("nextLong", 1, 500));

        let mut bytes = Vec::new();
        report.write_to(&mut bytes).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), report.render());
        assert_eq!(format!("{}", report), report.render());
    }

    #[test]
    fn test_run_order_preserved() {
        let mut report = ValidationReport::new("r");
        for name in ["setSeed", "nextBoolean", "nextLong"] {
            report.record(result(name, 0, 1));
        }
        let names: Vec<&str> = report.results().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["setSeed", "nextBoolean", "nextLong"]);
    }

    #[test]
    fn test_json_roundtrip_keeps_run_id() {
        let mut report = ValidationReport::new("r");
        report.record(result("nextFloat", 3, 500));

        let json = report.to_json().unwrap();
        let decoded: ValidationReport = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, report);
        assert_eq!(decoded.run_id(), report.run_id());
    }

    #[test]
    fn test_unknown_check_has_no_errors_entry() {
        let report = ValidationReport::new("r");
        assert_eq!(report.errors("nextGaussian"), None);
        assert_eq!(report.total_errors(), 0);
    }
}
