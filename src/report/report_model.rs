use serde::{Deserialize, Serialize};

use crate::scenario::model::ScenarioResult;

// ============================================================================
// Suite report
// ============================================================================

/// Outcome of one `run` over a scenario file or directory.
///
/// A scenario fails either because one of its assertions did not hold or
/// because a step aborted it. The second kind is also counted in `errored`,
/// which JUnit reports as `<error>` rather than `<failure>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    /// File stem or directory name the scenarios were loaded from
    pub suite_name: String,

    pub total: usize,
    pub passed: usize,
    pub failed: usize,

    /// Failed scenarios that stopped on a step error
    pub errored: usize,

    /// Wall time of the whole run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u128>,

    /// In the order the scenarios ran
    pub results: Vec<ScenarioResult>,
}

impl SuiteReport {
    pub fn from_results(suite_name: &str, results: Vec<ScenarioResult>) -> Self {
        let passed = results.iter().filter(|r| r.passed).count();
        let errored = results
            .iter()
            .filter(|r| !r.passed && r.error.is_some())
            .count();
        Self {
            suite_name: suite_name.to_string(),
            total: results.len(),
            passed,
            failed: results.len() - passed,
            errored,
            duration_ms: None,
            results,
        }
    }

    pub fn with_duration(mut self, duration_ms: u128) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Decides the process exit status of `run`.
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Passed and evaluated assertions over every scenario.
    pub fn assertion_tally(&self) -> (usize, usize) {
        self.results.iter().fold((0, 0), |(passed, total), result| {
            let ok = result.assertion_results.iter().filter(|a| a.passed).count();
            (passed + ok, total + result.assertion_results.len())
        })
    }
}

/// First `max` characters of the page text captured at an error, on one line.
pub fn page_excerpt(text: &str, max: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        flat
    } else {
        let cut: String = flat.chars().take(max).collect();
        format!("{}...", cut)
    }
}
