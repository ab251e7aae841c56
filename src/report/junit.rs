use crate::report::report_model::{SuiteReport, page_excerpt};

// ============================================================================
// JUnit XML reporter for CI
// ============================================================================

/// Generate a JUnit XML report for CI systems.
///
/// ```xml
/// <?xml version="1.0" encoding="UTF-8"?>
/// <testsuite name="..." tests="2" failures="1" errors="0" time="1.234">
///   <testcase name="user crud" classname="console-nav" time="0.812" />
///   <testcase name="import" classname="console-nav" time="0.422">
///     <failure message="1 assertion(s) failed" type="AssertionFailure">
///       Step 3 (cluster_status): cluster 'c1' status is 'Importing', expected 'Ready to Use'
///     </failure>
///   </testcase>
/// </testsuite>
/// ```
pub fn generate_junit_xml(report: &SuiteReport) -> String {
    let time_attr = report
        .duration_ms
        .map(|ms| format!(" time=\"{:.3}\"", ms as f64 / 1000.0))
        .unwrap_or_default();

    let mut cases = String::new();
    for result in &report.results {
        if result.passed {
            cases.push_str(&format!(
                "  <testcase name=\"{}\" classname=\"console-nav\"{} />\n",
                escape_xml(&result.scenario_name),
                case_time(result.duration_ms)
            ));
        } else {
            // Collect failure details
            let failed_assertions: Vec<String> = result
                .assertion_results
                .iter()
                .filter(|ar| !ar.passed)
                .map(|ar| {
                    let msg = ar.message.as_deref().unwrap_or("assertion failed");
                    format!("Step {} ({}): {}", ar.step_index, ar.spec.type_name(), msg)
                })
                .collect();

            let failure_count = failed_assertions.len();
            let error_detail = match (&result.error, &result.visible_text) {
                (Some(e), Some(text)) => format!("Error: {}\nPage: {}", e, page_excerpt(text, 500)),
                (Some(e), None) => format!("Error: {}", e),
                _ => String::new(),
            };

            let mut body_parts = failed_assertions;
            if !error_detail.is_empty() {
                body_parts.push(error_detail);
            }
            let failure_body = body_parts.join("\n");

            // An execution error is reported as <error>, assertions as <failure>
            let (element, failure_type, failure_message) = if result.error.is_some() {
                ("error", "ExecutionError", "execution error".to_string())
            } else {
                ("failure", "AssertionFailure", format!("{} assertion(s) failed", failure_count))
            };

            cases.push_str(&format!(
                "  <testcase name=\"{name}\" classname=\"console-nav\"{time}>\n    <{element} message=\"{message}\" type=\"{kind}\">{body}</{element}>\n  </testcase>\n",
                name = escape_xml(&result.scenario_name),
                time = case_time(result.duration_ms),
                element = element,
                message = escape_xml(&failure_message),
                kind = failure_type,
                body = escape_xml(&failure_body),
            ));
        }
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<testsuite name=\"{name}\" tests=\"{tests}\" failures=\"{failures}\" errors=\"{errors}\"{time}>\n{cases}</testsuite>\n",
        name = escape_xml(&report.suite_name),
        tests = report.total,
        failures = report.failed - report.errored,
        errors = report.errored,
        time = time_attr,
        cases = cases,
    )
}

fn case_time(duration_ms: u128) -> String {
    format!(" time=\"{:.3}\"", duration_ms as f64 / 1000.0)
}

/// Escape XML special characters.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
