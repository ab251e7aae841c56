use crate::report::report_model::{SuiteReport, page_excerpt};

// ============================================================================
// Console reporter: formatted terminal output
// ============================================================================

/// Format a suite report for terminal output.
///
/// Produces output like:
/// ```text
/// === Suite: nightly ===
///
/// ✓ PASS  user crud (6 steps, 3 assertions)
/// ✗ FAIL  import cluster (4 steps, 2 assertions)
///     [FAIL] Step 3: cluster_status — cluster 'c1' status is 'Importing', expected 'Ready to Use'
///
/// === Results: 1 passed, 1 failed (2 total) ===
/// ```
pub fn format_console_report(report: &SuiteReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Suite: {} ===\n\n", report.suite_name));

    for result in &report.results {
        let assertion_count = result.assertion_results.len();
        let marker = if result.passed {
            "\u{2713} PASS"
        } else {
            "\u{2717} FAIL"
        };

        out.push_str(&format!(
            "{}  {} ({} steps, {} assertions)\n",
            marker, result.scenario_name, result.steps_run, assertion_count
        ));

        if let Some(ref error) = result.error {
            out.push_str(&format!("    [ERROR] {}\n", error));
            if let Some(ref text) = result.visible_text {
                out.push_str(&format!("    [PAGE] {}\n", page_excerpt(text, 200)));
            }
        }

        if !result.passed {
            for ar in &result.assertion_results {
                if !ar.passed {
                    let detail = ar
                        .message
                        .as_deref()
                        .unwrap_or("assertion failed");
                    out.push_str(&format!(
                        "    [FAIL] Step {}: {} — {}\n",
                        ar.step_index,
                        ar.spec.type_name(),
                        detail
                    ));
                }
            }
        }
    }

    out.push_str(&format!(
        "\n=== Results: {} passed, {} failed ({} total)",
        report.passed, report.failed, report.total
    ));

    if let Some(ms) = report.duration_ms {
        let secs = ms as f64 / 1000.0;
        out.push_str(&format!(" in {:.1}s", secs));
    }

    out.push_str(" ===\n");

    out
}
