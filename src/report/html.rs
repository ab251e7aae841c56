use crate::report::report_model::{SuiteReport, page_excerpt};
use crate::scenario::ScenarioResult;

// ============================================================================
// HTML reporter: self-contained page
// ============================================================================

/// Generate a self-contained HTML report.
///
/// One card per scenario. Failed assertions are tabulated with the value
/// actually seen; scenarios ended by an error also show the page text at
/// that moment. CSS is inline.
pub fn generate_html_report(report: &SuiteReport) -> String {
    let (banner_class, status_text) = if report.all_passed() {
        ("ok", "ALL SCENARIOS PASSED")
    } else {
        ("ko", "SOME SCENARIOS FAILED")
    };

    let duration_text = report
        .duration_ms
        .map(|ms| format!(" in {:.1}s", ms as f64 / 1000.0))
        .unwrap_or_default();

    let scenarios: String = report.results.iter().map(scenario_card).collect();
    let (assertions_passed, assertions_total) = report.assertion_tally();

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>{suite_name} — Scenario Report</title>
<style>
body {{ font-family: "Open Sans", Helvetica, Arial, sans-serif; margin: 0; background: #f1f1f1; color: #363636; }}
header {{ color: #fff; padding: 16px 28px; }}
header.ok {{ background: #3f9c35; }}
header.ko {{ background: #cc0000; }}
header h1 {{ margin: 0; font-size: 22px; }}
header p {{ margin: 4px 0 0 0; }}
main {{ max-width: 960px; margin: 16px auto; padding: 0 16px; }}
.scenario {{ background: #fff; border-top: 3px solid #bbb; padding: 12px 18px; margin-bottom: 14px; }}
.scenario.pass {{ border-top-color: #3f9c35; }}
.scenario.fail {{ border-top-color: #cc0000; }}
.scenario h2 {{ margin: 0 0 4px 0; font-size: 16px; }}
.meta {{ color: #72767b; font-size: 13px; }}
.error {{ color: #cc0000; font-weight: bold; }}
table {{ border-collapse: collapse; width: 100%; margin-top: 8px; font-size: 13px; }}
th, td {{ border: 1px solid #d1d1d1; padding: 4px 8px; text-align: left; vertical-align: top; }}
th {{ background: #f5f5f5; }}
.page {{ background: #fafafa; border: 1px solid #e7e7e7; padding: 8px; font-size: 12px; white-space: pre-wrap; }}
</style>
</head>
<body>
<header class="{banner_class}">
<h1>{status_text}</h1>
<p>{suite_name}: {passed} passed, {failed} failed ({total} total){duration}; {assertions_passed}/{assertions_total} assertions held</p>
</header>
<main>
{scenarios}</main>
</body>
</html>"##,
        suite_name = escape_html(&report.suite_name),
        banner_class = banner_class,
        status_text = status_text,
        passed = report.passed,
        failed = report.failed,
        total = report.total,
        duration = duration_text,
        assertions_passed = assertions_passed,
        assertions_total = assertions_total,
        scenarios = scenarios,
    )
}

fn scenario_card(result: &ScenarioResult) -> String {
    let (class, marker) = if result.passed {
        ("pass", "\u{2713}")
    } else {
        ("fail", "\u{2717}")
    };
    let passed_assertions = result.assertion_results.iter().filter(|ar| ar.passed).count();

    let mut card = format!(
        "<div class=\"scenario {}\">\n<h2>{} {}</h2>\n<p class=\"meta\">{} steps, {}/{} assertions passed, {:.1}s</p>\n",
        class,
        marker,
        escape_html(&result.scenario_name),
        result.steps_run,
        passed_assertions,
        result.assertion_results.len(),
        result.duration_ms as f64 / 1000.0,
    );

    if let Some(error) = &result.error {
        card.push_str(&format!("<p class=\"error\">{}</p>\n", escape_html(error)));
        if let Some(text) = &result.visible_text {
            card.push_str(&format!(
                "<pre class=\"page\">{}</pre>\n",
                escape_html(&page_excerpt(text, 2000))
            ));
        }
    }

    let failed: Vec<_> = result.assertion_results.iter().filter(|ar| !ar.passed).collect();
    if !failed.is_empty() {
        card.push_str("<table>\n<tr><th>Step</th><th>Assertion</th><th>Actual</th><th>Message</th></tr>\n");
        for ar in failed {
            card.push_str(&format!(
                "<tr><td>{}</td><td><code>{}</code></td><td>{}</td><td>{}</td></tr>\n",
                ar.step_index,
                ar.spec.type_name(),
                escape_html(ar.actual.as_deref().unwrap_or("-")),
                escape_html(ar.message.as_deref().unwrap_or("assertion failed")),
            ));
        }
        card.push_str("</table>\n");
    }

    card.push_str("</div>\n");
    card
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
