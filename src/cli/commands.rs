use std::path::Path;

use crate::api::ApiClient;
use crate::browser::session::BrowserSession;
use crate::cli::config::{AppConfig, RpmCheck};
use crate::entities::{Application, Subject};
use crate::entities::destinations;
use crate::packaging::rpm;
use crate::report::console::format_console_report;
use crate::report::html::generate_html_report;
use crate::report::junit::generate_junit_xml;
use crate::report::report_model::SuiteReport;
use crate::scenario::model::Scenario;
use crate::scenario::runner::ScenarioRunner;
use crate::trace::logger::TraceLogger;

// ============================================================================
// Application setup
// ============================================================================

/// Launch the browser server and wrap it in an application session.
pub fn open_application(config: &AppConfig) -> Result<Application, Box<dyn std::error::Error>> {
    let session = BrowserSession::launch(&config.browser.node, &config.browser.server_script)?;
    let trace = match &config.run.trace {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    };
    let app = Application::new(config.console.clone(), Box::new(session))?
        .with_waits(config.waits.clone())
        .with_trace(trace)
        .with_screenshots_dir(&config.run.screenshots_dir);
    Ok(app)
}

// ============================================================================
// run subcommand
// ============================================================================

/// Run scenarios and return whether all passed.
pub fn cmd_run(
    spec_path: &str,
    format: &str,
    output: Option<&str>,
    config: &AppConfig,
) -> Result<bool, Box<dyn std::error::Error>> {
    let scenarios = load_scenarios(spec_path)?;

    if scenarios.is_empty() {
        tracing::warn!(path = spec_path, "no scenarios found");
        return Ok(true);
    }

    tracing::info!(count = scenarios.len(), "running scenarios");

    let app = open_application(config)?;
    let api = ApiClient::new(&config.console.api_base_url());
    let start = std::time::Instant::now();

    let mut results = Vec::new();
    for scenario in &scenarios {
        let result = ScenarioRunner::run(scenario, &app, Some(&api));
        tracing::info!(scenario = %scenario.name, passed = result.passed, "scenario finished");
        results.push(result);
    }

    let duration = start.elapsed().as_millis();
    app.quit()?;

    let report = SuiteReport::from_results(&config.console.hostname, results).with_duration(duration);
    let all_passed = report.all_passed();

    write_output(&render_report(&report, format), output)?;
    Ok(all_passed)
}

/// Render a report in the named format; unknown formats fall back to console.
pub fn render_report(report: &SuiteReport, format: &str) -> String {
    match format {
        "html" => generate_html_report(report),
        "junit" => generate_junit_xml(report),
        _ => format_console_report(report),
    }
}

fn write_output(content: &str, output: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => std::fs::write(path, content)?,
        None => print!("{}", content),
    }
    Ok(())
}

/// Load scenarios from a single YAML file or a directory of YAML files.
pub fn load_scenarios(path: &str) -> Result<Vec<Scenario>, Box<dyn std::error::Error>> {
    let metadata = std::fs::metadata(path)?;
    if metadata.is_dir() {
        let mut scenarios = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            let p = entry.path();
            if p.extension().is_some_and(|e| e == "yaml" || e == "yml") {
                scenarios.push(load_scenario(&p)?);
            }
        }
        // Sort by name for deterministic order
        scenarios.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(scenarios)
    } else {
        Ok(vec![load_scenario(Path::new(path))?])
    }
}

fn load_scenario(path: &Path) -> Result<Scenario, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    let scenario = serde_yaml::from_str(&content)
        .map_err(|e| format!("{}: {}", path.display(), e))?;
    Ok(scenario)
}

// ============================================================================
// navigate / destinations subcommands
// ============================================================================

/// Navigate to one destination and print where we ended up.
pub fn cmd_navigate(subject: &str, destination: &str, config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let subject: Subject = subject.parse()?;
    let app = open_application(config)?;
    let result = app.navigate_to(&subject, destination);
    let outcome = match result {
        Ok(view) => {
            println!("Reached {} {} ({})", subject, destination, view.name());
            println!("{}", app.visible_text()?);
            Ok(())
        }
        Err(e) => Err(e.into()),
    };
    app.quit()?;
    outcome
}

/// One line per registered destination: kind, name and prerequisite.
pub fn format_destinations(config: &AppConfig) -> Result<String, Box<dyn std::error::Error>> {
    let registry = destinations::registry(&config.console)?;
    let mut out = String::new();
    for info in registry.destinations() {
        out.push_str(&format!("{:<20} {:<12} <- {}\n", info.kind.as_str(), info.name, info.prerequisite));
    }
    Ok(out)
}

pub fn cmd_destinations(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    print!("{}", format_destinations(config)?);
    Ok(())
}

// ============================================================================
// rpm subcommand
// ============================================================================

/// Run one packaging check, print failures and return whether it passed.
pub fn cmd_rpm(check: &RpmCheck, config: &AppConfig) -> Result<bool, Box<dyn std::error::Error>> {
    let packaging = &config.packaging;
    let repo_url = |given: Option<&str>| -> Result<String, Box<dyn std::error::Error>> {
        given
            .map(str::to_string)
            .or_else(|| packaging.repo_url.clone())
            .ok_or_else(|| "no repository URL: pass --repo or set packaging.repo_url".into())
    };

    let command = match check {
        RpmCheck::Repoclosure { repo } => rpm::repoclosure(&repo_url(repo.as_deref())?, &packaging.base_repos),
        RpmCheck::Rpmlint { rpm } => rpm::rpmlint(rpm),
        RpmCheck::Rpmdeplint { rpm, check } => rpm::rpmdeplint(
            check.as_arg(),
            rpm,
            &repo_url(None)?,
            &packaging.base_repos,
        ),
    };

    let result = rpm::run(&command)?;
    println!("{}", result.command);
    for line in &result.failures {
        println!("  [FAIL] {}", line);
    }
    let passed = result.passed();
    println!("{}", if passed { "PASS" } else { "FAIL" });
    Ok(passed)
}
