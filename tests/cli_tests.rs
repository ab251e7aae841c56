use std::collections::HashMap;
use std::io::Write;

use clap::Parser;
use console_nav::cli::commands::{format_destinations, load_scenarios};
use console_nav::cli::config::{
    AppConfig, Cli, Commands, DeplintCheck, RpmCheck, apply_env, load_config,
};

// ============================================================================
// CLI Argument Parsing Tests
// ============================================================================

#[test]
fn cli_parse_run_minimal() {
    let cli = Cli::parse_from(["console-nav", "run", "--spec", "scenarios/"]);
    match cli.command {
        Commands::Run { spec, format, output } => {
            assert_eq!(spec, "scenarios/");
            assert!(format.is_none());
            assert!(output.is_none());
        }
        _ => panic!("Expected Run command"),
    }
    assert_eq!(cli.verbose, 0);
    assert!(cli.config.is_none());
}

#[test]
fn cli_parse_run_with_format() {
    let cli = Cli::parse_from([
        "console-nav",
        "run",
        "--spec",
        "smoke.yaml",
        "--format",
        "junit",
        "-o",
        "report.xml",
    ]);
    match cli.command {
        Commands::Run { spec, format, output } => {
            assert_eq!(spec, "smoke.yaml");
            assert_eq!(format.as_deref(), Some("junit"));
            assert_eq!(output.as_deref(), Some("report.xml"));
        }
        _ => panic!("Expected Run command"),
    }
}

#[test]
fn cli_parse_navigate() {
    let cli = Cli::parse_from([
        "console-nav",
        "navigate",
        "--subject",
        "cluster=c1",
        "--destination",
        "Tasks",
    ]);
    match cli.command {
        Commands::Navigate { subject, destination } => {
            assert_eq!(subject, "cluster=c1");
            assert_eq!(destination, "Tasks");
        }
        _ => panic!("Expected Navigate command"),
    }
}

#[test]
fn cli_parse_global_flags() {
    let cli = Cli::parse_from(["console-nav", "destinations", "-vv", "--config", "lab.yaml"]);
    assert!(matches!(cli.command, Commands::Destinations));
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.config.as_deref(), Some("lab.yaml"));
}

#[test]
fn cli_parse_rpm_checks() {
    let cli = Cli::parse_from(["console-nav", "rpm", "repoclosure", "--repo", "http://repo/"]);
    match cli.command {
        Commands::Rpm {
            check: RpmCheck::Repoclosure { repo },
        } => assert_eq!(repo.as_deref(), Some("http://repo/")),
        _ => panic!("Expected rpm repoclosure"),
    }

    let cli = Cli::parse_from(["console-nav", "rpm", "rpmdeplint", "pkg.rpm"]);
    match cli.command {
        Commands::Rpm {
            check: RpmCheck::Rpmdeplint { rpm, check },
        } => {
            assert_eq!(rpm, "pkg.rpm");
            assert_eq!(check, DeplintCheck::CheckConflicts);
        }
        _ => panic!("Expected rpm rpmdeplint"),
    }

    let cli = Cli::parse_from([
        "console-nav",
        "rpm",
        "rpmdeplint",
        "pkg.rpm",
        "--check",
        "check-upgrade",
    ]);
    match cli.command {
        Commands::Rpm {
            check: RpmCheck::Rpmdeplint { check, .. },
        } => assert_eq!(check.as_arg(), "check-upgrade"),
        _ => panic!("Expected rpm rpmdeplint"),
    }
}

#[test]
fn cli_rejects_missing_subcommand_args() {
    assert!(Cli::try_parse_from(["console-nav", "navigate", "--subject", "clusters"]).is_err());
    assert!(Cli::try_parse_from(["console-nav", "rpm", "rpmlint"]).is_err());
}

// ============================================================================
// Config File Tests
// ============================================================================

#[test]
fn config_load_missing_file() {
    let config = load_config(Some("nonexistent_file_that_does_not_exist.yaml"));
    assert_eq!(config.console.hostname, "localhost");
    assert_eq!(config.run.format, "console");
}

#[test]
fn config_default_values() {
    let config = AppConfig::default();
    assert_eq!(config.console.scheme, "http");
    assert_eq!(config.console.username, "admin");
    assert_eq!(config.console.base_url(), "http://localhost/");
    assert_eq!(config.console.api_base_url(), "http://localhost");
    assert_eq!(config.browser.node, "node");
    assert_eq!(config.waits.navigation_secs, 30);
    assert_eq!(config.waits.task_secs, 700);
    assert_eq!(config.waits.max_depth, 16);
    assert_eq!(config.run.screenshots_dir, "screenshots");
    assert!(config.run.trace.is_none());
    assert!(config.packaging.repo_url.is_none());
}

#[test]
fn config_yaml_roundtrip() {
    let config = AppConfig::default();
    let yaml = serde_yaml::to_string(&config).unwrap();
    let parsed: AppConfig = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(parsed.console.hostname, config.console.hostname);
    assert_eq!(parsed.waits, config.waits);
    assert_eq!(parsed.run.format, config.run.format);
}

#[test]
fn config_partial_yaml_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
console:
  hostname: usm.lab.example.com
  scheme: https
  api_url: https://api.lab.example.com/
waits:
  status_secs: 900
packaging:
  repo_url: http://repo.lab/tendrl/
  base_repos:
    - name: centos
      url: http://mirror.lab/centos/7/os/x86_64/
"#
    )
    .unwrap();

    let config = load_config(file.path().to_str());

    assert_eq!(config.console.base_url(), "https://usm.lab.example.com/");
    assert_eq!(config.console.api_base_url(), "https://api.lab.example.com");
    assert_eq!(config.console.username, "admin");
    assert_eq!(config.waits.status_secs, 900);
    assert_eq!(config.waits.view_secs, 30);
    assert_eq!(config.packaging.base_repos.len(), 1);
    assert_eq!(config.packaging.base_repos[0].name, "centos");
}

#[test]
fn config_malformed_file_falls_back_to_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "console: [not, a, map").unwrap();
    let config = load_config(file.path().to_str());
    assert_eq!(config.console.hostname, "localhost");
}

#[test]
fn environment_overrides_console_settings() {
    let env: HashMap<&str, &str> = [
        ("USM_HOSTNAME", "usm.example.com"),
        ("USM_PASSWORD", "s3cret"),
    ]
    .into_iter()
    .collect();
    let mut config = AppConfig::default();

    apply_env(&mut config, |key| env.get(key).map(|v| v.to_string()));

    assert_eq!(config.console.hostname, "usm.example.com");
    assert_eq!(config.console.password, "s3cret");
    assert_eq!(config.console.username, "admin");
    assert_eq!(config.console.scheme, "http");
}

#[test]
fn wait_config_builds_bounded_waits() {
    let waits = AppConfig::default().waits;
    assert_eq!(waits.navigation().timeout.as_secs(), 30);
    assert_eq!(waits.navigation().delay.as_millis(), 500);
    assert_eq!(waits.task().timeout.as_secs(), 700);
    assert_eq!(waits.status().delay.as_millis(), 2000);
    assert_eq!(waits.settle().as_secs(), 5);
}

// ============================================================================
// Command helpers
// ============================================================================

#[test]
fn destinations_listing_shows_prerequisites() {
    let listing = format_destinations(&AppConfig::default()).unwrap();
    let task_line = listing
        .lines()
        .find(|l| l.starts_with("task "))
        .unwrap();
    assert!(task_line.contains("Events"));
    assert!(task_line.ends_with("<- parent.Tasks"));
    assert!(listing.lines().any(|l| l.starts_with("web_ui") && l.ends_with("<- LoginPage")));
}

#[test]
fn load_scenarios_single_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("smoke.yaml");
    std::fs::write(
        &path,
        r#"
name: "Smoke"
steps:
  - action: login
  - action: assert
    assertions:
      - type: text_present
        expected: "Clusters"
"#,
    )
    .unwrap();

    let scenarios = load_scenarios(path.to_str().unwrap()).unwrap();

    assert_eq!(scenarios.len(), 1);
    assert_eq!(scenarios[0].name, "Smoke");
    assert_eq!(scenarios[0].steps.len(), 2);
}

#[test]
fn load_scenarios_directory_sorted_by_name() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.yaml"), "name: zeta\nsteps: []\n").unwrap();
    std::fs::write(dir.path().join("b.yml"), "name: alpha\nsteps: []\n").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not a scenario").unwrap();

    let scenarios = load_scenarios(dir.path().to_str().unwrap()).unwrap();

    let names: Vec<&str> = scenarios.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "zeta"]);
}

#[test]
fn load_scenarios_names_the_broken_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.yaml");
    std::fs::write(&path, "name: broken\nsteps:\n  - action: teleport\n").unwrap();

    let err = load_scenarios(path.to_str().unwrap()).unwrap_err();

    assert!(err.to_string().contains("broken.yaml"));
}

#[test]
fn bundled_scenarios_parse() {
    let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/scenarios");
    let scenarios = load_scenarios(dir).unwrap();
    assert_eq!(scenarios.len(), 3);
    assert_eq!(scenarios[0].name, "Cluster import and unmanage");
    assert!(scenarios.iter().all(|s| !s.steps.is_empty()));
}

#[test]
fn example_config_parses() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/console-nav.example.yaml");
    let content = std::fs::read_to_string(path).unwrap();
    let config: AppConfig = serde_yaml::from_str(&content).unwrap();
    assert_eq!(config.console.base_url(), "https://usm.example.com/");
    assert_eq!(config.packaging.base_repos.len(), 2);
    assert_eq!(config.run.trace.as_deref(), Some("nav-trace.jsonl"));
}
