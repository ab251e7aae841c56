use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::wait::Wait;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "console-nav",
    version,
    about = "UI test automation for the storage console"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: console-nav.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run scenarios from YAML files
    Run {
        /// Path to scenario YAML file or directory of YAML files
        #[arg(long)]
        spec: String,

        /// Output format: console, html, junit
        #[arg(long)]
        format: Option<String>,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Log in and navigate to one destination, then print the page text
    Navigate {
        /// Subject, e.g. `clusters`, `cluster=c1`, `task=c1/<task id>`
        #[arg(long)]
        subject: String,

        /// Destination name, e.g. `All`, `Hosts`, `Events`
        #[arg(long)]
        destination: String,
    },

    /// List every registered destination
    Destinations,

    /// Packaging checks
    Rpm {
        #[command(subcommand)]
        check: RpmCheck,
    },
}

#[derive(Subcommand, Debug)]
pub enum RpmCheck {
    /// Verify the repository closure against the configured base repos
    Repoclosure {
        /// Repository URL (default: packaging.repo_url from config)
        #[arg(long)]
        repo: Option<String>,
    },

    /// Lint one package file
    Rpmlint {
        rpm: String,
    },

    /// Dependency analysis of one package
    Rpmdeplint {
        rpm: String,

        #[arg(long, value_enum, default_value_t = DeplintCheck::CheckConflicts)]
        check: DeplintCheck,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeplintCheck {
    CheckSat,
    CheckRepoclosure,
    CheckConflicts,
    CheckUpgrade,
}

impl DeplintCheck {
    pub fn as_arg(&self) -> &'static str {
        match self {
            DeplintCheck::CheckSat => "check-sat",
            DeplintCheck::CheckRepoclosure => "check-repoclosure",
            DeplintCheck::CheckConflicts => "check-conflicts",
            DeplintCheck::CheckUpgrade => "check-upgrade",
        }
    }
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `console-nav.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub console: ConsoleConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub waits: WaitConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub packaging: PackagingConfig,
}

/// Where the console lives and who logs in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default = "default_hostname")]
    pub hostname: String,

    #[serde(default = "default_scheme")]
    pub scheme: String,

    #[serde(default = "default_username")]
    pub username: String,

    #[serde(default)]
    pub password: String,

    /// REST API root, when it is not `<scheme>://<hostname>`
    #[serde(default)]
    pub api_url: Option<String>,
}

impl ConsoleConfig {
    pub fn base_url(&self) -> String {
        format!("{}://{}/", self.scheme, self.hostname.trim_end_matches('/'))
    }

    pub fn api_base_url(&self) -> String {
        match &self.api_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("{}://{}", self.scheme, self.hostname.trim_end_matches('/')),
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            hostname: default_hostname(),
            scheme: default_scheme(),
            username: default_username(),
            password: String::new(),
            api_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_node")]
    pub node: String,

    #[serde(default = "default_server_script")]
    pub server_script: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            node: default_node(),
            server_script: default_server_script(),
        }
    }
}

/// Bounds of every explicit wait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitConfig {
    /// Post-step display check of navigation
    #[serde(default = "default_navigation_secs")]
    pub navigation_secs: u64,

    #[serde(default = "default_navigation_delay_ms")]
    pub navigation_delay_ms: u64,

    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// A view expected after a form submit or dialog
    #[serde(default = "default_view_secs")]
    pub view_secs: u64,

    /// A task reaching Completed or Failed
    #[serde(default = "default_task_secs")]
    pub task_secs: u64,

    /// A cluster reaching a terminal status in the list
    #[serde(default = "default_status_secs")]
    pub status_secs: u64,

    #[serde(default = "default_poll_delay_ms")]
    pub poll_delay_ms: u64,

    /// Pause after profiling flips while the backend finishes the change
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

impl WaitConfig {
    pub fn navigation(&self) -> Wait {
        Wait::secs(self.navigation_secs)
            .delay(Duration::from_millis(self.navigation_delay_ms))
            .message("destination not displayed")
    }

    pub fn view(&self) -> Wait {
        Wait::secs(self.view_secs).delay(self.poll_delay())
    }

    pub fn task(&self) -> Wait {
        Wait::secs(self.task_secs).delay(self.poll_delay())
    }

    pub fn status(&self) -> Wait {
        Wait::secs(self.status_secs).delay(self.poll_delay())
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    fn poll_delay(&self) -> Duration {
        Duration::from_millis(self.poll_delay_ms)
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            navigation_secs: default_navigation_secs(),
            navigation_delay_ms: default_navigation_delay_ms(),
            max_depth: default_max_depth(),
            view_secs: default_view_secs(),
            task_secs: default_task_secs(),
            status_secs: default_status_secs(),
            poll_delay_ms: default_poll_delay_ms(),
            settle_ms: default_settle_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_console")]
    pub format: String,

    pub output: Option<String>,

    #[serde(default = "default_screenshots_dir")]
    pub screenshots_dir: String,

    /// JSONL navigation trace; disabled when unset
    pub trace: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            format: default_console(),
            output: None,
            screenshots_dir: default_screenshots_dir(),
            trace: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackagingConfig {
    /// Repository holding the packages under test
    pub repo_url: Option<String>,

    /// Repositories the packages may depend on, as `name -> url`
    #[serde(default)]
    pub base_repos: Vec<NamedRepo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRepo {
    pub name: String,
    pub url: String,
}

// Serde default helpers
fn default_hostname() -> String { "localhost".to_string() }
fn default_scheme() -> String { "http".to_string() }
fn default_username() -> String { "admin".to_string() }
fn default_node() -> String { "node".to_string() }
fn default_server_script() -> String { "node/browser_server.js".to_string() }
fn default_navigation_secs() -> u64 { 30 }
fn default_navigation_delay_ms() -> u64 { 500 }
fn default_max_depth() -> usize { 16 }
fn default_view_secs() -> u64 { 30 }
fn default_task_secs() -> u64 { 700 }
fn default_status_secs() -> u64 { 600 }
fn default_poll_delay_ms() -> u64 { 2000 }
fn default_settle_ms() -> u64 { 5000 }
fn default_console() -> String { "console".to_string() }
fn default_screenshots_dir() -> String { "screenshots".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

pub const DEFAULT_CONFIG_PATH: &str = "console-nav.yaml";

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    match std::fs::read_to_string(config_path) {
        Ok(content) => match serde_yaml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = config_path, error = %e, "malformed config file, using defaults");
                AppConfig::default()
            }
        },
        Err(_) => AppConfig::default(),
    }
}

/// Apply `USM_*` overrides through `lookup` (normally `std::env::var`).
pub fn apply_env<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let console = &mut config.console;
    if let Some(hostname) = lookup("USM_HOSTNAME") {
        console.hostname = hostname;
    }
    if let Some(scheme) = lookup("USM_SCHEME") {
        console.scheme = scheme;
    }
    if let Some(username) = lookup("USM_USERNAME") {
        console.username = username;
    }
    if let Some(password) = lookup("USM_PASSWORD") {
        console.password = password;
    }
}

/// File config with process environment overrides applied.
pub fn resolve_config(path: Option<&str>) -> AppConfig {
    let mut config = load_config(path);
    apply_env(&mut config, |key| std::env::var(key).ok());
    config
}
