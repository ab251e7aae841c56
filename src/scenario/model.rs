use serde::{Deserialize, Serialize};

use crate::entities::clusters::Profiling;
use crate::entities::credentials::NewContentCredential;
use crate::entities::templates::NewTemplate;
use crate::entities::users::{NewUser, UserChanges};

/// A scenario: an ordered list of console actions and checks, read from
/// YAML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    /// Human-readable name for this scenario
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Ordered list of steps to execute
    pub steps: Vec<Step>,
}

/// A single step in a scenario.
///
/// Clusters are named by the identifier the scenario uses for them (their
/// id before import); the runner keeps track of renames.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Reach the logged-in landing page
    Login,

    /// Navigate to any registered destination
    Navigate {
        /// Subject in its display form, e.g. `cluster=c1`
        subject: String,
        destination: String,
    },

    CreateUser(NewUser),

    EditUser {
        user_id: String,
        #[serde(flatten)]
        changes: UserChanges,
    },

    DeleteUser {
        user_id: String,
    },

    ImportCluster {
        cluster: String,
        /// New display name
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        profiling: Profiling,
        #[serde(default)]
        view_progress: bool,
        #[serde(default = "default_true")]
        expect_success: bool,
    },

    UnmanageCluster {
        cluster: String,
        #[serde(default)]
        view_progress: bool,
        #[serde(default = "default_true")]
        expect_success: bool,
    },

    EnableProfiling {
        cluster: String,
    },

    DisableProfiling {
        cluster: String,
    },

    ExpandCluster {
        cluster: String,
    },

    CreateContentCredential(NewContentCredential),

    DeleteContentCredential {
        name: String,
    },

    CreateTemplate(NewTemplate),

    DeleteTemplate {
        name: String,
    },

    /// Pause for a fixed time
    Wait {
        duration_ms: u64,
    },

    /// Run assertions against the console
    Assert {
        assertions: Vec<AssertionSpec>,
    },
}

impl Step {
    /// Action name as written in YAML.
    pub fn action(&self) -> &'static str {
        match self {
            Step::Login => "login",
            Step::Navigate { .. } => "navigate",
            Step::CreateUser(_) => "create_user",
            Step::EditUser { .. } => "edit_user",
            Step::DeleteUser { .. } => "delete_user",
            Step::ImportCluster { .. } => "import_cluster",
            Step::UnmanageCluster { .. } => "unmanage_cluster",
            Step::EnableProfiling { .. } => "enable_profiling",
            Step::DisableProfiling { .. } => "disable_profiling",
            Step::ExpandCluster { .. } => "expand_cluster",
            Step::CreateContentCredential(_) => "create_content_credential",
            Step::DeleteContentCredential { .. } => "delete_content_credential",
            Step::CreateTemplate(_) => "create_template",
            Step::DeleteTemplate { .. } => "delete_template",
            Step::Wait { .. } => "wait",
            Step::Assert { .. } => "assert",
        }
    }
}

fn default_true() -> bool {
    true
}

/// A single check of the console state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssertionSpec {
    /// The users table lists the user with the name and email last set
    UserExists {
        user_id: String,
        #[serde(default = "default_true")]
        expected: bool,
    },

    /// The REST API knows the login name
    ApiUserExists {
        username: String,
        #[serde(default = "default_true")]
        expected: bool,
    },

    ClusterStatus { cluster: String, expected: String },

    ClusterManaged {
        cluster: String,
        #[serde(default = "default_true")]
        expected: bool,
    },

    ClusterProfiling { cluster: String, expected: String },

    /// Every task row has a UUID, a known status and plausible dates
    TasksWellFormed { cluster: String },

    /// Every event of every task log is well formed
    TaskLogsWellFormed {
        cluster: String,
        /// Only check the first tasks
        #[serde(default)]
        limit: Option<usize>,
    },

    /// The Grafana dashboard agrees with the clusters list
    DashboardMatches { cluster: String },

    /// Visible text on the page contains the expected string
    TextPresent { expected: String },

    /// No visible text on the page contains the expected string
    TextAbsent { expected: String },

    /// The destination's view is displayed right now
    DestinationDisplayed { subject: String, destination: String },

    ContentCredentialExists {
        name: String,
        #[serde(default = "default_true")]
        expected: bool,
    },

    TemplateExists {
        name: String,
        #[serde(default = "default_true")]
        expected: bool,
    },

    /// Recorded by import/unmanage steps; not written in YAML
    #[serde(skip_deserializing)]
    OperationOutcome {
        operation: String,
        cluster: String,
        expect_success: bool,
    },
}

impl AssertionSpec {
    /// Type name as written in YAML.
    pub fn type_name(&self) -> &'static str {
        match self {
            AssertionSpec::UserExists { .. } => "user_exists",
            AssertionSpec::ApiUserExists { .. } => "api_user_exists",
            AssertionSpec::ClusterStatus { .. } => "cluster_status",
            AssertionSpec::ClusterManaged { .. } => "cluster_managed",
            AssertionSpec::ClusterProfiling { .. } => "cluster_profiling",
            AssertionSpec::TasksWellFormed { .. } => "tasks_well_formed",
            AssertionSpec::TaskLogsWellFormed { .. } => "task_logs_well_formed",
            AssertionSpec::DashboardMatches { .. } => "dashboard_matches",
            AssertionSpec::TextPresent { .. } => "text_present",
            AssertionSpec::TextAbsent { .. } => "text_absent",
            AssertionSpec::DestinationDisplayed { .. } => "destination_displayed",
            AssertionSpec::ContentCredentialExists { .. } => "content_credential_exists",
            AssertionSpec::TemplateExists { .. } => "template_exists",
            AssertionSpec::OperationOutcome { .. } => "operation_outcome",
        }
    }
}

/// Result of evaluating a single assertion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssertionResult {
    /// Which step this assertion belongs to (0-indexed)
    pub step_index: usize,

    /// The assertion that was evaluated
    pub spec: AssertionSpec,

    /// Whether the assertion passed
    pub passed: bool,

    /// Actual value found (for debugging failed assertions)
    pub actual: Option<String>,

    /// Human-readable failure message
    pub message: Option<String>,
}

impl AssertionResult {
    pub fn pass(step_index: usize, spec: &AssertionSpec, actual: Option<String>) -> Self {
        Self {
            step_index,
            spec: spec.clone(),
            passed: true,
            actual,
            message: None,
        }
    }

    pub fn fail(step_index: usize, spec: &AssertionSpec, actual: Option<String>, message: impl Into<String>) -> Self {
        Self {
            step_index,
            spec: spec.clone(),
            passed: false,
            actual,
            message: Some(message.into()),
        }
    }

    /// Pass when `passed`, otherwise fail with `message`.
    pub fn check(
        step_index: usize,
        spec: &AssertionSpec,
        passed: bool,
        actual: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        if passed {
            Self::pass(step_index, spec, actual)
        } else {
            Self::fail(step_index, spec, actual, message)
        }
    }
}

/// Result of running a complete scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Name of the scenario that was run
    pub scenario_name: String,

    /// Whether all steps and assertions passed
    pub passed: bool,

    /// Number of steps that were executed
    pub steps_run: usize,

    /// All assertion results collected during the run
    pub assertion_results: Vec<AssertionResult>,

    /// Error that ended the scenario early (not an assertion failure)
    pub error: Option<String>,

    /// Page text at the time of the error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_text: Option<String>,

    #[serde(default)]
    pub duration_ms: u128,
}
