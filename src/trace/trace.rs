use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// How one destination resolution ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavOutcome {
    /// `am_i_here` held, nothing was clicked
    AlreadyHere,
    /// The step ran and the view became displayed
    Stepped,
    Failed,
}

/// One line of the navigation trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub subject: String,
    pub destination: String,

    /// Position in the prerequisite chain, 0 for the requested destination
    pub depth: usize,
    pub outcome: NavOutcome,

    pub view: Option<String>,
    pub elapsed_ms: Option<u128>,
    pub error: Option<String>,
}

impl TraceEvent {
    pub fn now(subject: &str, destination: &str, depth: usize, outcome: NavOutcome) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            subject: subject.to_string(),
            destination: destination.to_string(),
            depth,
            outcome,
            view: None,
            elapsed_ms: None,
            error: None,
        }
    }

    pub fn with_view(mut self, view: &str) -> Self {
        self.view = Some(view.to_string());
        self
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed_ms = Some(elapsed.as_millis());
        self
    }

    pub fn with_error(mut self, error: impl ToString) -> Self {
        self.error = Some(error.to_string());
        self
    }
}
