use std::time::Duration;

use thiserror::Error;

use crate::browser::BrowserError;

#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("no destination '{destination}' registered for {kind}")]
    Unregistered { kind: String, destination: String },

    #[error("destination '{destination}' is already registered for {kind}")]
    Duplicate { kind: String, destination: String },

    #[error("{subject} has no related '{attribute}' to navigate through")]
    UnresolvedRelation { subject: String, attribute: String },

    #[error("cyclic prerequisites: {}", .chain.join(" -> "))]
    Cycle { chain: Vec<String> },

    #[error("prerequisite chain deeper than {limit} while resolving '{destination}'")]
    TooDeep { limit: usize, destination: String },

    /// The destination's view never became displayed after its step ran
    #[error("{view} wasn't displayed {waited:.1?} after navigating to '{destination}' on {subject}\nVisible text: {visible_text}")]
    Timeout {
        subject: String,
        destination: String,
        view: &'static str,
        waited: Duration,
        visible_text: String,
    },

    /// The step's own interactions could not complete
    #[error("step to '{destination}' failed: {message}")]
    Step { destination: String, message: String },

    #[error(transparent)]
    Browser(#[from] BrowserError),
}
