use thiserror::Error;

use crate::browser::locator::Locator;

#[derive(Debug, Error)]
pub enum BrowserError {
    /// Node.js browser server failed to spawn
    #[error("failed to spawn {script} (is Node.js installed?): {source}")]
    SubprocessSpawn {
        script: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading from or writing to the browser server failed
    #[error("browser session I/O: {0}")]
    SessionIo(String),

    /// The browser server answered `ok: false`
    #[error("browser command '{command}' failed: {error}")]
    SessionProtocol { command: String, error: String },

    #[error("JSON error ({context}): {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no such element: {locator}")]
    NoSuchElement { locator: Locator },

    /// The element was located earlier but is gone from the DOM
    #[error("stale element reference: {locator}")]
    StaleElement { locator: Locator },
}

impl BrowserError {
    /// Whether the error means the element is (currently) not in the page.
    pub fn is_missing_element(&self) -> bool {
        matches!(
            self,
            BrowserError::NoSuchElement { .. } | BrowserError::StaleElement { .. }
        )
    }
}
