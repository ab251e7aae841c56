use thiserror::Error;

use crate::api::ApiError;
use crate::browser::BrowserError;
use crate::navigation::NavigationError;
use crate::wait::WaitTimeout;

/// Errors surfaced by entity actions and scenario steps.
///
/// Driver errors pass through untouched so callers can tell a missing
/// element from a timeout or a navigation failure.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error(transparent)]
    Timeout(#[from] WaitTimeout),

    #[error(transparent)]
    Api(#[from] ApiError),

    /// An entity looked up by identity is not listed in the UI
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    /// The page shows something the entity layer cannot interpret
    #[error("unexpected page content: {0}")]
    Unexpected(String),
}

pub type Result<T> = std::result::Result<T, Error>;
