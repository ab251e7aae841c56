//! REST API used to cross-check what the UI reports.

pub mod client;
pub mod error;

pub use client::{ApiClient, ApiSession, ApiUser};
pub use error::ApiError;
