//! Page-object navigation and test automation for a storage management
//! web console.
//!
//! The browser is reached only through the [`browser::Browser`] trait, so
//! everything above it (views, navigation, entities, scenarios) runs the
//! same against a live session or an in-memory fake.

pub mod api;
pub mod browser;
pub mod cli;
pub mod entities;
pub mod error;
pub mod navigation;
pub mod packaging;
pub mod report;
pub mod scenario;
pub mod trace;
pub mod view;
pub mod wait;

pub use error::{Error, Result};
