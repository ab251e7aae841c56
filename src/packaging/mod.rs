//! Packaging verification: repository closure, lint and dependency checks
//! run as subprocesses.

pub mod rpm;

pub use rpm::{CheckCommand, CheckKind, CheckResult, PackagingError};
