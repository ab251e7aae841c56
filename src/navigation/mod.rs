//! Destination registry and the resolver that walks prerequisite chains.
//!
//! A destination is a named transition registered for a subject kind. Asking
//! the [`Navigator`] for a destination checks whether the browser is already
//! there, resolves the prerequisite first when it is not, runs the step and
//! waits for the destination's view to be displayed.

pub mod error;
pub mod navigator;
pub mod registry;
pub mod step;

pub use error::NavigationError;
pub use navigator::Navigator;
pub use registry::{DestinationInfo, Registry};
pub use step::{NavigateStep, Prerequisite, Subject};
