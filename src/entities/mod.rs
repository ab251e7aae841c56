//! Console entities: the application context, its destinations and the
//! domain objects acted on through the UI.

pub mod application;
pub mod clusters;
pub mod credentials;
pub mod destinations;
pub mod diagnostics;
pub mod subject;
pub mod tasks;
pub mod templates;
pub mod users;

pub use application::Application;
pub use subject::{Subject, SubjectKind};
