//! YAML scenarios driving the console end to end.

pub mod checks;
pub mod context;
pub mod model;
pub mod runner;

pub use model::{AssertionResult, AssertionSpec, Scenario, ScenarioResult, Step};
pub use runner::ScenarioRunner;
