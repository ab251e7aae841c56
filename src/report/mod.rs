//! Suite reports rendered for the terminal, CI (JUnit XML) and browsers.

pub mod console;
pub mod html;
pub mod junit;
pub mod report_model;

pub use report_model::SuiteReport;
