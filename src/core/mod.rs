//! Core module: the course-progression engine and its data models

pub mod analytics;
pub mod completion;
pub mod error;
pub mod loader;
pub mod models;
pub mod path_planner;
pub mod prerequisites;
pub mod progress_events;
pub mod report;

pub use error::{ProgressionError, Result};

/// Returns the current version of the `Pathwise` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
