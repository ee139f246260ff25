//! Data models for `Pathwise`

pub mod assessment;
pub mod catalog;
pub mod course;
pub mod graph;
pub mod learning_path;
pub mod progress;

pub use assessment::Assessment;
pub use catalog::Catalog;
pub use course::{Course, Level};
pub use graph::PrerequisiteGraph;
pub use learning_path::{LearningPath, ProgressionPath};
pub use progress::{SkillScore, TestScore, UserProgress};
