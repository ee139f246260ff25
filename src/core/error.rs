//! Error types for the progression engine.
//!
//! Ineligibility, unmet completion criteria and empty recommendation lists are
//! ordinary results, not errors. This enum only covers lookups that were
//! assumed to succeed and failures at the file boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the progression engine and its snapshot loader.
#[derive(Debug, Error)]
pub enum ProgressionError {
    /// A course id was expected in the catalog but is not there.
    #[error("course not found in catalog: {0}")]
    CourseNotFound(String),

    /// A user was expected to have progress records but has none.
    #[error("no progress records found for user: {0}")]
    NoProgressForUser(String),

    /// The prerequisite graph contains a cycle through the listed courses.
    #[error("prerequisite cycle detected among: {}", .0.join(", "))]
    PrerequisiteCycle(Vec<String>),

    /// A snapshot file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A snapshot document could not be parsed.
    #[error("failed to parse snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, ProgressionError>;
