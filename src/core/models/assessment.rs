//! Assessment model

use serde::{Deserialize, Serialize};

/// A graded assessment attached to a course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// Unique assessment id
    pub id: String,

    /// Course the assessment belongs to
    pub course_id: String,

    /// Minimum percentage to pass (0-100)
    pub pass_threshold: f64,
}

impl Assessment {
    /// Create a new assessment
    #[must_use]
    pub const fn new(id: String, course_id: String, pass_threshold: f64) -> Self {
        Self {
            id,
            course_id,
            pass_threshold,
        }
    }
}

/// Assessments belonging to a course, in input order
#[must_use]
pub fn assessments_for_course<'a>(assessments: &'a [Assessment], course_id: &str) -> Vec<&'a Assessment> {
    assessments
        .iter()
        .filter(|a| a.course_id == course_id)
        .collect()
}
