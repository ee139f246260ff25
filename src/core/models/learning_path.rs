//! Learning path and progression path models

use super::{Course, Level};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An ordered sequence of courses toward a skill or level goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningPath {
    /// Path id (e.g., "fundamentals")
    pub id: String,

    /// Display name
    pub name: String,

    /// Free-text description
    pub description: String,

    /// Courses in study order
    pub courses: Vec<Course>,

    /// Sum of member course durations in minutes
    pub estimated_time_minutes: u32,

    /// Union of member course tags, sorted
    pub skills_gained: Vec<String>,

    /// Overall difficulty
    pub difficulty: Level,
}

impl LearningPath {
    /// Build a path from an ordered course list
    ///
    /// Courses without a duration count as `default_minutes`.
    #[must_use]
    pub fn from_courses(
        id: String,
        name: String,
        description: String,
        courses: Vec<Course>,
        difficulty: Level,
        default_minutes: u32,
    ) -> Self {
        let estimated_time_minutes = courses
            .iter()
            .map(|c| c.duration_or(default_minutes))
            .fold(0u32, u32::saturating_add);

        let skills_gained: BTreeSet<String> = courses
            .iter()
            .flat_map(|c| c.tags.iter().map(|t| t.to_ascii_lowercase()))
            .collect();

        Self {
            id,
            name,
            description,
            courses,
            estimated_time_minutes,
            skills_gained: skills_gained.into_iter().collect(),
            difficulty,
        }
    }

    /// Number of courses on the path
    #[must_use]
    pub fn course_count(&self) -> usize {
        self.courses.len()
    }
}

/// "What's next" view for one course the learner is working on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionPath {
    /// Course in progress, or `None` for the starting-point suggestion
    pub current_course: Option<Course>,

    /// Content completion of the current course (0-100)
    pub completion_rate: f64,

    /// Ranked recommendations
    pub next_recommended_courses: Vec<Course>,

    /// Courses whose prerequisites are all completed
    pub unlocked_courses: Vec<Course>,
}
