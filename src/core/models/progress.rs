//! Learner progress and assessment attempt models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Score recorded for one skill within an assessment attempt
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillScore {
    /// Percentage for this skill (0-100)
    pub percentage: f64,
}

/// One completed assessment attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestScore {
    /// Assessment that was attempted
    pub assessment_id: String,

    /// Overall percentage (0-100)
    pub percentage: f64,

    /// When the attempt was submitted
    pub completed_at: DateTime<Utc>,

    /// Per-skill breakdown, keyed by skill name
    #[serde(default)]
    pub skill_breakdown: BTreeMap<String, SkillScore>,
}

impl TestScore {
    /// Create an attempt with an empty skill breakdown
    #[must_use]
    pub const fn new(assessment_id: String, percentage: f64, completed_at: DateTime<Utc>) -> Self {
        Self {
            assessment_id,
            percentage,
            completed_at,
            skill_breakdown: BTreeMap::new(),
        }
    }

    /// Record a skill percentage on this attempt
    pub fn add_skill(&mut self, skill: String, percentage: f64) {
        self.skill_breakdown.insert(skill, SkillScore { percentage });
    }
}

/// A learner's progress through one course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProgress {
    /// Learner id
    pub user_id: String,

    /// Course id
    pub course_id: String,

    /// Content completion percentage (0-100)
    pub completion_rate: f64,

    /// Section the learner is currently on
    pub current_section: Option<String>,

    /// Accumulated study time in minutes
    pub study_time_minutes: u32,

    /// Assessment attempts in submission order
    pub test_scores: Vec<TestScore>,

    /// Set once when the course is completed
    pub completed_at: Option<DateTime<Utc>>,

    /// Last time the learner opened the course
    pub last_accessed: Option<DateTime<Utc>>,

    /// When the enrollment was created
    pub created_at: DateTime<Utc>,
}

impl UserProgress {
    /// Create a fresh enrollment record
    #[must_use]
    pub const fn new(user_id: String, course_id: String, created_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            course_id,
            completion_rate: 0.0,
            current_section: None,
            study_time_minutes: 0,
            test_scores: Vec::new(),
            completed_at: None,
            last_accessed: None,
            created_at,
        }
    }

    /// Whether this course counts as completed
    ///
    /// True when the completion rate reached 100 or a completion time was recorded.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completion_rate >= 100.0 || self.completed_at.is_some()
    }

    /// Whether the learner is actively working on the course
    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.completion_rate > 0.0 && self.completion_rate < 100.0 && !self.is_completed()
    }

    /// Stamp the completion time
    ///
    /// `completed_at` is immutable once set; later calls leave it unchanged.
    /// Returns `true` if the timestamp was written.
    pub fn mark_completed(&mut self, at: DateTime<Utc>) -> bool {
        if self.completed_at.is_some() {
            return false;
        }
        self.completed_at = Some(at);
        true
    }

    /// Best attempt for an assessment, if any
    #[must_use]
    pub fn best_score(&self, assessment_id: &str) -> Option<&TestScore> {
        self.test_scores
            .iter()
            .filter(|s| s.assessment_id == assessment_id)
            .max_by(|a, b| a.percentage.total_cmp(&b.percentage))
    }
}
