//! Course completion scoring
//!
//! Overall completion blends three components:
//!
//! | Component        | Weight | Score                                                  |
//! |------------------|--------|--------------------------------------------------------|
//! | Content          | 60%    | `min(completion_rate, 100)`                            |
//! | Assessments      | 30%    | mean best attempt × attempted / total (100 if none)    |
//! | Time engagement  | 10%    | `min(study_time / expected × 100, 100)`                |
//!
//! Expected time is the course duration, or [`DEFAULT_EXPECTED_MINUTES`] when
//! the course has none.

use crate::core::models::assessment::assessments_for_course;
use crate::core::models::{Assessment, Course, Level, UserProgress};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Weight of content completion in the overall score
pub const CONTENT_WEIGHT: f64 = 0.6;
/// Weight of assessment performance in the overall score
pub const ASSESSMENT_WEIGHT: f64 = 0.3;
/// Weight of study-time engagement in the overall score
pub const ENGAGEMENT_WEIGHT: f64 = 0.1;
/// Expected study time when a course has no duration
pub const DEFAULT_EXPECTED_MINUTES: u32 = 60;

/// Thresholds that decide whether a course is finished
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionCriteria {
    /// Minimum content completion rate (0-100)
    pub minimum_completion_rate: f64,
    /// Assessments that must have a passing attempt
    #[serde(default)]
    pub required_assessments: Vec<String>,
    /// Minimum percentage on each required assessment
    pub passing_score: f64,
    /// Minimum study time in minutes, if any
    #[serde(default)]
    pub minimum_study_time: Option<f64>,
}

/// Result code of a completion check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompletionCode {
    /// Every criterion is satisfied
    CriteriaMet,
    /// At least one criterion failed
    CriteriaNotMet,
}

/// One unmet completion criterion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompletionFailure {
    /// Content completion is below the minimum
    RateBelowThreshold {
        /// Learner's completion rate
        actual: f64,
        /// Required completion rate
        required: f64,
    },
    /// A required assessment has no attempt
    AssessmentMissing {
        /// Assessment id
        assessment_id: String,
    },
    /// The best attempt on a required assessment is below the passing score
    AssessmentBelowPassing {
        /// Assessment id
        assessment_id: String,
        /// Best attempt percentage
        score: f64,
        /// Required percentage
        required: f64,
    },
    /// Study time is below the minimum
    StudyTimeBelowMinimum {
        /// Learner's study time in minutes
        actual: u32,
        /// Required study time in minutes
        required: f64,
    },
}

impl fmt::Display for CompletionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateBelowThreshold { actual, required } => write!(
                f,
                "Completion rate {actual:.1}% is below required {required:.1}%"
            ),
            Self::AssessmentMissing { assessment_id } => {
                write!(f, "Required assessment '{assessment_id}' not completed")
            }
            Self::AssessmentBelowPassing {
                assessment_id,
                score,
                required,
            } => write!(
                f,
                "Assessment '{assessment_id}' score {score:.1}% is below passing score {required:.1}%"
            ),
            Self::StudyTimeBelowMinimum { actual, required } => write!(
                f,
                "Study time {actual} min is below required {required:.0} min"
            ),
        }
    }
}

/// Figures behind a completion check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionData {
    /// Learner's content completion rate
    pub completion_rate: f64,
    /// Weighted overall completion (0-100)
    pub overall_completion: f64,
    /// Learner's study time in minutes
    pub study_time_minutes: u32,
    /// Every unmet criterion, in check order
    pub failures: Vec<CompletionFailure>,
}

/// Outcome of [`check_completion`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionCheck {
    /// Whether every criterion passed
    pub success: bool,
    /// Human-readable summary
    pub message: String,
    /// Machine-readable result code
    pub code: CompletionCode,
    /// Supporting figures
    pub data: CompletionData,
}

/// Check a learner's progress against completion criteria
///
/// All failing criteria are collected and joined into the message; `success`
/// is true only when there are none. Required assessments are judged by the
/// learner's best attempt.
#[must_use]
pub fn check_completion(
    progress: &UserProgress,
    course: &Course,
    assessments: &[Assessment],
    criteria: &CompletionCriteria,
) -> CompletionCheck {
    let mut failures = Vec::new();

    if progress.completion_rate < criteria.minimum_completion_rate {
        failures.push(CompletionFailure::RateBelowThreshold {
            actual: progress.completion_rate,
            required: criteria.minimum_completion_rate,
        });
    }

    for assessment_id in &criteria.required_assessments {
        match progress.best_score(assessment_id) {
            None => failures.push(CompletionFailure::AssessmentMissing {
                assessment_id: assessment_id.clone(),
            }),
            Some(score) if score.percentage < criteria.passing_score => {
                failures.push(CompletionFailure::AssessmentBelowPassing {
                    assessment_id: assessment_id.clone(),
                    score: score.percentage,
                    required: criteria.passing_score,
                });
            }
            Some(_) => {}
        }
    }

    if let Some(minimum) = criteria.minimum_study_time {
        if f64::from(progress.study_time_minutes) < minimum {
            failures.push(CompletionFailure::StudyTimeBelowMinimum {
                actual: progress.study_time_minutes,
                required: minimum,
            });
        }
    }

    let success = failures.is_empty();
    let message = if success {
        "All completion criteria met".to_string()
    } else {
        failures
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    };

    CompletionCheck {
        success,
        message,
        code: if success {
            CompletionCode::CriteriaMet
        } else {
            CompletionCode::CriteriaNotMet
        },
        data: CompletionData {
            completion_rate: progress.completion_rate,
            overall_completion: calculate_overall_completion(progress, course, assessments),
            study_time_minutes: progress.study_time_minutes,
            failures,
        },
    }
}

/// Weighted overall completion of a course, rounded to 2 decimals
///
/// Only assessments belonging to `course` are considered; `assessments` may
/// hold the whole assessment list.
#[must_use]
pub fn calculate_overall_completion(
    progress: &UserProgress,
    course: &Course,
    assessments: &[Assessment],
) -> f64 {
    let content = progress.completion_rate.clamp(0.0, 100.0);
    let assessment = assessment_score(progress, course, assessments);
    let engagement = engagement_score(progress, course);

    round2(content.mul_add(
        CONTENT_WEIGHT,
        assessment.mul_add(ASSESSMENT_WEIGHT, engagement * ENGAGEMENT_WEIGHT),
    ))
}

/// Assessment component: mean best attempt scaled by coverage
#[allow(clippy::cast_precision_loss)]
fn assessment_score(progress: &UserProgress, course: &Course, assessments: &[Assessment]) -> f64 {
    let course_assessments = assessments_for_course(assessments, &course.id);
    if course_assessments.is_empty() {
        return 100.0;
    }

    let attempted: Vec<f64> = course_assessments
        .iter()
        .filter_map(|a| progress.best_score(&a.id))
        .map(|s| s.percentage)
        .collect();
    if attempted.is_empty() {
        return 0.0;
    }

    let average = attempted.iter().sum::<f64>() / attempted.len() as f64;
    let coverage = attempted.len() as f64 / course_assessments.len() as f64;
    average * coverage
}

/// Time component: study time relative to the expected duration, capped at 100
fn engagement_score(progress: &UserProgress, course: &Course) -> f64 {
    let expected = f64::from(course.duration_or(DEFAULT_EXPECTED_MINUTES));
    (f64::from(progress.study_time_minutes) / expected * 100.0).min(100.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Level-specific default completion criteria
///
/// | Level        | Min rate | Passing score | Min study time     |
/// |--------------|----------|---------------|--------------------|
/// | Beginner     | 75       | 65            | -                  |
/// | Intermediate | 85       | 75            | 80% of duration    |
/// | Advanced     | 90       | 80            | 90% of duration    |
/// | other        | 80       | 70            | -                  |
///
/// The study-time minimum is omitted when the course has no duration.
#[must_use]
pub fn standard_completion_criteria(course: &Course) -> CompletionCriteria {
    let share_of_duration =
        |share: f64| course.duration_minutes.map(|minutes| f64::from(minutes) * share);

    let (minimum_completion_rate, passing_score, minimum_study_time) = match course.level {
        Level::Beginner => (75.0, 65.0, None),
        Level::Intermediate => (85.0, 75.0, share_of_duration(0.8)),
        Level::Advanced => (90.0, 80.0, share_of_duration(0.9)),
        Level::Unrated => (80.0, 70.0, None),
    };

    CompletionCriteria {
        minimum_completion_rate,
        required_assessments: Vec::new(),
        passing_score,
        minimum_study_time,
    }
}
