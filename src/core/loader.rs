//! Snapshot loading at the persistence boundary
//!
//! A snapshot is one JSON document holding everything the engine reads:
//!
//! ```json
//! {
//!   "courses":     [ { "id": "...", "title": "...", "level": "BEGINNER", ... } ],
//!   "progress":    [ { "user_id": "...", "course_id": "...", "test_scores": [...] } ],
//!   "assessments": [ { "id": "...", "course_id": "...", "pass_threshold": 70 } ]
//! }
//! ```
//!
//! Stored progress rows often carry `test_scores` and `skill_breakdown` as
//! serialized JSON strings. Both shapes are accepted here and turned into
//! typed records once. A payload that cannot be parsed degrades to an empty
//! list or map and a malformed attempt is dropped, each with a warning.

use crate::core::models::{Assessment, Catalog, Course, SkillScore, TestScore, UserProgress};
use crate::core::{ProgressionError, Result};
use crate::{info, warn};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Everything the engine needs for one run
#[derive(Debug, Clone)]
pub struct LearningSnapshot {
    /// Course catalog
    pub catalog: Catalog,
    /// Progress records for every learner
    pub progress: Vec<UserProgress>,
    /// Assessment definitions
    pub assessments: Vec<Assessment>,
}

impl LearningSnapshot {
    /// Progress records for one learner
    ///
    /// # Errors
    /// Returns [`ProgressionError::NoProgressForUser`] if the learner has no records.
    pub fn progress_for_user(&self, user_id: &str) -> Result<Vec<UserProgress>> {
        let records: Vec<UserProgress> = self
            .progress
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();

        if records.is_empty() {
            return Err(ProgressionError::NoProgressForUser(user_id.to_string()));
        }
        Ok(records)
    }

    /// Distinct learner ids, sorted
    #[must_use]
    pub fn users(&self) -> Vec<&str> {
        self.progress
            .iter()
            .map(|p| p.user_id.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[derive(Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    courses: Vec<Course>,
    #[serde(default)]
    progress: Vec<RawProgress>,
    #[serde(default)]
    assessments: Vec<Assessment>,
}

#[derive(Deserialize)]
struct RawProgress {
    user_id: String,
    course_id: String,
    #[serde(default)]
    completion_rate: f64,
    #[serde(default)]
    current_section: Option<String>,
    #[serde(default)]
    study_time_minutes: f64,
    #[serde(default)]
    test_scores: Value,
    #[serde(default)]
    completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    last_accessed: Option<DateTime<Utc>>,
    #[serde(default)]
    created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawTestScore {
    assessment_id: String,
    percentage: f64,
    completed_at: DateTime<Utc>,
    #[serde(default)]
    skill_breakdown: Value,
}

/// Read and parse a snapshot file
///
/// # Errors
/// Returns [`ProgressionError::Io`] if the file cannot be read and
/// [`ProgressionError::Parse`] if it is not a valid snapshot document.
pub fn load_snapshot(path: &Path) -> Result<LearningSnapshot> {
    let text = std::fs::read_to_string(path).map_err(|source| ProgressionError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let snapshot = parse_snapshot(&text)?;
    info!(
        "Loaded {}: {} courses, {} progress records, {} assessments",
        path.display(),
        snapshot.catalog.len(),
        snapshot.progress.len(),
        snapshot.assessments.len()
    );
    Ok(snapshot)
}

/// Parse a snapshot document
///
/// # Errors
/// Returns [`ProgressionError::Parse`] if the document itself is not valid JSON
/// or a course, progress or assessment record is missing a required field.
pub fn parse_snapshot(text: &str) -> Result<LearningSnapshot> {
    let raw: RawSnapshot = serde_json::from_str(text)?;

    let progress = raw.progress.into_iter().map(into_progress).collect();

    Ok(LearningSnapshot {
        catalog: Catalog::new(raw.courses),
        progress,
        assessments: raw.assessments,
    })
}

fn into_progress(raw: RawProgress) -> UserProgress {
    let context = format!("{}/{}", raw.user_id, raw.course_id);

    if !(0.0..=100.0).contains(&raw.completion_rate) {
        warn!(
            "{context}: completion rate {} out of range; clamped",
            raw.completion_rate
        );
    }

    UserProgress {
        completion_rate: raw.completion_rate.clamp(0.0, 100.0),
        current_section: raw.current_section,
        study_time_minutes: whole_minutes(raw.study_time_minutes),
        test_scores: parse_test_scores(raw.test_scores, &context),
        completed_at: raw.completed_at,
        last_accessed: raw.last_accessed,
        created_at: raw.created_at,
        user_id: raw.user_id,
        course_id: raw.course_id,
    }
}

/// Floor a stored minute count into `0..=u32::MAX`; NaN reads as 0
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_minutes(minutes: f64) -> u32 {
    if minutes.is_nan() {
        return 0;
    }
    minutes.floor().clamp(0.0, f64::from(u32::MAX)) as u32
}

/// Decode a value that may hold JSON directly or as a serialized string
fn unwrap_encoded(value: Value, what: &str, context: &str) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(text) if text.trim().is_empty() => None,
        Value::String(text) => match serde_json::from_str(&text) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!("{context}: unreadable {what} payload ({e}); treated as empty");
                None
            }
        },
        other => Some(other),
    }
}

fn parse_test_scores(value: Value, context: &str) -> Vec<TestScore> {
    let Some(decoded) = unwrap_encoded(value, "test_scores", context) else {
        return Vec::new();
    };
    let Value::Array(entries) = decoded else {
        warn!("{context}: test_scores is not a list; treated as empty");
        return Vec::new();
    };

    entries
        .into_iter()
        .enumerate()
        .filter_map(|(i, entry)| match serde_json::from_value::<RawTestScore>(entry) {
            Ok(raw) => Some(TestScore {
                assessment_id: raw.assessment_id,
                percentage: raw.percentage.clamp(0.0, 100.0),
                completed_at: raw.completed_at,
                skill_breakdown: parse_skill_breakdown(raw.skill_breakdown, context),
            }),
            Err(e) => {
                warn!("{context}: test score #{i} skipped ({e})");
                None
            }
        })
        .collect()
}

fn parse_skill_breakdown(value: Value, context: &str) -> BTreeMap<String, SkillScore> {
    let Some(decoded) = unwrap_encoded(value, "skill_breakdown", context) else {
        return BTreeMap::new();
    };
    let Value::Object(entries) = decoded else {
        warn!("{context}: skill_breakdown is not a mapping; treated as empty");
        return BTreeMap::new();
    };

    entries
        .into_iter()
        .filter_map(|(skill, score)| {
            let percentage = match &score {
                Value::Number(n) => n.as_f64(),
                Value::Object(fields) => fields.get("percentage").and_then(Value::as_f64),
                _ => None,
            };
            if percentage.is_none() {
                warn!("{context}: skill '{skill}' has no percentage; skipped");
            }
            percentage.map(|p| (skill, SkillScore { percentage: p }))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::prerequisites::check_prerequisites;

    const DOC: &str = r#"{
        "courses": [
            { "id": "a", "title": "A", "level": "BEGINNER" },
            { "id": "b", "title": "B", "level": "EXPERT", "prerequisites": ["a"] }
        ],
        "progress": [
            {
                "user_id": "u1", "course_id": "a", "completion_rate": 140,
                "study_time_minutes": -5, "created_at": "2024-01-01T00:00:00Z",
                "test_scores": "[{\"assessment_id\":\"q1\",\"percentage\":80,\"completed_at\":\"2024-01-02T00:00:00Z\",\"skill_breakdown\":\"{\\\"math\\\":{\\\"percentage\\\":75}}\"}]"
            },
            {
                "user_id": "u1", "course_id": "b", "completion_rate": 20,
                "created_at": "2024-01-03T00:00:00Z",
                "test_scores": [
                    { "assessment_id": "q2", "percentage": 55, "completed_at": "2024-01-04T00:00:00Z",
                      "skill_breakdown": { "reads": 60, "math": { "percentage": 90 }, "bad": "x" } },
                    { "assessment_id": "q3" }
                ]
            },
            { "user_id": "u2", "course_id": "a", "test_scores": "{corrupt" }
        ],
        "assessments": [ { "id": "q1", "course_id": "a", "pass_threshold": 70 } ]
    }"#;

    #[test]
    fn parses_typed_records() {
        let snapshot = parse_snapshot(DOC).unwrap();
        assert_eq!(snapshot.catalog.len(), 2);
        assert_eq!(snapshot.progress.len(), 3);
        assert_eq!(snapshot.assessments.len(), 1);
        assert_eq!(
            snapshot.catalog.get_course("b").map(|c| c.level),
            Some(crate::core::models::Level::Unrated)
        );
    }

    #[test]
    fn clamps_out_of_range_values() {
        let snapshot = parse_snapshot(DOC).unwrap();
        let a = &snapshot.progress[0];
        assert!((a.completion_rate - 100.0).abs() < f64::EPSILON);
        assert_eq!(a.study_time_minutes, 0);
    }

    #[test]
    fn decodes_string_encoded_scores() {
        let snapshot = parse_snapshot(DOC).unwrap();
        let scores = &snapshot.progress[0].test_scores;
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].assessment_id, "q1");
        assert!((scores[0].skill_breakdown["math"].percentage - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn skips_malformed_entries() {
        let snapshot = parse_snapshot(DOC).unwrap();
        let b = &snapshot.progress[1];
        assert_eq!(b.test_scores.len(), 1);
        let skills = &b.test_scores[0].skill_breakdown;
        assert_eq!(skills.len(), 2);
        assert!((skills["reads"].percentage - 60.0).abs() < f64::EPSILON);
        assert!((skills["math"].percentage - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn corrupt_scores_degrade_to_empty() {
        let snapshot = parse_snapshot(DOC).unwrap();
        assert!(snapshot.progress[2].test_scores.is_empty());
    }

    #[test]
    fn user_lookup() {
        let snapshot = parse_snapshot(DOC).unwrap();
        assert_eq!(snapshot.users(), vec!["u1", "u2"]);
        assert_eq!(snapshot.progress_for_user("u1").unwrap().len(), 2);
        assert!(matches!(
            snapshot.progress_for_user("nobody"),
            Err(ProgressionError::NoProgressForUser(_))
        ));
    }

    #[test]
    fn fractional_study_time_is_floored() {
        let doc = r#"{
            "courses": [ { "id": "a", "title": "A", "level": "BEGINNER" } ],
            "progress": [
                { "user_id": "u1", "course_id": "a", "study_time_minutes": 12.5 },
                { "user_id": "u2", "course_id": "a", "study_time_minutes": -3.2 },
                { "user_id": "u3", "course_id": "a", "study_time_minutes": 9e12 }
            ]
        }"#;
        let snapshot = parse_snapshot(doc).unwrap();
        let minutes: Vec<u32> = snapshot.progress.iter().map(|p| p.study_time_minutes).collect();
        assert_eq!(minutes, vec![12, 0, u32::MAX]);
    }

    #[test]
    fn repeated_prerequisites_are_reported_once() {
        let doc = r#"{
            "courses": [
                { "id": "a", "title": "A", "level": "BEGINNER" },
                { "id": "b", "title": "B", "level": "BEGINNER", "prerequisites": ["a", "a"] }
            ]
        }"#;
        let snapshot = parse_snapshot(doc).unwrap();
        let b = snapshot.catalog.get_course("b").unwrap();
        let check = check_prerequisites(b, &[], &snapshot.catalog);
        assert_eq!(check.missing.len(), 1);
        assert_eq!(check.message, "Missing prerequisites: A");
    }

    #[test]
    fn invalid_document_is_a_parse_error() {
        assert!(matches!(
            parse_snapshot("[1, 2"),
            Err(ProgressionError::Parse(_))
        ));
    }
}
