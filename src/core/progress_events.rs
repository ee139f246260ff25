//! Evaluation of a single study or assessment event
//!
//! The progress-update workflow calls [`evaluate_progress_update`] after every
//! change to a progress record. The result says whether the record should now
//! be stamped as completed and which courses that completion opens up; writing
//! the stamp back is left to the caller (see [`UserProgress::mark_completed`]).

use crate::core::completion::{check_completion, standard_completion_criteria, CompletionCheck};
use crate::core::models::{Assessment, Catalog, Course, UserProgress};
use crate::core::prerequisites::courses_unlocked_by;
use crate::core::{ProgressionError, Result};
use crate::debug;
use serde::Serialize;
use std::collections::HashSet;

/// Decision for one updated progress record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressEvaluation {
    /// Course the record belongs to
    pub course_id: String,
    /// Weighted overall completion (0-100)
    pub overall_completion: f64,
    /// Result of the level's standard completion criteria
    pub check: CompletionCheck,
    /// Criteria are met and `completed_at` is not yet set
    pub should_mark_completed: bool,
    /// Courses whose last missing prerequisite is this one
    pub newly_unlocked: Vec<Course>,
}

/// Evaluate an updated progress record
///
/// # Arguments
/// * `progress` - The record after the update
/// * `history` - All of the learner's progress records (may include a stale copy of `progress`)
/// * `catalog` - Course catalog
/// * `assessments` - Assessment definitions
///
/// # Errors
/// Returns [`ProgressionError::CourseNotFound`] if the record's course is not in the catalog.
pub fn evaluate_progress_update(
    progress: &UserProgress,
    history: &[UserProgress],
    catalog: &Catalog,
    assessments: &[Assessment],
) -> Result<ProgressEvaluation> {
    let course = catalog
        .get_course(&progress.course_id)
        .ok_or_else(|| ProgressionError::CourseNotFound(progress.course_id.clone()))?;

    let criteria = standard_completion_criteria(course);
    let check = check_completion(progress, course, assessments, &criteria);
    let should_mark_completed = check.success && progress.completed_at.is_none();

    let newly_unlocked = if should_mark_completed {
        let mut completed: HashSet<&str> = history
            .iter()
            .filter(|p| p.course_id != course.id && p.is_completed())
            .map(|p| p.course_id.as_str())
            .collect();
        completed.insert(course.id.as_str());

        courses_unlocked_by(&course.id, catalog)
            .into_iter()
            .filter(|c| !completed.contains(c.id.as_str()))
            .filter(|c| {
                c.prerequisites
                    .iter()
                    .all(|p| !catalog.contains(p) || completed.contains(p.as_str()))
            })
            .cloned()
            .collect()
    } else {
        Vec::new()
    };

    debug!(
        "{}/{}: overall {:.2}%, mark completed: {should_mark_completed}, unlocks {}",
        progress.user_id,
        course.id,
        check.data.overall_completion,
        newly_unlocked.len()
    );

    Ok(ProgressEvaluation {
        course_id: course.id.clone(),
        overall_completion: check.data.overall_completion,
        check,
        should_mark_completed,
        newly_unlocked,
    })
}
