//! Evaluate command handler

use super::{id_list, learner_progress, print_json};
use chrono::Utc;
use pathwise::core::loader::LearningSnapshot;
use pathwise::core::models::UserProgress;
use pathwise::core::progress_events::evaluate_progress_update;
use pathwise::verbose;

/// Replacement values applied to the stored record before evaluation
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressUpdate {
    /// New content completion rate (0-100)
    pub rate: Option<f64>,
    /// New total study time in minutes
    pub study_minutes: Option<u32>,
}

/// Run the evaluate command.
///
/// A learner without a record for `course_id` is evaluated against a fresh one.
///
/// # Arguments
/// * `snapshot` - Loaded learner data
/// * `user_id` - Learner id
/// * `course_id` - Course the record belongs to
/// * `update` - Values to apply before evaluating
/// * `json` - Print JSON instead of text
///
/// # Errors
/// Returns a printable message if the course is not in the catalog.
pub fn run(
    snapshot: &LearningSnapshot,
    user_id: &str,
    course_id: &str,
    update: ProgressUpdate,
    json: bool,
) -> Result<(), String> {
    let history = learner_progress(snapshot, user_id);
    let mut record = history
        .iter()
        .find(|p| p.course_id == course_id)
        .cloned()
        .unwrap_or_else(|| {
            verbose!("No record for {user_id}/{course_id}; starting a fresh one");
            UserProgress::new(user_id.to_string(), course_id.to_string(), Utc::now())
        });

    if let Some(rate) = update.rate {
        record.completion_rate = rate.clamp(0.0, 100.0);
    }
    if let Some(minutes) = update.study_minutes {
        record.study_time_minutes = minutes;
    }

    let evaluation =
        evaluate_progress_update(&record, &history, &snapshot.catalog, &snapshot.assessments)
            .map_err(|e| format!("✗ {e}"))?;

    if json {
        return print_json(&evaluation);
    }

    println!(
        "{}/{}: overall completion {:.2}%",
        user_id, evaluation.course_id, evaluation.overall_completion
    );
    if evaluation.check.success {
        println!("✓ {}", evaluation.check.message);
    } else {
        println!("✗ {}", evaluation.check.message);
    }

    if evaluation.should_mark_completed {
        println!("✓ Record should be marked completed");
        println!("Newly unlocked: {}", id_list(&evaluation.newly_unlocked, ", "));
    } else if record.completed_at.is_some() {
        println!("Record is already marked completed");
    }
    Ok(())
}
