//! Check command handler

use super::{id_list, learner_progress, print_json};
use pathwise::core::loader::LearningSnapshot;
use pathwise::core::prerequisites::{
    check_prerequisites, courses_unlocked_by, prerequisite_chain, PrerequisiteCheck,
};
use serde::Serialize;

#[derive(Serialize)]
struct CheckOutput<'a> {
    user_id: &'a str,
    course_id: &'a str,
    check: &'a PrerequisiteCheck,
    prerequisite_chain: Vec<&'a str>,
    unlocks: Vec<&'a str>,
}

/// Run the check command.
///
/// # Arguments
/// * `snapshot` - Loaded learner data
/// * `user_id` - Learner id
/// * `course_id` - Course the learner wants to start
/// * `json` - Print JSON instead of text
///
/// # Errors
/// Returns a printable message if the course is not in the catalog.
pub fn run(
    snapshot: &LearningSnapshot,
    user_id: &str,
    course_id: &str,
    json: bool,
) -> Result<(), String> {
    let catalog = &snapshot.catalog;
    let course = catalog
        .get_course(course_id)
        .ok_or_else(|| format!("✗ Course '{course_id}' is not in the catalog"))?;

    let progress = learner_progress(snapshot, user_id);
    let result = check_prerequisites(course, &progress, catalog);
    let chain = prerequisite_chain(&course.id, catalog);
    let unlocks = courses_unlocked_by(&course.id, catalog);

    if json {
        return print_json(&CheckOutput {
            user_id,
            course_id: &course.id,
            check: &result,
            prerequisite_chain: chain.iter().map(|c| c.id.as_str()).collect(),
            unlocks: unlocks.iter().map(|c| c.id.as_str()).collect(),
        });
    }

    if result.can_enroll {
        println!("✓ {user_id} can enroll in {} ({})", course.title, course.id);
    } else {
        println!("✗ {user_id} cannot enroll in {} ({})", course.title, course.id);
    }
    println!("  {}", result.message);
    if !result.completed.is_empty() {
        println!("  Completed: {}", id_list(&result.completed, ", "));
    }
    println!("Prerequisite chain: {}", id_list(chain.iter().copied(), " → "));
    println!("Unlocks: {}", id_list(unlocks.iter().copied(), ", "));
    Ok(())
}
