//! Path command handler

use super::{id_list, learner_progress, print_json};
use pathwise::core::loader::LearningSnapshot;
use pathwise::core::path_planner::generate_learning_path;
use pathwise::info;

/// Run the path command.
///
/// # Arguments
/// * `snapshot` - Loaded learner data
/// * `user_id` - Learner id
/// * `skills` - Skills to favour; empty means no preference
/// * `json` - Print JSON instead of text
///
/// # Errors
/// Returns a printable message if JSON output fails.
pub fn run(
    snapshot: &LearningSnapshot,
    user_id: &str,
    skills: &[String],
    json: bool,
) -> Result<(), String> {
    let progress = learner_progress(snapshot, user_id);
    if progress.is_empty() {
        info!("{user_id} has no progress records; suggesting starting points");
    }

    let target_skills = (!skills.is_empty()).then_some(skills);
    let paths = generate_learning_path(user_id, &progress, &snapshot.catalog, target_skills);

    if json {
        return print_json(&paths);
    }

    if paths.is_empty() {
        println!("✓ {user_id} has nothing in progress and no starting points are available");
        return Ok(());
    }

    for path in &paths {
        match &path.current_course {
            Some(course) => println!(
                "\n=== {} ({}) - {:.1}% ===",
                course.title, course.id, path.completion_rate
            ),
            None => println!("\n=== Starting points ==="),
        }
        for (rank, course) in path.next_recommended_courses.iter().enumerate() {
            println!("  {}. {} ({}, {})", rank + 1, course.title, course.id, course.level);
        }
        println!("  Unlocked: {}", id_list(&path.unlocked_courses, ", "));
    }
    Ok(())
}
