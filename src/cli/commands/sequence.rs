//! Sequence command handler

use super::print_json;
use super::tracks::print_path;
use pathwise::core::loader::LearningSnapshot;
use pathwise::core::models::Level;
use pathwise::core::path_planner::sequence_learning_path;

/// Run the sequence command.
///
/// # Arguments
/// * `snapshot` - Loaded learner data
/// * `specialization` - Text matched against course tags, specialization and description
/// * `from` - Starting level
/// * `to` - Target level
/// * `json` - Print JSON instead of text
///
/// # Errors
/// Returns a printable message if JSON output fails.
pub fn run(
    snapshot: &LearningSnapshot,
    specialization: &str,
    from: Level,
    to: Level,
    json: bool,
) -> Result<(), String> {
    let path = sequence_learning_path(from, to, specialization, &snapshot.catalog);
    if json {
        return print_json(&path);
    }

    if path.courses.is_empty() {
        println!("✗ No courses match '{specialization}' from {from} to {to}");
    } else {
        print_path(&path);
    }
    Ok(())
}
