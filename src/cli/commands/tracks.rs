//! Tracks command handler

use super::{id_list, print_json};
use pathwise::core::loader::LearningSnapshot;
use pathwise::core::models::LearningPath;
use pathwise::core::path_planner::create_skill_track_paths;

/// Run the tracks command.
///
/// # Errors
/// Returns a printable message if JSON output fails.
pub fn run(snapshot: &LearningSnapshot, json: bool) -> Result<(), String> {
    let tracks = create_skill_track_paths(&snapshot.catalog);
    if json {
        return print_json(&tracks);
    }
    for track in &tracks {
        print_path(track);
    }
    Ok(())
}

/// Print one learning path as a text block
pub fn print_path(path: &LearningPath) {
    println!("\n=== {} [{}] ===", path.name, path.id);
    println!("{}", path.description);
    println!(
        "Courses: {} | Estimated time: {} min | Difficulty: {}",
        path.course_count(),
        path.estimated_time_minutes,
        path.difficulty
    );
    println!("Order: {}", id_list(&path.courses, " → "));
    if !path.skills_gained.is_empty() {
        println!("Skills: {}", path.skills_gained.join(", "));
    }
}
