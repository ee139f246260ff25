//! Validate command handler

use super::print_json;
use pathwise::core::loader::LearningSnapshot;
use pathwise::core::prerequisites::validate_catalog;
use pathwise::warn;

/// Run the validate command.
///
/// # Errors
/// Returns a printable message when the catalog has findings.
pub fn run(snapshot: &LearningSnapshot, json: bool) -> Result<(), String> {
    let diagnostics = validate_catalog(&snapshot.catalog);
    if json {
        print_json(&diagnostics)?;
    }
    if diagnostics.is_clean() {
        if !json {
            println!("✓ Catalog is clean ({} courses)", snapshot.catalog.len());
        }
        return Ok(());
    }

    for (course, prereq) in &diagnostics.unresolved {
        warn!("{course} lists unknown prerequisite {prereq}");
        if !json {
            println!("✗ {course}: prerequisite '{prereq}' is not in the catalog");
        }
    }
    if !json && !diagnostics.cycle_members.is_empty() {
        println!(
            "✗ Prerequisite cycle involving: {}",
            diagnostics.cycle_members.join(", ")
        );
    }

    let findings =
        diagnostics.unresolved.len() + usize::from(!diagnostics.cycle_members.is_empty());
    Err(format!("✗ Catalog has {findings} finding(s)"))
}
