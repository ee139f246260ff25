//! CLI command handlers for `Pathwise`.
//!
//! Each command is implemented in its own submodule. Handlers that read
//! learner data take the already-loaded [`LearningSnapshot`] and report
//! failures as `✗ ...` strings, which the entry point logs and prints.

pub mod analytics;
pub mod check;
pub mod config;
pub mod evaluate;
pub mod path;
pub mod sequence;
pub mod tracks;
pub mod validate;

use pathwise::config::Config;
use pathwise::core::loader::{load_snapshot, LearningSnapshot};
use pathwise::core::models::{Course, UserProgress};
use pathwise::info;
use serde::Serialize;
use std::path::Path;

/// Load the snapshot named by `paths.snapshot_file`
///
/// # Errors
/// Returns a printable message if the setting is empty or the file cannot be loaded.
pub fn open_snapshot(config: &Config) -> Result<LearningSnapshot, String> {
    if config.paths.snapshot_file.is_empty() {
        return Err(
            "✗ No snapshot file configured. Use --snapshot or `pathwise config set snapshot_file <FILE>`."
                .to_string(),
        );
    }

    let path = Path::new(&config.paths.snapshot_file);
    let snapshot = load_snapshot(path)
        .map_err(|e| format!("✗ Failed to load {}: {e}", path.display()))?;
    info!("Snapshot loaded: {}", path.display());
    Ok(snapshot)
}

/// Progress records for one learner; an unknown learner has none
pub fn learner_progress(snapshot: &LearningSnapshot, user_id: &str) -> Vec<UserProgress> {
    snapshot
        .progress
        .iter()
        .filter(|p| p.user_id == user_id)
        .cloned()
        .collect()
}

/// Print a value as pretty JSON
///
/// # Errors
/// Returns a printable message if serialization fails.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| format!("✗ Failed to serialize output: {e}"))?;
    println!("{text}");
    Ok(())
}

/// Render course ids as `a → b → c`, or `none`
pub fn id_list<'a, I>(courses: I, separator: &str) -> String
where
    I: IntoIterator<Item = &'a Course>,
{
    let ids: Vec<&str> = courses.into_iter().map(|c| c.id.as_str()).collect();
    if ids.is_empty() {
        "none".to_string()
    } else {
        ids.join(separator)
    }
}
