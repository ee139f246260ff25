//! Analytics command handler
//!
//! Prints a learner's analytics summary and optionally renders it as a
//! Markdown or HTML report.

use super::print_json;
use pathwise::config::Config;
use pathwise::core::analytics::{generate_analytics, LearningAnalytics, SkillAverage};
use pathwise::core::loader::LearningSnapshot;
use pathwise::core::path_planner::generate_learning_path;
use pathwise::core::report::{
    HtmlReporter, MarkdownReporter, ReportContext, ReportFormat, ReportGenerator,
};
use pathwise::info;
use std::path::{Path, PathBuf};

/// Run the analytics command.
///
/// # Arguments
/// * `snapshot` - Loaded learner data
/// * `user_id` - Learner id
/// * `report` - Optional report format to write
/// * `output` - Optional report path; defaults under `paths.reports_dir`
/// * `config` - Configuration containing the reports directory
/// * `json` - Print JSON instead of text
///
/// # Errors
/// Returns a printable message if the learner has no progress records or
/// the report cannot be written.
pub fn run(
    snapshot: &LearningSnapshot,
    user_id: &str,
    report: Option<ReportFormat>,
    output: Option<&Path>,
    config: &Config,
    json: bool,
) -> Result<(), String> {
    let progress = snapshot
        .progress_for_user(user_id)
        .map_err(|e| format!("✗ {e}"))?;
    let analytics =
        generate_analytics(user_id, &progress, &snapshot.catalog, &snapshot.assessments);

    if json {
        print_json(&analytics)?;
    } else {
        print_summary(&analytics);
    }

    if let Some(format) = report {
        let paths = generate_learning_path(user_id, &progress, &snapshot.catalog, None);
        let ctx = ReportContext::new(user_id, &analytics, &paths);
        let output_path = output.map_or_else(
            || default_report_path(config, user_id, format),
            Path::to_path_buf,
        );
        write_report(&ctx, format, &output_path)?;
        info!("Report written: {}", output_path.display());
        if !json {
            println!("✓ Report generated: {}", output_path.display());
        }
    }
    Ok(())
}

fn default_report_path(config: &Config, user_id: &str, format: ReportFormat) -> PathBuf {
    PathBuf::from(&config.paths.reports_dir)
        .join(format!("{user_id}-analytics.{}", format.extension()))
}

fn write_report(
    ctx: &ReportContext,
    format: ReportFormat,
    output_path: &Path,
) -> Result<(), String> {
    match format {
        ReportFormat::Markdown => MarkdownReporter::new()
            .generate(ctx, output_path)
            .map_err(|e| format!("✗ Failed to generate Markdown report: {e}")),
        ReportFormat::Html => HtmlReporter::new()
            .generate(ctx, output_path)
            .map_err(|e| format!("✗ Failed to generate HTML report: {e}")),
    }
}

fn skill_line(skills: &[SkillAverage]) -> String {
    if skills.is_empty() {
        return "none".to_string();
    }
    skills
        .iter()
        .map(|s| format!("{} ({:.1}%)", s.skill, s.average))
        .collect::<Vec<_>>()
        .join(", ")
}

fn name_line(names: &[String]) -> String {
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

fn print_summary(analytics: &LearningAnalytics) {
    let progress = &analytics.course_progress;
    let performance = &analytics.assessment_performance;
    let patterns = &analytics.study_patterns;
    let skills = &analytics.skill_development;

    println!("\n=== Learning analytics: {} ===", analytics.user_id);
    println!(
        "Courses: {} / {} completed, {} in progress, {:.1}% average completion",
        progress.completed_courses,
        progress.total_courses,
        progress.in_progress_courses,
        progress.average_completion_rate
    );
    println!(
        "Assessments: {} attempts, {:.1}% average, {:.1}% passed, trend {:+.2}",
        performance.total_assessments,
        performance.average_score,
        performance.pass_rate * 100.0,
        performance.improvement_trend
    );
    println!(
        "Study: {} min total, {:.1} min per course, consistency {:.2}",
        patterns.total_study_time, patterns.average_session_duration, patterns.consistency_score
    );
    println!("Strongest skills: {}", skill_line(&skills.strongest_areas));
    println!("Weakest skills: {}", skill_line(&skills.weakest_areas));
    println!("Mastered: {}", name_line(&skills.mastered_skills));
    println!("Needs work: {}", name_line(&skills.improvement_areas));
}
