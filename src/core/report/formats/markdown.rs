//! Markdown report generator
//!
//! Generates learner reports in Markdown. These render well in GitHub,
//! GitLab and VS Code.

use super::fill_template;
use crate::core::models::ProgressionPath;
use crate::core::report::{write_report, ReportContext, ReportGenerator};
use crate::core::Result;
use std::fmt::Write;
use std::path::Path;

/// Embedded Markdown report template
const MARKDOWN_TEMPLATE: &str = include_str!("../templates/analytics.md");

/// Markdown report generator
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Create a new Markdown reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render the report using template substitution
    #[allow(clippy::unused_self)]
    fn render_template(&self, ctx: &ReportContext) -> String {
        fill_template(
            MARKDOWN_TEMPLATE,
            ctx,
            str::to_string,
            &Self::generate_skills_section(ctx),
            &Self::generate_paths_section(ctx.paths),
        )
    }

    /// Strongest and weakest skills as tables, plus mastery lists
    fn generate_skills_section(ctx: &ReportContext) -> String {
        let skills = &ctx.analytics.skill_development;
        if skills.strongest_areas.is_empty() {
            return "_No skill breakdowns recorded yet._\n".to_string();
        }

        let mut out = String::new();
        for (heading, areas) in [
            ("Strongest", &skills.strongest_areas),
            ("Weakest", &skills.weakest_areas),
        ] {
            let _ = writeln!(out, "### {heading}\n");
            out.push_str("| Skill | Average |\n|---|---|\n");
            for area in areas {
                let _ = writeln!(out, "| {} | {:.1}% |", area.skill, area.average);
            }
            out.push('\n');
        }

        let list = |names: &[String]| {
            if names.is_empty() {
                "none".to_string()
            } else {
                names.join(", ")
            }
        };
        let _ = writeln!(out, "- **Mastered:** {}", list(&skills.mastered_skills));
        let _ = writeln!(out, "- **Needs work:** {}", list(&skills.improvement_areas));
        out
    }

    /// One subsection per progression path
    fn generate_paths_section(paths: &[ProgressionPath]) -> String {
        let mut out = String::new();

        for path in paths {
            match &path.current_course {
                Some(course) => {
                    let _ = writeln!(
                        out,
                        "### {} ({:.0}% complete)\n",
                        course.title, path.completion_rate
                    );
                }
                None => out.push_str("### Getting started\n\n"),
            }

            if path.next_recommended_courses.is_empty() {
                out.push_str("_Nothing to recommend right now._\n");
            } else {
                out.push_str("| # | Course | Level |\n|---|---|---|\n");
                for (i, course) in path.next_recommended_courses.iter().enumerate() {
                    let _ = writeln!(out, "| {} | {} | {} |", i + 1, course.title, course.level);
                }
            }

            if !path.unlocked_courses.is_empty() {
                let titles: Vec<&str> = path
                    .unlocked_courses
                    .iter()
                    .map(|c| c.title.as_str())
                    .collect();
                let _ = writeln!(out, "\nUnlocked: {}", titles.join(", "));
            }
            out.push('\n');
        }

        out
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for MarkdownReporter {
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<()> {
        let report_content = self.render(ctx)?;
        write_report(output_path, &report_content)
    }

    fn render(&self, ctx: &ReportContext) -> Result<String> {
        Ok(self.render_template(ctx))
    }
}
