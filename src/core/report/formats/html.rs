//! HTML report generator
//!
//! Generates learner reports as a single self-contained HTML page with
//! embedded CSS.

use super::fill_template;
use crate::core::analytics::SkillAverage;
use crate::core::models::{Course, ProgressionPath};
use crate::core::report::{write_report, ReportContext, ReportGenerator};
use crate::core::Result;
use std::fmt::Write;
use std::path::Path;

/// Embedded HTML report template
const HTML_TEMPLATE: &str = include_str!("../templates/analytics.html");

/// HTML report generator
pub struct HtmlReporter;

/// Escape text for use in HTML content and attribute values
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

impl HtmlReporter {
    /// Create a new HTML reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render the report using template substitution
    #[allow(clippy::unused_self)]
    fn render_template(&self, ctx: &ReportContext) -> String {
        fill_template(
            HTML_TEMPLATE,
            ctx,
            escape_html,
            &Self::generate_skills_html(ctx),
            &Self::generate_paths_html(ctx.paths),
        )
    }

    fn skill_table(html: &mut String, caption: &str, areas: &[SkillAverage]) {
        let _ = writeln!(html, "  <table>");
        let _ = writeln!(html, "    <caption>{caption}</caption>");
        let _ = writeln!(html, "    <tr><th>Skill</th><th>Average</th></tr>");
        for area in areas {
            let _ = writeln!(
                html,
                "    <tr><td>{}</td><td>{:.1}%</td></tr>",
                escape_html(&area.skill),
                area.average
            );
        }
        let _ = writeln!(html, "  </table>");
    }

    fn tag_list(names: &[String]) -> String {
        if names.is_empty() {
            return "none".to_string();
        }
        names
            .iter()
            .map(|n| format!("<span class=\"tag\">{}</span>", escape_html(n)))
            .collect::<Vec<_>>()
            .join("")
    }

    /// Strongest and weakest skill tables with mastery lists
    fn generate_skills_html(ctx: &ReportContext) -> String {
        let skills = &ctx.analytics.skill_development;
        if skills.strongest_areas.is_empty() {
            return "  <p><em>No skill breakdowns recorded yet.</em></p>\n".to_string();
        }

        let mut html = String::new();
        Self::skill_table(&mut html, "Strongest", &skills.strongest_areas);
        Self::skill_table(&mut html, "Weakest", &skills.weakest_areas);
        let _ = writeln!(
            html,
            "  <p>Mastered: {}</p>",
            Self::tag_list(&skills.mastered_skills)
        );
        let _ = writeln!(
            html,
            "  <p>Needs work: {}</p>",
            Self::tag_list(&skills.improvement_areas)
        );
        html
    }

    fn course_rows(html: &mut String, courses: &[Course]) {
        for (i, course) in courses.iter().enumerate() {
            let _ = writeln!(
                html,
                "    <tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                i + 1,
                escape_html(&course.title),
                course.level
            );
        }
    }

    /// One table per progression path
    fn generate_paths_html(paths: &[ProgressionPath]) -> String {
        let mut html = String::new();

        for path in paths {
            let heading = path.current_course.as_ref().map_or_else(
                || "Getting started".to_string(),
                |c| format!("{} ({:.0}% complete)", escape_html(&c.title), path.completion_rate),
            );
            let _ = writeln!(html, "  <h3>{heading}</h3>");

            if path.next_recommended_courses.is_empty() {
                let _ = writeln!(html, "  <p><em>Nothing to recommend right now.</em></p>");
            } else {
                let _ = writeln!(html, "  <table>");
                let _ = writeln!(html, "    <tr><th>#</th><th>Course</th><th>Level</th></tr>");
                Self::course_rows(&mut html, &path.next_recommended_courses);
                let _ = writeln!(html, "  </table>");
            }

            if !path.unlocked_courses.is_empty() {
                let titles: Vec<String> = path
                    .unlocked_courses
                    .iter()
                    .map(|c| escape_html(&c.title))
                    .collect();
                let _ = writeln!(html, "  <p>Unlocked: {}</p>", titles.join(", "));
            }
        }

        html
    }
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for HtmlReporter {
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<()> {
        let report_content = self.render(ctx)?;
        write_report(output_path, &report_content)
    }

    fn render(&self, ctx: &ReportContext) -> Result<String> {
        Ok(self.render_template(ctx))
    }
}
