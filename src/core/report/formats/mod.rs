//! Report format implementations
//!
//! Provides exporters for the supported report formats: Markdown and HTML.

pub mod html;
pub mod markdown;

pub use html::HtmlReporter;
pub use markdown::MarkdownReporter;

use crate::core::report::ReportContext;
use std::fmt;
use std::str::FromStr;

/// Supported report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Markdown format with tables
    Markdown,
    /// Self-contained HTML page
    Html,
}

impl ReportFormat {
    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Html => "html",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "md" | "markdown" => Ok(Self::Markdown),
            "html" | "htm" => Ok(Self::Html),
            _ => Err(format!("Unknown report format: {s}")),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markdown => write!(f, "markdown"),
            Self::Html => write!(f, "html"),
        }
    }
}

/// Fill every `{{placeholder}}` in one pass over the template
///
/// Substituted text is never scanned again, so values that themselves
/// contain `{{...}}` come out verbatim. Unknown placeholders are left as is.
/// `escape` is applied to free-text values (the learner id); `skills` and
/// `paths` are pre-rendered sections inserted unchanged.
pub(crate) fn fill_template(
    template: &str,
    ctx: &ReportContext,
    escape: fn(&str) -> String,
    skills: &str,
    paths: &str,
) -> String {
    let progress = &ctx.analytics.course_progress;
    let performance = &ctx.analytics.assessment_performance;
    let patterns = &ctx.analytics.study_patterns;

    let value = |name: &str| -> Option<String> {
        Some(match name {
            "user_id" => escape(ctx.user_id),
            "completion_ratio" => ctx.completion_ratio(),
            "in_progress" => progress.in_progress_courses.to_string(),
            "average_completion" => format!("{:.1}", progress.average_completion_rate),
            "total_assessments" => performance.total_assessments.to_string(),
            "average_score" => format!("{:.1}", performance.average_score),
            "pass_rate" => format!("{:.1}", ctx.pass_rate_percent()),
            "trend" => format!("{:+.2}", performance.improvement_trend),
            "trend_label" => ctx.trend_label().to_string(),
            "total_study_time" => patterns.total_study_time.to_string(),
            "average_session" => format!("{:.1}", patterns.average_session_duration),
            "consistency" => format!("{:.2}", patterns.consistency_score),
            "skills" => skills.to_string(),
            "paths" => paths.to_string(),
            _ => return None,
        })
    };

    let mut out = String::with_capacity(template.len() + skills.len() + paths.len());
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            rest = &rest[open..];
            break;
        };
        let name = &after[..close];
        match value(name) {
            Some(text) => out.push_str(&text),
            None => out.push_str(&rest[open..open + close + 4]),
        }
        rest = &after[close + 2..];
    }
    out.push_str(rest);
    out
}
