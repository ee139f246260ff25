//! Report generation for learner analytics
//!
//! Renders a learner's [`LearningAnalytics`] and progression paths as Markdown
//! or self-contained HTML from embedded templates.

pub mod formats;

use crate::core::analytics::LearningAnalytics;
use crate::core::models::ProgressionPath;
use crate::core::Result;
use std::path::Path;

pub use formats::{HtmlReporter, MarkdownReporter, ReportFormat};

/// Data context for report generation
///
/// Aggregates everything a template needs for one learner.
#[derive(Debug, Clone, Copy)]
pub struct ReportContext<'a> {
    /// Learner the report is about
    pub user_id: &'a str,
    /// Analytics summary for the learner
    pub analytics: &'a LearningAnalytics,
    /// "What's next" paths for the learner
    pub paths: &'a [ProgressionPath],
}

impl<'a> ReportContext<'a> {
    /// Create a new report context
    #[must_use]
    pub const fn new(
        user_id: &'a str,
        analytics: &'a LearningAnalytics,
        paths: &'a [ProgressionPath],
    ) -> Self {
        Self {
            user_id,
            analytics,
            paths,
        }
    }

    /// Completed courses as "completed / total"
    #[must_use]
    pub fn completion_ratio(&self) -> String {
        let progress = &self.analytics.course_progress;
        format!("{} / {}", progress.completed_courses, progress.total_courses)
    }

    /// Pass rate as a percentage
    #[must_use]
    pub fn pass_rate_percent(&self) -> f64 {
        self.analytics.assessment_performance.pass_rate * 100.0
    }

    /// Short label for the score trend
    #[must_use]
    pub fn trend_label(&self) -> &'static str {
        let trend = self.analytics.assessment_performance.improvement_trend;
        if trend > 0.0 {
            "improving"
        } else if trend < 0.0 {
            "declining"
        } else {
            "steady"
        }
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Generate a report to a file
    ///
    /// # Errors
    /// Returns an error if report generation or file writing fails
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<()>;

    /// Generate report content as a string
    ///
    /// # Errors
    /// Returns an error if report generation fails
    fn render(&self, ctx: &ReportContext) -> Result<String>;
}

/// Write rendered report content, creating missing parent directories
pub(crate) fn write_report(output_path: &Path, content: &str) -> Result<()> {
    let io_error = |source| crate::core::ProgressionError::Io {
        path: output_path.to_path_buf(),
        source,
    };

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
    }
    std::fs::write(output_path, content).map_err(io_error)
}
