//! CLI argument definitions for `Pathwise`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use pathwise::config::ConfigOverrides;
use pathwise::core::models::Level as CourseLevel;
use pathwise::core::report::ReportFormat;
use pathwise::logger::Level;

/// CLI log level argument
///
/// Converts to lowercase strings for config storage and to `logger::Level`
/// for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `snapshot_file`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Check whether a learner may enroll in a course.
    ///
    /// Shows missing prerequisites, the full prerequisite chain and the
    /// courses this one unlocks.
    Check {
        /// Learner id
        #[arg(value_name = "USER")]
        user: String,
        /// Course id
        #[arg(value_name = "COURSE")]
        course: String,
    },
    /// Recommend what a learner should study next.
    Path {
        /// Learner id
        #[arg(value_name = "USER")]
        user: String,
        /// Skill to favour when ranking recommendations (repeatable)
        #[arg(long = "skill", value_name = "SKILL")]
        skills: Vec<String>,
    },
    /// List the predefined skill tracks.
    Tracks,
    /// Build an ordered course sequence between two levels.
    Sequence {
        /// Specialization to match against tags, specialization and description
        #[arg(value_name = "SPECIALIZATION")]
        specialization: String,
        /// Starting level (beginner, intermediate, advanced)
        #[arg(long, value_name = "LEVEL", default_value = "beginner")]
        from: CourseLevel,
        /// Target level (beginner, intermediate, advanced)
        #[arg(long, value_name = "LEVEL", default_value = "advanced")]
        to: CourseLevel,
    },
    /// Evaluate a learner's progress record as if it had just been updated.
    ///
    /// Reports whether the record should be stamped as completed and which
    /// courses that completion unlocks. The snapshot file is not modified.
    Evaluate {
        /// Learner id
        #[arg(value_name = "USER")]
        user: String,
        /// Course id
        #[arg(value_name = "COURSE")]
        course: String,
        /// Replace the stored content completion rate (0-100)
        #[arg(long, value_name = "PERCENT")]
        rate: Option<f64>,
        /// Replace the stored study time in minutes
        #[arg(long, value_name = "MINUTES")]
        study_minutes: Option<u32>,
    },
    /// Summarize a learner's progress, assessments, study habits and skills.
    Analytics {
        /// Learner id
        #[arg(value_name = "USER")]
        user: String,
        /// Also write a report in the given format (md, html)
        #[arg(long, value_name = "FORMAT")]
        report: Option<ReportFormat>,
        /// Report output path (defaults to `<reports_dir>/<USER>-analytics.<ext>`)
        #[arg(short, long, value_name = "FILE", requires = "report")]
        output: Option<PathBuf>,
    },
    /// Report data-integrity problems in the course catalog.
    Validate,
}

#[derive(Parser, Debug)]
#[command(
    name = "pathwise",
    about = "Pathwise course-progression command-line interface",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Print command results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    // --- Config overrides ---
    /// Override config logging level (stored in config file)
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override config snapshot file
    #[arg(long = "config-snapshot-file", value_name = "FILE")]
    pub config_snapshot_file: Option<PathBuf>,

    /// Override config snapshot file (short form)
    #[arg(long = "snapshot", value_name = "FILE")]
    pub snapshot: Option<PathBuf>,

    /// Override config reports directory
    #[arg(long = "config-reports-dir", value_name = "DIR")]
    pub config_reports_dir: Option<PathBuf>,

    /// Override config reports directory (short form)
    #[arg(long = "reports-dir", value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

fn path_string(path: Option<&PathBuf>) -> Option<String> {
    path.map(|p| p.to_string_lossy().to_string())
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// Short-form flags (e.g., `--snapshot`) take precedence over long-form
    /// flags (e.g., `--config-snapshot-file`) when both are provided.
    ///
    /// # Returns
    /// A `ConfigOverrides` struct with values from CLI flags, where `None` means no override.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: path_string(self.config_log_file.as_ref()),
            verbose: self.config_verbose,
            snapshot_file: path_string(self.snapshot.as_ref())
                .or_else(|| path_string(self.config_snapshot_file.as_ref())),
            reports_dir: path_string(self.reports_dir.as_ref())
                .or_else(|| path_string(self.config_reports_dir.as_ref())),
        }
    }
}
