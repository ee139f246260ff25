//! Command-line interface entry point for `Pathwise`

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use commands::evaluate::ProgressUpdate;
use pathwise::config::Config;
use pathwise::core::loader::LearningSnapshot;
use pathwise::logger::{
    enable_debug, enable_verbose, init_file_logging, parse_level, set_level, Level,
};
use pathwise::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Cli::parse();

    // Load configuration once at startup and apply CLI overrides to it
    let mut config = Config::load();
    let defaults = Config::from_defaults();
    config.apply_overrides(&args.to_config_overrides());

    // CLI flag overrides config logging.level; fallback warn
    let mut level = args
        .log_level
        .map(Level::from)
        .or_else(|| parse_level(&config.logging.level))
        .unwrap_or(Level::Warn);

    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    // CLI flag wins, otherwise use config logging.file if set
    let config_log_path = (!config.logging.file.is_empty())
        .then(|| PathBuf::from(&config.logging.file));

    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        let display_path = log_path.to_string_lossy();
        if init_file_logging(log_path) {
            if verbose {
                eprintln!("✓ File logging initialized at: {display_path}");
            } else {
                info!("File logging initialized at: {display_path}");
            }
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }

    let json = args.json;
    match args.command {
        Command::Config { subcommand } => {
            match commands::config::run(subcommand, &mut config, &defaults) {
                Ok(()) => ExitCode::SUCCESS,
                Err(err) => {
                    error!("Config command failed: {err}");
                    eprintln!("{err}");
                    ExitCode::FAILURE
                }
            }
        }
        Command::Check { user, course } => with_snapshot(&config, |snapshot| {
            commands::check::run(snapshot, &user, &course, json)
        }),
        Command::Path { user, skills } => with_snapshot(&config, |snapshot| {
            commands::path::run(snapshot, &user, &skills, json)
        }),
        Command::Tracks => with_snapshot(&config, |snapshot| commands::tracks::run(snapshot, json)),
        Command::Sequence {
            specialization,
            from,
            to,
        } => with_snapshot(&config, |snapshot| {
            commands::sequence::run(snapshot, &specialization, from, to, json)
        }),
        Command::Evaluate {
            user,
            course,
            rate,
            study_minutes,
        } => with_snapshot(&config, |snapshot| {
            let update = ProgressUpdate {
                rate,
                study_minutes,
            };
            commands::evaluate::run(snapshot, &user, &course, update, json)
        }),
        Command::Analytics {
            user,
            report,
            output,
        } => with_snapshot(&config, |snapshot| {
            commands::analytics::run(snapshot, &user, report, output.as_deref(), &config, json)
        }),
        Command::Validate => with_snapshot(&config, |snapshot| commands::validate::run(snapshot, json)),
    }
}

/// Load the configured snapshot and run `command` against it
fn with_snapshot(
    config: &Config,
    command: impl FnOnce(&LearningSnapshot) -> Result<(), String>,
) -> ExitCode {
    match commands::open_snapshot(config).and_then(|snapshot| command(&snapshot)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
