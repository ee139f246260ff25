//! Shared library for `Pathwise`
//! Contains the course-progression engine used by the CLI and by embedding services

pub mod config;
pub mod core;
pub mod logger;

pub use crate::core::get_version;
