//! Enrollment eligibility and prerequisite traversal
//!
//! A prerequisite id that does not resolve to a catalog course is treated as
//! satisfied and skipped. Only prerequisites that name a real, incomplete
//! course block enrollment. [`validate_catalog`] surfaces those dangling ids
//! (and any cycles) for callers that want to treat them as data errors.

use crate::core::models::{Catalog, Course, UserProgress};
use crate::core::ProgressionError;
use crate::debug;
use serde::Serialize;
use std::collections::HashMap;

/// Outcome of an enrollment eligibility check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrerequisiteCheck {
    /// Whether the learner may enroll
    pub can_enroll: bool,
    /// Prerequisites that are not yet completed
    pub missing: Vec<Course>,
    /// Prerequisites already completed
    pub completed: Vec<Course>,
    /// Human-readable summary
    pub message: String,
}

/// Data-integrity findings for a catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogDiagnostics {
    /// `(course, prerequisite)` pairs whose prerequisite is not in the catalog
    pub unresolved: Vec<(String, String)>,
    /// Courses that sit on or behind a prerequisite cycle
    pub cycle_members: Vec<String>,
}

impl CatalogDiagnostics {
    /// Whether the catalog has no findings
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty() && self.cycle_members.is_empty()
    }
}

/// Check whether a learner may enroll in `course`
///
/// # Arguments
/// * `course` - Course the learner wants to start
/// * `progress` - The learner's progress records
/// * `catalog` - Course catalog used to resolve prerequisite ids
#[must_use]
pub fn check_prerequisites(
    course: &Course,
    progress: &[UserProgress],
    catalog: &Catalog,
) -> PrerequisiteCheck {
    if course.prerequisites.is_empty() {
        return PrerequisiteCheck {
            can_enroll: true,
            missing: Vec::new(),
            completed: Vec::new(),
            message: "No prerequisites required".to_string(),
        };
    }

    let by_course: HashMap<&str, &UserProgress> = progress
        .iter()
        .map(|p| (p.course_id.as_str(), p))
        .collect();

    let mut missing = Vec::new();
    let mut completed = Vec::new();

    for prereq_id in &course.prerequisites {
        let Some(prereq) = catalog.get_course(prereq_id) else {
            debug!(
                "Prerequisite '{prereq_id}' of '{}' is not in the catalog; treating as satisfied",
                course.id
            );
            continue;
        };

        if by_course.get(prereq_id.as_str()).is_some_and(|p| p.is_completed()) {
            completed.push(prereq.clone());
        } else {
            missing.push(prereq.clone());
        }
    }

    let can_enroll = missing.is_empty();
    let message = if can_enroll {
        "All prerequisites completed".to_string()
    } else {
        let titles: Vec<&str> = missing.iter().map(|c| c.title.as_str()).collect();
        format!("Missing prerequisites: {}", titles.join(", "))
    };

    PrerequisiteCheck {
        can_enroll,
        missing,
        completed,
        message,
    }
}

/// Courses that list `course_id` as a direct prerequisite, in catalog order
#[must_use]
pub fn courses_unlocked_by<'a>(course_id: &str, catalog: &'a Catalog) -> Vec<&'a Course> {
    catalog
        .graph()
        .dependents(course_id)
        .map(|ids| catalog.resolve(ids))
        .unwrap_or_default()
}

/// Full transitive prerequisite set of a course, dependency-first
///
/// Never contains the course itself and terminates on cyclic catalogs.
#[must_use]
pub fn prerequisite_chain<'a>(course_id: &str, catalog: &'a Catalog) -> Vec<&'a Course> {
    catalog.resolve(catalog.graph().prerequisite_chain(course_id))
}

/// Report dangling prerequisite ids and cycles in a catalog
#[must_use]
pub fn validate_catalog(catalog: &Catalog) -> CatalogDiagnostics {
    let graph = catalog.graph();
    let cycle_members =
        if let Err(ProgressionError::PrerequisiteCycle(members)) = graph.topological_order() {
            members
        } else {
            Vec::new()
        };

    CatalogDiagnostics {
        unresolved: graph.unresolved.clone(),
        cycle_members,
    }
}
