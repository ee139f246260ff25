//! Course catalog model

use super::{Course, PrerequisiteGraph};
use crate::warn;
use std::collections::HashMap;

/// Immutable, ordered collection of courses indexed by id
///
/// The catalog is static reference data: it is built once from a course list
/// and owns the prerequisite graph derived from it.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Courses in input order
    courses: Vec<Course>,

    /// Course id -> position in `courses`
    index: HashMap<String, usize>,

    /// Prerequisite graph over the catalog's ids
    graph: PrerequisiteGraph,
}

impl Catalog {
    /// Build a catalog from a course list
    ///
    /// When two courses share an id the first one wins. A course listing itself
    /// as a prerequisite has that entry removed and repeated prerequisite ids
    /// keep their first occurrence. Duplicate courses and self-prerequisites
    /// are logged.
    #[must_use]
    pub fn new(courses: Vec<Course>) -> Self {
        let mut kept: Vec<Course> = Vec::with_capacity(courses.len());
        let mut index = HashMap::new();

        for mut course in courses {
            if index.contains_key(&course.id) {
                warn!("Duplicate course id '{}' in catalog; keeping the first entry", course.id);
                continue;
            }

            let listed = std::mem::take(&mut course.prerequisites);
            if listed.contains(&course.id) {
                warn!("Course '{}' listed itself as a prerequisite; entry removed", course.id);
            }
            for prereq in listed {
                course.add_prerequisite(prereq);
            }

            index.insert(course.id.clone(), kept.len());
            kept.push(course);
        }

        let graph = PrerequisiteGraph::from_courses(&kept);

        Self {
            courses: kept,
            index,
            graph,
        }
    }

    /// Look up a course by id
    #[must_use]
    pub fn get_course(&self, id: &str) -> Option<&Course> {
        self.index.get(id).map(|&pos| &self.courses[pos])
    }

    /// Whether a course id is in the catalog
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All courses in catalog order
    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Number of courses
    #[must_use]
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    /// Whether the catalog has no courses
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// The prerequisite graph derived from the catalog
    #[must_use]
    pub const fn graph(&self) -> &PrerequisiteGraph {
        &self.graph
    }

    /// Resolve a list of ids to courses, skipping ids not in the catalog
    #[must_use]
    pub fn resolve<'a, I>(&'a self, ids: I) -> Vec<&'a Course>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        ids.into_iter()
            .filter_map(|id| self.get_course(id.as_ref()))
            .collect()
    }
}
