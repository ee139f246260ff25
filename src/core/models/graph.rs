//! Prerequisite graph over a course catalog

use crate::core::error::{ProgressionError, Result};
use crate::core::models::Course;
use std::collections::{HashMap, HashSet, VecDeque};

/// Directed graph of course prerequisites
///
/// The graph uses two association lists:
/// - `dependencies`: maps each course to its prerequisites
/// - `dependents`: maps each course to the courses that require it (reverse graph)
///
/// Only ids present in the catalog become vertices. A prerequisite id that names
/// no catalog course is kept aside in `unresolved` instead of becoming an edge.
#[derive(Debug, Clone, Default)]
pub struct PrerequisiteGraph {
    /// Maps course id -> list of prerequisite course ids
    pub dependencies: HashMap<String, Vec<String>>,

    /// Maps course id -> list of courses that depend on it
    pub dependents: HashMap<String, Vec<String>>,

    /// All course ids in catalog order
    pub courses: Vec<String>,

    /// `(course, prerequisite)` pairs whose prerequisite is not in the catalog
    pub unresolved: Vec<(String, String)>,
}

impl PrerequisiteGraph {
    /// Build the graph for a set of courses
    ///
    /// Courses are taken in slice order; edges to ids outside the slice are
    /// recorded as unresolved.
    #[must_use]
    pub fn from_courses(courses: &[Course]) -> Self {
        let mut graph = Self::default();
        for course in courses {
            graph.add_course(course.id.clone());
        }

        let known: HashSet<&str> = courses.iter().map(|c| c.id.as_str()).collect();
        for course in courses {
            for prereq in &course.prerequisites {
                if known.contains(prereq.as_str()) {
                    graph.add_prerequisite(&course.id, prereq);
                } else {
                    graph.unresolved.push((course.id.clone(), prereq.clone()));
                }
            }
        }

        graph
    }

    /// Add a course vertex
    ///
    /// # Arguments
    /// * `course_id` - The unique course id
    pub fn add_course(&mut self, course_id: String) {
        if !self.dependencies.contains_key(&course_id) {
            self.courses.push(course_id.clone());
            self.dependencies.entry(course_id.clone()).or_default();
            self.dependents.entry(course_id).or_default();
        }
    }

    /// Add a prerequisite edge between two known courses
    ///
    /// Self-edges are ignored.
    ///
    /// # Arguments
    /// * `course_id` - Course that requires the prerequisite
    /// * `prerequisite_id` - Course that must be taken first
    pub fn add_prerequisite(&mut self, course_id: &str, prerequisite_id: &str) {
        if course_id == prerequisite_id {
            return;
        }
        self.add_course(course_id.to_string());
        self.add_course(prerequisite_id.to_string());

        if let Some(deps) = self.dependencies.get_mut(course_id) {
            if !deps.iter().any(|d| d == prerequisite_id) {
                deps.push(prerequisite_id.to_string());
            }
        }

        if let Some(deps) = self.dependents.get_mut(prerequisite_id) {
            if !deps.iter().any(|d| d == course_id) {
                deps.push(course_id.to_string());
            }
        }
    }

    /// Prerequisites of a course, or `None` if the course is unknown
    #[must_use]
    pub fn prerequisites(&self, course_id: &str) -> Option<&[String]> {
        self.dependencies.get(course_id).map(Vec::as_slice)
    }

    /// Courses that list `course_id` as a direct prerequisite
    #[must_use]
    pub fn dependents(&self, course_id: &str) -> Option<&[String]> {
        self.dependents.get(course_id).map(Vec::as_slice)
    }

    /// Number of course vertices
    #[must_use]
    pub const fn course_count(&self) -> usize {
        self.courses.len()
    }

    /// Whether a course id is a vertex of the graph
    #[must_use]
    pub fn contains_course(&self, course_id: &str) -> bool {
        self.dependencies.contains_key(course_id)
    }

    /// Transitive prerequisites of a course, dependency-first
    ///
    /// Depth-first post-order: every course appears after all of its own
    /// prerequisites. The result is deduplicated and never contains
    /// `course_id` itself. A visited set guarantees termination on cycles.
    #[must_use]
    pub fn prerequisite_chain(&self, course_id: &str) -> Vec<String> {
        let mut visited = HashSet::new();
        let mut chain = Vec::new();
        visited.insert(course_id.to_string());

        if let Some(prereqs) = self.dependencies.get(course_id) {
            for prereq in prereqs {
                self.collect_chain(prereq, &mut visited, &mut chain);
            }
        }

        chain
    }

    fn collect_chain(&self, course_id: &str, visited: &mut HashSet<String>, chain: &mut Vec<String>) {
        if !visited.insert(course_id.to_string()) {
            return;
        }

        if let Some(prereqs) = self.dependencies.get(course_id) {
            for prereq in prereqs {
                self.collect_chain(prereq, visited, chain);
            }
        }

        chain.push(course_id.to_string());
    }

    /// Compute a topological ordering of all courses using Kahn's algorithm
    ///
    /// Ties are broken by catalog order.
    ///
    /// # Errors
    /// Returns [`ProgressionError::PrerequisiteCycle`] naming every course that
    /// could not be ordered when the graph contains a cycle.
    pub fn topological_order(&self) -> Result<Vec<String>> {
        let mut indegree: HashMap<&str, usize> = self
            .courses
            .iter()
            .map(|c| (c.as_str(), self.dependencies.get(c).map_or(0, Vec::len)))
            .collect();

        let mut queue: VecDeque<&str> = self
            .courses
            .iter()
            .map(String::as_str)
            .filter(|c| indegree.get(c).copied().unwrap_or(0) == 0)
            .collect();

        let mut order = Vec::with_capacity(self.courses.len());

        while let Some(course) = queue.pop_front() {
            order.push(course.to_string());

            if let Some(children) = self.dependents.get(course) {
                for child in children {
                    if let Some(entry) = indegree.get_mut(child.as_str()) {
                        *entry = entry.saturating_sub(1);
                        if *entry == 0 {
                            queue.push_back(child);
                        }
                    }
                }
            }
        }

        if order.len() != self.courses.len() {
            let placed: HashSet<&str> = order.iter().map(String::as_str).collect();
            let stuck = self
                .courses
                .iter()
                .filter(|c| !placed.contains(c.as_str()))
                .cloned()
                .collect();
            return Err(ProgressionError::PrerequisiteCycle(stuck));
        }

        Ok(order)
    }
}

impl std::fmt::Display for PrerequisiteGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Prerequisite graph ({} courses):", self.courses.len())?;
        writeln!(f)?;

        let mut sorted_courses = self.courses.clone();
        sorted_courses.sort();

        for course_id in sorted_courses {
            if let Some(deps) = self.dependencies.get(&course_id) {
                if deps.is_empty() {
                    writeln!(f, "  {course_id} → (no prerequisites)")?;
                } else {
                    let deps_str = deps.join(", ");
                    writeln!(f, "  {course_id} → {deps_str}")?;
                }
            }
        }

        Ok(())
    }
}
