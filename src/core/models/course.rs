//! Course model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Difficulty level of a course
///
/// The three rated levels form an ordered ladder used when sequencing courses.
/// Any level string the catalog does not recognise deserializes to `Unrated`,
/// which sits outside the ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Level {
    /// Entry-level material
    Beginner,
    /// Builds on beginner material
    Intermediate,
    /// Expert material
    Advanced,
    /// Unknown or missing level
    #[serde(other)]
    Unrated,
}

static RATED_LEVELS: [Level; 3] = Level::LADDER;

impl Level {
    /// The rated levels in ascending order
    pub const LADDER: [Self; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];

    /// Position on the ladder, or `None` for `Unrated`
    #[must_use]
    pub const fn rank(self) -> Option<usize> {
        match self {
            Self::Beginner => Some(0),
            Self::Intermediate => Some(1),
            Self::Advanced => Some(2),
            Self::Unrated => None,
        }
    }

    /// Rated levels from `self` up to `target` inclusive
    ///
    /// Empty when either end is unrated or when `target` sits below `self`.
    #[must_use]
    pub fn range_to(self, target: Self) -> &'static [Self] {
        match (self.rank(), target.rank()) {
            (Some(from), Some(to)) if from <= to => &RATED_LEVELS[from..=to],
            _ => &[],
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Unrated => "unrated",
        };
        write!(f, "{label}")
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(format!("Unknown level: {s}")),
        }
    }
}

/// Represents a course in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Unique course id (e.g., "preflop-basics")
    pub id: String,

    /// Display title
    pub title: String,

    /// Difficulty level
    #[serde(default = "default_level")]
    pub level: Level,

    /// Ids of courses that must be completed first
    #[serde(default)]
    pub prerequisites: Vec<String>,

    /// Topic tags (e.g., "gto", "tournament")
    #[serde(default)]
    pub tags: Vec<String>,

    /// Expected study time in minutes, when known
    #[serde(default)]
    pub duration_minutes: Option<u32>,

    /// Specialization the course belongs to (e.g., "cash-games")
    #[serde(default)]
    pub specialization: Option<String>,

    /// Free-text description
    #[serde(default)]
    pub description: String,
}

const fn default_level() -> Level {
    Level::Unrated
}

impl Course {
    /// Create a new course with no prerequisites or tags
    ///
    /// # Arguments
    /// * `id` - Unique course id
    /// * `title` - Display title
    /// * `level` - Difficulty level
    #[must_use]
    pub const fn new(id: String, title: String, level: Level) -> Self {
        Self {
            id,
            title,
            level,
            prerequisites: Vec::new(),
            tags: Vec::new(),
            duration_minutes: None,
            specialization: None,
            description: String::new(),
        }
    }

    /// Add a prerequisite by course id
    ///
    /// Duplicates and the course's own id are ignored.
    pub fn add_prerequisite(&mut self, prereq_id: String) {
        if prereq_id != self.id && !self.prerequisites.contains(&prereq_id) {
            self.prerequisites.push(prereq_id);
        }
    }

    /// Add a tag, ignoring duplicates
    pub fn add_tag(&mut self, tag: String) {
        if !self.has_tag(&tag) {
            self.tags.push(tag);
        }
    }

    /// Set the expected duration in minutes
    pub fn set_duration(&mut self, minutes: u32) {
        self.duration_minutes = Some(minutes);
    }

    /// Whether the course carries a tag (ASCII case-insensitive)
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Number of tags shared with another course
    #[must_use]
    pub fn shared_tag_count(&self, other: &Self) -> usize {
        self.tags.iter().filter(|t| other.has_tag(t)).count()
    }

    /// Number of this course's tags that appear in `skills`
    #[must_use]
    pub fn skill_overlap(&self, skills: &[String]) -> usize {
        self.tags
            .iter()
            .filter(|t| skills.iter().any(|s| s.eq_ignore_ascii_case(t)))
            .count()
    }

    /// Whether the course has no prerequisites
    #[must_use]
    pub fn is_entry_point(&self) -> bool {
        self.prerequisites.is_empty()
    }

    /// Duration in minutes, or `default` when unset or zero
    #[must_use]
    pub fn duration_or(&self, default: u32) -> u32 {
        self.duration_minutes.filter(|m| *m > 0).unwrap_or(default)
    }
}
