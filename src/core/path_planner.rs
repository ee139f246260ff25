//! Next-course recommendations, skill tracks and level sequences

use crate::core::completion::DEFAULT_EXPECTED_MINUTES;
use crate::core::models::{Catalog, Course, LearningPath, Level, ProgressionPath, UserProgress};
use crate::{debug, warn};
use std::collections::HashSet;

/// Maximum number of courses recommended per progression path
pub const MAX_RECOMMENDATIONS: usize = 5;

/// Tags two courses must share to count as similar
pub const MIN_SHARED_TAGS: usize = 2;

/// A fixed skill track built from tag and level filters
struct TrackDefinition {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    /// Required level, or `None` for any level
    level: Option<Level>,
    tags: &'static [&'static str],
    default_minutes: u32,
    difficulty: Level,
}

const SKILL_TRACKS: [TrackDefinition; 3] = [
    TrackDefinition {
        id: "fundamentals",
        name: "Fundamentals",
        description: "Core concepts for new players",
        level: Some(Level::Beginner),
        tags: &["basics", "fundamentals", "beginner"],
        default_minutes: 60,
        difficulty: Level::Beginner,
    },
    TrackDefinition {
        id: "advanced-strategy",
        name: "Advanced Strategy",
        description: "Game-theory and high-level strategic play",
        level: Some(Level::Advanced),
        tags: &["advanced", "gto", "strategy"],
        default_minutes: 90,
        difficulty: Level::Advanced,
    },
    TrackDefinition {
        id: "tournament-mastery",
        name: "Tournament Mastery",
        description: "Multi-table and sit-and-go tournament play",
        level: None,
        tags: &["tournament", "mtt", "sit-and-go"],
        default_minutes: 75,
        difficulty: Level::Intermediate,
    },
];

impl TrackDefinition {
    fn includes(&self, course: &Course) -> bool {
        self.level.is_none_or(|level| course.level == level)
            && self.tags.iter().any(|tag| course.has_tag(tag))
    }
}

/// Build "what's next" paths for a learner
///
/// One path is produced per course the learner is actively studying
/// (`0 < completion_rate < 100`, not completed, present in the catalog).
/// When there is none, a single starting-point path is returned instead,
/// recommending beginner courses without prerequisites.
///
/// # Arguments
/// * `user_id` - Learner the progress records belong to
/// * `progress` - The learner's progress records
/// * `catalog` - Course catalog
/// * `target_skills` - Optional skills used to rank recommendations
#[must_use]
pub fn generate_learning_path(
    user_id: &str,
    progress: &[UserProgress],
    catalog: &Catalog,
    target_skills: Option<&[String]>,
) -> Vec<ProgressionPath> {
    let completed: HashSet<&str> = progress
        .iter()
        .filter(|p| p.is_completed())
        .map(|p| p.course_id.as_str())
        .collect();

    let unlocked: Vec<Course> = unlocked_courses(&completed, catalog)
        .into_iter()
        .cloned()
        .collect();

    let paths: Vec<ProgressionPath> = progress
        .iter()
        .filter(|p| p.is_in_progress())
        .filter_map(|p| {
            let Some(course) = catalog.get_course(&p.course_id) else {
                debug!("In-progress course '{}' is not in the catalog; skipped", p.course_id);
                return None;
            };
            let next = recommend_next(course, &completed, catalog, target_skills);
            debug!(
                "{user_id}: {} recommendation(s) after '{}'",
                next.len(),
                course.id
            );
            Some(ProgressionPath {
                current_course: Some(course.clone()),
                completion_rate: p.completion_rate,
                next_recommended_courses: next.into_iter().cloned().collect(),
                unlocked_courses: unlocked.clone(),
            })
        })
        .collect();

    if !paths.is_empty() {
        return paths;
    }

    debug!("{user_id}: no course in progress; suggesting starting points");
    vec![ProgressionPath {
        current_course: None,
        completion_rate: 0.0,
        next_recommended_courses: starting_points(&completed, catalog)
            .into_iter()
            .cloned()
            .collect(),
        unlocked_courses: unlocked,
    }]
}

/// Uncompleted courses whose non-empty prerequisite set is entirely completed
///
/// Ids missing from the catalog count as satisfied, as in enrollment checks.
fn unlocked_courses<'a>(completed: &HashSet<&str>, catalog: &'a Catalog) -> Vec<&'a Course> {
    catalog
        .courses()
        .iter()
        .filter(|c| !completed.contains(c.id.as_str()))
        .filter(|c| !c.is_entry_point())
        .filter(|c| {
            c.prerequisites
                .iter()
                .all(|p| !catalog.contains(p) || completed.contains(p.as_str()))
        })
        .collect()
}

/// Uncompleted beginner courses with no prerequisites, by title
fn starting_points<'a>(completed: &HashSet<&str>, catalog: &'a Catalog) -> Vec<&'a Course> {
    let mut courses: Vec<&Course> = catalog
        .courses()
        .iter()
        .filter(|c| c.level == Level::Beginner && c.is_entry_point())
        .filter(|c| !completed.contains(c.id.as_str()))
        .collect();
    courses.sort_by(|a, b| a.title.cmp(&b.title));
    courses.truncate(MAX_RECOMMENDATIONS);
    courses
}

/// Ranked recommendations following `current`
///
/// Candidates are uncompleted courses that either list `current` as a direct
/// prerequisite or sit at a different level while sharing at least
/// [`MIN_SHARED_TAGS`] tags with it.
fn recommend_next<'a>(
    current: &Course,
    completed: &HashSet<&str>,
    catalog: &'a Catalog,
    target_skills: Option<&[String]>,
) -> Vec<&'a Course> {
    let mut candidates: Vec<&Course> = catalog
        .courses()
        .iter()
        .filter(|c| c.id != current.id && !completed.contains(c.id.as_str()))
        .filter(|c| {
            c.prerequisites.contains(&current.id)
                || (c.level != current.level && c.shared_tag_count(current) >= MIN_SHARED_TAGS)
        })
        .collect();

    match target_skills {
        Some(skills) => candidates.sort_by(|a, b| {
            b.skill_overlap(skills)
                .cmp(&a.skill_overlap(skills))
                .then_with(|| a.title.cmp(&b.title))
        }),
        None => candidates.sort_by(|a, b| a.title.cmp(&b.title)),
    }

    candidates.truncate(MAX_RECOMMENDATIONS);
    candidates
}

/// The three fixed skill tracks
///
/// | Track              | Level    | Tags (any of)                   | Default minutes |
/// |--------------------|----------|---------------------------------|-----------------|
/// | Fundamentals       | Beginner | basics, fundamentals, beginner  | 60              |
/// | Advanced Strategy  | Advanced | advanced, gto, strategy         | 90              |
/// | Tournament Mastery | any      | tournament, mtt, sit-and-go     | 75              |
///
/// Courses in each track are sorted by title. Tracks with no matching courses
/// are still returned.
#[must_use]
pub fn create_skill_track_paths(catalog: &Catalog) -> Vec<LearningPath> {
    SKILL_TRACKS
        .iter()
        .map(|track| {
            let mut courses: Vec<Course> = catalog
                .courses()
                .iter()
                .filter(|c| track.includes(c))
                .cloned()
                .collect();
            courses.sort_by(|a, b| a.title.cmp(&b.title));

            LearningPath::from_courses(
                track.id.to_string(),
                track.name.to_string(),
                track.description.to_string(),
                courses,
                track.difficulty,
                track.default_minutes,
            )
        })
        .collect()
}

/// Whether a course belongs to a specialization
///
/// Matches a tag or the specialization field (case-insensitive), or a
/// substring of the description.
fn matches_specialization(course: &Course, specialization: &str) -> bool {
    let needle = specialization.to_lowercase();
    course.has_tag(specialization)
        || course
            .specialization
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case(specialization))
        || course.description.to_lowercase().contains(&needle)
}

/// Courses for a specialization from `current_level` up to `target_level`
///
/// Within each level, matches are ordered by ascending prerequisite count; the
/// concatenation is then passed through [`order_by_prerequisites`]. An
/// inverted or unrated range yields an empty sequence.
#[must_use]
pub fn optimal_sequence(
    current_level: Level,
    target_level: Level,
    specialization: &str,
    catalog: &Catalog,
) -> Vec<Course> {
    let matching: Vec<&Course> = catalog
        .courses()
        .iter()
        .filter(|c| matches_specialization(c, specialization))
        .collect();

    let mut staged: Vec<&Course> = Vec::new();
    for level in current_level.range_to(target_level) {
        let mut at_level: Vec<&Course> = matching
            .iter()
            .copied()
            .filter(|c| c.level == *level)
            .collect();
        at_level.sort_by_key(|c| c.prerequisites.len());
        staged.extend(at_level);
    }

    order_by_prerequisites(&staged)
        .into_iter()
        .cloned()
        .collect()
}

/// Greedy topological ordering over a candidate list
///
/// Prerequisites outside the list count as satisfied. When every remaining
/// course is blocked (a cycle among the candidates), the first remaining one
/// is appended anyway so the result is always a permutation of the input.
#[must_use]
pub fn order_by_prerequisites<'a>(courses: &[&'a Course]) -> Vec<&'a Course> {
    let candidates: HashSet<&str> = courses.iter().map(|c| c.id.as_str()).collect();
    let mut placed: HashSet<&str> = HashSet::new();
    let mut remaining: Vec<&Course> = courses.to_vec();
    let mut ordered = Vec::with_capacity(courses.len());

    while !remaining.is_empty() {
        let ready = remaining.iter().position(|c| {
            c.prerequisites
                .iter()
                .all(|p| !candidates.contains(p.as_str()) || placed.contains(p.as_str()))
        });

        let next = if let Some(pos) = ready {
            remaining.remove(pos)
        } else {
            warn!(
                "Prerequisite cycle among candidates; placing '{}' first",
                remaining[0].id
            );
            remaining.remove(0)
        };

        placed.insert(next.id.as_str());
        ordered.push(next);
    }

    ordered
}

/// Wrap [`optimal_sequence`] as a learning path
#[must_use]
pub fn sequence_learning_path(
    current_level: Level,
    target_level: Level,
    specialization: &str,
    catalog: &Catalog,
) -> LearningPath {
    let courses = optimal_sequence(current_level, target_level, specialization, catalog);

    LearningPath::from_courses(
        format!("{specialization}-{current_level}-to-{target_level}"),
        format!("{specialization} ({current_level} to {target_level})"),
        format!("Courses matching '{specialization}' from {current_level} to {target_level} level"),
        courses,
        target_level,
        DEFAULT_EXPECTED_MINUTES,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::prerequisites::check_prerequisites;
    use chrono::{TimeZone, Utc};

    fn course(id: &str, level: Level, prereqs: &[&str], tags: &[&str]) -> Course {
        let mut c = Course::new(id.to_string(), format!("Course {id}"), level);
        c.prerequisites = prereqs.iter().map(|p| (*p).to_string()).collect();
        c.tags = tags.iter().map(|t| (*t).to_string()).collect();
        c
    }

    fn progress(course_id: &str, rate: f64) -> UserProgress {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let mut p = UserProgress::new("u1".to_string(), course_id.to_string(), at);
        p.completion_rate = rate;
        p
    }

    fn ids(courses: &[Course]) -> Vec<&str> {
        courses.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn recommends_dependents_and_similar_courses() {
        let catalog = Catalog::new(vec![
            course("a", Level::Beginner, &[], &["preflop", "ranges"]),
            course("b", Level::Beginner, &["a"], &[]),
            course("c", Level::Intermediate, &[], &["preflop", "ranges"]),
            course("d", Level::Beginner, &[], &["preflop", "ranges"]),
            course("e", Level::Advanced, &[], &["preflop"]),
        ]);

        let paths = generate_learning_path("u1", &[progress("a", 40.0)], &catalog, None);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].current_course.as_ref().map(|c| c.id.as_str()), Some("a"));
        // d shares tags but sits at the same level; e shares only one tag
        assert_eq!(ids(&paths[0].next_recommended_courses), vec!["b", "c"]);
    }

    #[test]
    fn completed_courses_are_not_recommended() {
        let catalog = Catalog::new(vec![
            course("a", Level::Beginner, &[], &[]),
            course("b", Level::Beginner, &["a"], &[]),
            course("c", Level::Beginner, &["a"], &[]),
        ]);

        let paths = generate_learning_path(
            "u1",
            &[progress("a", 50.0), progress("b", 100.0)],
            &catalog,
            None,
        );
        assert_eq!(ids(&paths[0].next_recommended_courses), vec!["c"]);
    }

    #[test]
    fn target_skills_rank_before_title() {
        let catalog = Catalog::new(vec![
            course("a", Level::Beginner, &[], &[]),
            course("b", Level::Beginner, &["a"], &["cash"]),
            course("c", Level::Beginner, &["a"], &["gto", "icm"]),
            course("d", Level::Beginner, &["a"], &["GTO"]),
        ]);
        let skills = vec!["gto".to_string(), "icm".to_string()];

        let paths = generate_learning_path("u1", &[progress("a", 10.0)], &catalog, Some(&skills));
        assert_eq!(ids(&paths[0].next_recommended_courses), vec!["c", "d", "b"]);
    }

    #[test]
    fn recommendations_are_capped() {
        let mut courses = vec![course("root", Level::Beginner, &[], &[])];
        for i in 0..8 {
            courses.push(course(&format!("n{i}"), Level::Beginner, &["root"], &[]));
        }
        let catalog = Catalog::new(courses);

        let paths = generate_learning_path("u1", &[progress("root", 20.0)], &catalog, None);
        assert_eq!(paths[0].next_recommended_courses.len(), MAX_RECOMMENDATIONS);
    }

    #[test]
    fn unlocked_requires_every_prerequisite() {
        let catalog = Catalog::new(vec![
            course("a", Level::Beginner, &[], &[]),
            course("b", Level::Beginner, &[], &[]),
            course("c", Level::Intermediate, &["a"], &[]),
            course("d", Level::Intermediate, &["a", "b"], &[]),
        ]);

        let paths = generate_learning_path(
            "u1",
            &[progress("a", 100.0), progress("b", 30.0)],
            &catalog,
            None,
        );
        assert_eq!(ids(&paths[0].unlocked_courses), vec!["c"]);
    }

    #[test]
    fn unknown_prerequisite_counts_as_satisfied_for_unlocks() {
        let catalog = Catalog::new(vec![
            course("a", Level::Beginner, &[], &[]),
            course("b", Level::Beginner, &[], &[]),
            course("c", Level::Intermediate, &["a", "retired"], &[]),
        ]);
        let history = [progress("a", 100.0), progress("b", 30.0)];

        let c = catalog.get_course("c").unwrap();
        assert!(check_prerequisites(c, &history, &catalog).can_enroll);

        let paths = generate_learning_path("u1", &history, &catalog, None);
        assert_eq!(ids(&paths[0].unlocked_courses), vec!["c"]);
    }

    #[test]
    fn falls_back_to_starting_points() {
        let mut intro = course("z", Level::Beginner, &[], &[]);
        intro.title = "Alpha Intro".to_string();
        let catalog = Catalog::new(vec![
            intro,
            course("a", Level::Beginner, &[], &[]),
            course("b", Level::Beginner, &["a"], &[]),
            course("c", Level::Intermediate, &[], &[]),
        ]);

        let paths = generate_learning_path("u1", &[], &catalog, None);
        assert_eq!(paths.len(), 1);
        assert!(paths[0].current_course.is_none());
        assert_eq!(ids(&paths[0].next_recommended_courses), vec!["z", "a"]);
    }

    #[test]
    fn skill_tracks_filter_and_total() {
        let mut basics = course("basics", Level::Beginner, &[], &["basics"]);
        basics.set_duration(45);
        let catalog = Catalog::new(vec![
            basics,
            course("intro", Level::Beginner, &[], &["Fundamentals"]),
            course("gto", Level::Advanced, &[], &["gto"]),
            course("gto-lite", Level::Intermediate, &[], &["gto"]),
            course("mtt", Level::Intermediate, &[], &["mtt"]),
            course("sng", Level::Advanced, &[], &["sit-and-go"]),
        ]);

        let tracks = create_skill_track_paths(&catalog);
        assert_eq!(tracks.len(), 3);

        assert_eq!(tracks[0].id, "fundamentals");
        assert_eq!(ids(&tracks[0].courses), vec!["basics", "intro"]);
        assert_eq!(tracks[0].estimated_time_minutes, 45 + 60);

        assert_eq!(ids(&tracks[1].courses), vec!["gto"]);
        assert_eq!(tracks[1].estimated_time_minutes, 90);

        assert_eq!(ids(&tracks[2].courses), vec!["mtt", "sng"]);
        assert_eq!(tracks[2].estimated_time_minutes, 150);
    }

    #[test]
    fn skill_tracks_exist_for_empty_catalog() {
        let tracks = create_skill_track_paths(&Catalog::new(Vec::new()));
        assert_eq!(tracks.len(), 3);
        assert!(tracks.iter().all(|t| t.courses.is_empty()));
        assert!(tracks.iter().all(|t| t.estimated_time_minutes == 0));
    }

    #[test]
    fn optimal_sequence_walks_levels_in_order() {
        let mut described = course("deep", Level::Advanced, &["mid"], &[]);
        described.description = "Deep MTT endgames".to_string();
        let mut specialized = course("mid", Level::Intermediate, &[], &[]);
        specialized.specialization = Some("MTT".to_string());
        let catalog = Catalog::new(vec![
            described,
            specialized,
            course("start2", Level::Beginner, &["start"], &["mtt"]),
            course("start", Level::Beginner, &[], &["mtt"]),
            course("cash", Level::Beginner, &[], &["cash"]),
        ]);

        let sequence = optimal_sequence(Level::Beginner, Level::Advanced, "mtt", &catalog);
        assert_eq!(ids(&sequence), vec!["start", "start2", "mid", "deep"]);

        let partial = optimal_sequence(Level::Intermediate, Level::Intermediate, "mtt", &catalog);
        assert_eq!(ids(&partial), vec!["mid"]);

        assert!(optimal_sequence(Level::Advanced, Level::Beginner, "mtt", &catalog).is_empty());
    }

    #[test]
    fn order_respects_prerequisites_within_list() {
        let a = course("a", Level::Beginner, &["outside"], &[]);
        let b = course("b", Level::Beginner, &["a"], &[]);
        let c = course("c", Level::Beginner, &["b"], &[]);

        let ordered = order_by_prerequisites(&[&c, &b, &a]);
        let got: Vec<&str> = ordered.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(got, vec!["a", "b", "c"]);
    }

    #[test]
    fn order_breaks_cycles_and_keeps_every_course() {
        let a = course("a", Level::Beginner, &["c"], &[]);
        let b = course("b", Level::Beginner, &["a"], &[]);
        let c = course("c", Level::Beginner, &["b"], &[]);
        let d = course("d", Level::Beginner, &[], &[]);

        let ordered = order_by_prerequisites(&[&a, &b, &c, &d]);
        let got: Vec<&str> = ordered.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(got, vec!["d", "a", "b", "c"]);
    }

    #[test]
    fn sequence_path_sums_durations() {
        let mut a = course("a", Level::Beginner, &[], &["icm"]);
        a.set_duration(30);
        let catalog = Catalog::new(vec![a, course("b", Level::Intermediate, &["a"], &["icm"])]);

        let path = sequence_learning_path(Level::Beginner, Level::Intermediate, "icm", &catalog);
        assert_eq!(path.course_count(), 2);
        assert_eq!(path.estimated_time_minutes, 30 + DEFAULT_EXPECTED_MINUTES);
        assert_eq!(path.difficulty, Level::Intermediate);
        assert_eq!(path.skills_gained, vec!["icm"]);
    }
}
