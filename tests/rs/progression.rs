//! Properties of the progression engine over synthetic catalogs

use chrono::{TimeZone, Utc};
use pathwise::core::analytics::calculate_trend;
use pathwise::core::completion::{
    calculate_overall_completion, check_completion, standard_completion_criteria,
    CompletionCriteria,
};
use pathwise::core::models::{Assessment, Catalog, Course, Level, TestScore, UserProgress};
use pathwise::core::path_planner::order_by_prerequisites;
use pathwise::core::prerequisites::{check_prerequisites, courses_unlocked_by, prerequisite_chain};
use std::collections::HashSet;

fn course(id: &str, level: Level, prereqs: &[&str]) -> Course {
    let mut c = Course::new(id.to_string(), format!("Course {id}"), level);
    for p in prereqs {
        c.add_prerequisite((*p).to_string());
    }
    c
}

fn progress(course_id: &str, rate: f64, study: u32) -> UserProgress {
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let mut p = UserProgress::new("learner".to_string(), course_id.to_string(), created);
    p.completion_rate = rate;
    p.study_time_minutes = study;
    p
}

fn scored(mut p: UserProgress, scores: &[(&str, f64)]) -> UserProgress {
    let at = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    p.test_scores = scores
        .iter()
        .map(|(id, pct)| TestScore::new((*id).to_string(), *pct, at))
        .collect();
    p
}

/// A tangled catalog: a diamond, a three-course cycle and a self-loop attempt
fn tangled_catalog() -> Catalog {
    let mut selfish = course("selfish", Level::Beginner, &[]);
    selfish.prerequisites.push("selfish".to_string());

    Catalog::new(vec![
        course("root", Level::Beginner, &[]),
        course("left", Level::Intermediate, &["root"]),
        course("right", Level::Intermediate, &["root"]),
        course("top", Level::Advanced, &["left", "right", "ghost"]),
        course("x", Level::Advanced, &["z"]),
        course("y", Level::Advanced, &["x"]),
        course("z", Level::Advanced, &["y", "root"]),
        selfish,
    ])
}

#[test]
fn empty_prerequisites_always_enroll() {
    let catalog = tangled_catalog();
    let histories = [
        vec![],
        vec![progress("root", 10.0, 0)],
        vec![progress("root", 100.0, 0), progress("x", 3.0, 0)],
    ];

    for c in catalog.courses().iter().filter(|c| c.prerequisites.is_empty()) {
        for history in &histories {
            let check = check_prerequisites(c, history, &catalog);
            assert!(check.can_enroll, "{} should be open", c.id);
            assert!(check.missing.is_empty());
        }
    }
}

#[test]
fn self_prerequisite_is_stripped() {
    let catalog = tangled_catalog();
    let selfish = catalog.get_course("selfish").unwrap();
    assert!(selfish.prerequisites.is_empty());
}

#[test]
fn chains_have_no_duplicates_and_exclude_root() {
    let catalog = tangled_catalog();

    for c in catalog.courses() {
        let chain = prerequisite_chain(&c.id, &catalog);
        let unique: HashSet<&str> = chain.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(unique.len(), chain.len(), "duplicate in chain of {}", c.id);
        assert!(!unique.contains(c.id.as_str()), "{} is in its own chain", c.id);
    }
}

#[test]
fn chain_is_dependency_first() {
    let catalog = tangled_catalog();
    let chain: Vec<&str> = prerequisite_chain("top", &catalog)
        .iter()
        .map(|c| c.id.as_str())
        .collect();

    assert_eq!(chain.len(), 3);
    assert_eq!(chain[0], "root");
    assert!(chain.contains(&"left") && chain.contains(&"right"));
}

#[test]
fn unlock_lookup_is_reverse_edges() {
    let catalog = tangled_catalog();
    let unlocked: Vec<&str> = courses_unlocked_by("root", &catalog)
        .iter()
        .map(|c| c.id.as_str())
        .collect();
    assert_eq!(unlocked, vec!["left", "right", "z"]);
}

#[test]
fn order_is_always_a_permutation() {
    let catalog = tangled_catalog();
    let all: Vec<&Course> = catalog.courses().iter().collect();

    // every rotation of the list, including the cyclic members
    for start in 0..all.len() {
        let mut input = all.clone();
        input.rotate_left(start);

        let ordered = order_by_prerequisites(&input);
        assert_eq!(ordered.len(), input.len());

        let mut got: Vec<&str> = ordered.iter().map(|c| c.id.as_str()).collect();
        let mut want: Vec<&str> = input.iter().map(|c| c.id.as_str()).collect();
        got.sort_unstable();
        want.sort_unstable();
        assert_eq!(got, want);
    }
}

#[test]
fn order_places_acyclic_prerequisites_first() {
    let catalog = tangled_catalog();
    let input: Vec<&Course> = ["top", "right", "left", "root"]
        .iter()
        .filter_map(|id| catalog.get_course(id))
        .collect();

    let ordered: Vec<&str> = order_by_prerequisites(&input)
        .iter()
        .map(|c| c.id.as_str())
        .collect();
    let pos = |id: &str| ordered.iter().position(|o| *o == id).unwrap();
    assert!(pos("root") < pos("left"));
    assert!(pos("root") < pos("right"));
    assert!(pos("left") < pos("top"));
    assert!(pos("right") < pos("top"));
}

#[test]
fn completion_example_scores_79_75() {
    let mut c = course("poker", Level::Beginner, &[]);
    c.set_duration(100);
    let assessments: Vec<Assessment> = (1..=4)
        .map(|i| Assessment::new(format!("q{i}"), "poker".to_string(), 70.0))
        .collect();
    let p = scored(
        progress("poker", 90.0, 100),
        &[("q1", 60.0), ("q2", 70.0), ("q3", 80.0)],
    );

    let overall = calculate_overall_completion(&p, &c, &assessments);
    assert!((overall - 79.75).abs() < 1e-9, "got {overall}");
}

#[test]
fn overall_completion_is_monotonic() {
    let mut c = course("poker", Level::Beginner, &[]);
    c.set_duration(90);
    let assessments = vec![
        Assessment::new("q1".to_string(), "poker".to_string(), 70.0),
        Assessment::new("q2".to_string(), "poker".to_string(), 70.0),
    ];

    let mut last = f64::MIN;
    for rate in (0..=12).map(|i| f64::from(i) * 10.0) {
        let v = calculate_overall_completion(
            &scored(progress("poker", rate, 45), &[("q1", 50.0)]),
            &c,
            &assessments,
        );
        assert!(v >= last && (0.0..=100.0).contains(&v));
        last = v;
    }

    let mut last = f64::MIN;
    for score in (0..=10).map(|i| f64::from(i) * 10.0) {
        let v = calculate_overall_completion(
            &scored(progress("poker", 50.0, 45), &[("q1", score), ("q2", score)]),
            &c,
            &assessments,
        );
        assert!(v >= last);
        last = v;
    }

    let mut last = f64::MIN;
    for study in (0..=20).map(|i| i * 10) {
        let v = calculate_overall_completion(
            &scored(progress("poker", 50.0, study), &[]),
            &c,
            &assessments,
        );
        assert!(v >= last);
        last = v;
    }
}

#[test]
fn check_success_matches_its_definition() {
    let mut c = course("c", Level::Advanced, &[]);
    c.set_duration(100);

    let criteria_sets = [
        standard_completion_criteria(&c),
        CompletionCriteria {
            minimum_completion_rate: 70.0,
            required_assessments: vec!["q1".to_string(), "q2".to_string()],
            passing_score: 60.0,
            minimum_study_time: None,
        },
    ];
    let learners = [
        scored(progress("c", 95.0, 95), &[("q1", 90.0), ("q2", 61.0)]),
        scored(progress("c", 95.0, 80), &[("q1", 90.0)]),
        scored(progress("c", 69.0, 200), &[("q1", 59.0), ("q2", 100.0)]),
        scored(progress("c", 100.0, 90), &[("q1", 40.0), ("q1", 75.0), ("q2", 60.0)]),
    ];

    for criteria in &criteria_sets {
        for p in &learners {
            let expected = p.completion_rate >= criteria.minimum_completion_rate
                && criteria.required_assessments.iter().all(|id| {
                    p.test_scores
                        .iter()
                        .any(|s| &s.assessment_id == id && s.percentage >= criteria.passing_score)
                })
                && criteria
                    .minimum_study_time
                    .is_none_or(|min| f64::from(p.study_time_minutes) >= min);

            let result = check_completion(p, &c, &[], criteria);
            assert_eq!(result.success, expected, "{criteria:?} / {}", result.message);
            assert_eq!(result.data.failures.is_empty(), expected);
        }
    }
}

#[test]
fn trend_signs() {
    assert!(calculate_trend(&[70.0, 75.0, 80.0, 85.0, 90.0]) > 0.0);
    assert!(calculate_trend(&[90.0, 85.0, 80.0, 75.0, 70.0]) < 0.0);
    for x in [0.0, 55.5, 100.0] {
        assert!(calculate_trend(&[x]).abs() < f64::EPSILON);
    }
}

#[test]
fn completed_prerequisite_scenario() {
    let a = course("A", Level::Beginner, &[]);
    let b = course("B", Level::Beginner, &["A"]);
    let catalog = Catalog::new(vec![a, b]);

    let mut progress_a = progress("A", 100.0, 30);
    progress_a.completed_at = Some(Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap());

    let check = check_prerequisites(
        catalog.get_course("B").unwrap(),
        &[progress_a],
        &catalog,
    );
    assert!(check.can_enroll);
    assert!(check.missing.is_empty());
}
