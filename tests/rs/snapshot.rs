//! End-to-end tests over the bundled sample snapshot

use pathwise::core::analytics::generate_analytics;
use pathwise::core::completion::calculate_overall_completion;
use pathwise::core::loader::{load_snapshot, parse_snapshot, LearningSnapshot};
use pathwise::core::models::Level;
use pathwise::core::path_planner::{
    create_skill_track_paths, generate_learning_path, optimal_sequence,
};
use pathwise::core::prerequisites::{check_prerequisites, validate_catalog};
use pathwise::core::progress_events::evaluate_progress_update;
use pathwise::core::report::{HtmlReporter, MarkdownReporter, ReportContext, ReportGenerator};
use pathwise::core::ProgressionError;
use std::path::Path;
use tempfile::TempDir;

fn sample() -> LearningSnapshot {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("samples/snapshot.json");
    load_snapshot(&path).expect("sample snapshot should load")
}

fn ids<'a>(courses: impl IntoIterator<Item = &'a pathwise::core::models::Course>) -> Vec<&'a str> {
    courses.into_iter().map(|c| c.id.as_str()).collect()
}

#[test]
fn sample_loads_with_lenient_scores() {
    let snapshot = sample();
    assert_eq!(snapshot.catalog.len(), 10);
    assert_eq!(snapshot.users(), vec!["hero", "villain"]);

    let hero = snapshot.progress_for_user("hero").unwrap();
    assert_eq!(hero.len(), 4);

    let hand_rankings = hero.iter().find(|p| p.course_id == "hand-rankings").unwrap();
    assert_eq!(hand_rankings.test_scores.len(), 1);
    assert!(hand_rankings.test_scores[0].skill_breakdown.contains_key("math"));

    let mtt = hero.iter().find(|p| p.course_id == "mtt-intro").unwrap();
    assert!(mtt.test_scores.is_empty());

    assert_eq!(
        snapshot.catalog.get_course("mental-game").map(|c| c.level),
        Some(Level::Unrated)
    );
}

#[test]
fn missing_user_is_an_error() {
    let snapshot = sample();
    let err = snapshot.progress_for_user("fish").unwrap_err();
    assert!(matches!(err, ProgressionError::NoProgressForUser(ref u) if u == "fish"));
    assert_eq!(err.to_string(), "no progress records found for user: fish");
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let err = load_snapshot(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ProgressionError::Io { .. }));
}

#[test]
fn sample_catalog_diagnostics() {
    let diagnostics = validate_catalog(&sample().catalog);
    assert_eq!(
        diagnostics.unresolved,
        vec![("icm-endgames".to_string(), "legacy-bankroll".to_string())]
    );
    assert!(diagnostics.cycle_members.is_empty());
}

#[test]
fn hero_eligibility() {
    let snapshot = sample();
    let hero = snapshot.progress_for_user("hero").unwrap();

    let gto = snapshot.catalog.get_course("gto-foundations").unwrap();
    let check = check_prerequisites(gto, &hero, &snapshot.catalog);
    assert!(!check.can_enroll);
    assert_eq!(ids(&check.missing), vec!["preflop-ranges"]);
    assert_eq!(ids(&check.completed), vec!["hand-rankings"]);

    // the dangling prerequisite does not block
    let icm = snapshot.catalog.get_course("icm-endgames").unwrap();
    let check = check_prerequisites(icm, &hero, &snapshot.catalog);
    assert_eq!(ids(&check.missing), vec!["mtt-intro"]);
}

#[test]
fn hero_progression_paths() {
    let snapshot = sample();
    let hero = snapshot.progress_for_user("hero").unwrap();

    let paths = generate_learning_path("hero", &hero, &snapshot.catalog, None);
    assert_eq!(paths.len(), 2);

    assert_eq!(
        paths[0].current_course.as_ref().map(|c| c.id.as_str()),
        Some("preflop-ranges")
    );
    assert_eq!(
        ids(&paths[0].next_recommended_courses),
        vec!["gto-foundations", "postflop-play"]
    );
    assert_eq!(
        ids(&paths[1].next_recommended_courses),
        vec!["icm-endgames", "sng-mastery"]
    );
    assert_eq!(ids(&paths[0].unlocked_courses), vec!["preflop-ranges", "mtt-intro"]);
}

#[test]
fn villain_recommendations_follow_dependents() {
    let snapshot = sample();
    let villain = snapshot.progress_for_user("villain").unwrap();

    let paths = generate_learning_path("villain", &villain, &snapshot.catalog, None);
    assert_eq!(paths.len(), 1);
    assert!(paths[0].unlocked_courses.is_empty());
    assert_eq!(
        ids(&paths[0].next_recommended_courses),
        vec!["mtt-intro", "preflop-ranges"]
    );
}

#[test]
fn sample_skill_tracks_and_sequence() {
    let snapshot = sample();

    let tracks = create_skill_track_paths(&snapshot.catalog);
    assert_eq!(ids(&tracks[0].courses), vec!["hand-rankings", "poker-basics"]);
    assert_eq!(tracks[0].estimated_time_minutes, 75);
    assert_eq!(ids(&tracks[1].courses), vec!["exploit-play", "gto-foundations"]);
    assert_eq!(tracks[1].estimated_time_minutes, 210);
    assert_eq!(
        ids(&tracks[2].courses),
        vec!["icm-endgames", "mtt-intro", "sng-mastery"]
    );
    assert_eq!(tracks[2].estimated_time_minutes, 75 + 75 + 60);

    let sequence = optimal_sequence(
        Level::Beginner,
        Level::Advanced,
        "tournaments",
        &snapshot.catalog,
    );
    assert_eq!(ids(&sequence), vec!["mtt-intro", "sng-mastery", "icm-endgames"]);
}

#[test]
fn hero_analytics() {
    let snapshot = sample();
    let hero = snapshot.progress_for_user("hero").unwrap();

    let analytics = generate_analytics("hero", &hero, &snapshot.catalog, &snapshot.assessments);

    assert_eq!(analytics.course_progress.total_courses, 4);
    assert_eq!(analytics.course_progress.in_progress_courses, 2);
    assert!((analytics.course_progress.average_completion_rate - 73.75).abs() < 1e-9);

    let perf = &analytics.assessment_performance;
    assert_eq!(perf.total_assessments, 4);
    assert!((perf.average_score - 80.75).abs() < 1e-9);
    assert!((perf.pass_rate - 0.75).abs() < 1e-9);
    assert!((perf.improvement_trend + 4.5).abs() < 1e-9);

    assert_eq!(analytics.study_patterns.total_study_time, 140);
    assert!((analytics.study_patterns.average_session_duration - 35.0).abs() < 1e-9);

    let skills = &analytics.skill_development;
    let strongest: Vec<&str> = skills.strongest_areas.iter().map(|s| s.skill.as_str()).collect();
    assert_eq!(strongest, vec!["reading", "math", "preflop"]);
    assert!(skills.mastered_skills.is_empty());
    assert_eq!(skills.improvement_areas, vec!["math", "preflop"]);
}

#[test]
fn hero_progress_event() {
    let snapshot = sample();
    let hero = snapshot.progress_for_user("hero").unwrap();
    let mut preflop = hero
        .iter()
        .find(|p| p.course_id == "preflop-ranges")
        .cloned()
        .unwrap();

    let course = snapshot.catalog.get_course("preflop-ranges").unwrap();
    let overall = calculate_overall_completion(&preflop, course, &snapshot.assessments);
    assert!((overall - 57.37).abs() < 1e-9);

    let evaluation =
        evaluate_progress_update(&preflop, &hero, &snapshot.catalog, &snapshot.assessments)
            .unwrap();
    assert!(!evaluation.should_mark_completed);
    assert_eq!(evaluation.check.data.failures.len(), 2);

    preflop.completion_rate = 90.0;
    preflop.study_time_minutes = 50;
    let evaluation =
        evaluate_progress_update(&preflop, &hero, &snapshot.catalog, &snapshot.assessments)
            .unwrap();
    assert!(evaluation.should_mark_completed);
    assert_eq!(
        ids(&evaluation.newly_unlocked),
        vec!["postflop-play", "gto-foundations"]
    );
}

#[test]
fn reports_write_to_nested_dirs() {
    let snapshot = sample();
    let hero = snapshot.progress_for_user("hero").unwrap();
    let analytics = generate_analytics("hero", &hero, &snapshot.catalog, &snapshot.assessments);
    let paths = generate_learning_path("hero", &hero, &snapshot.catalog, None);
    let ctx = ReportContext::new("hero", &analytics, &paths);

    let dir = TempDir::new().unwrap();
    let md_path = dir.path().join("reports").join("hero.md");
    let html_path = dir.path().join("reports").join("hero.html");

    MarkdownReporter::new().generate(&ctx, &md_path).unwrap();
    HtmlReporter::new().generate(&ctx, &html_path).unwrap();

    let md = std::fs::read_to_string(md_path).unwrap();
    assert!(md.contains("### Preflop Ranges (65% complete)"));
    assert!(md.contains("(declining)"));

    let html = std::fs::read_to_string(html_path).unwrap();
    assert!(html.contains("<h3>MTT Fundamentals (30% complete)</h3>"));
}

#[test]
fn parse_rejects_missing_required_fields() {
    let err = parse_snapshot(r#"{"courses": [{"title": "No id"}]}"#).unwrap_err();
    assert!(matches!(err, ProgressionError::Parse(_)));
}
