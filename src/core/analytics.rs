//! Learner history summaries: completion counts, score trend, study
//! consistency and skill strengths

use crate::core::completion::calculate_overall_completion;
use crate::core::models::{Assessment, Catalog, TestScore, UserProgress};
use crate::debug;
use serde::Serialize;
use std::collections::BTreeMap;

/// Percentage at or above which an attempt counts as passed
pub const PASSING_PERCENTAGE: f64 = 70.0;
/// Number of most recent attempts used for the improvement trend
pub const TREND_WINDOW: usize = 10;
/// Average at or above which a skill counts as mastered
pub const MASTERY_THRESHOLD: f64 = 90.0;
/// Lower bound (inclusive) of the improvement band
pub const IMPROVEMENT_FLOOR: f64 = 60.0;
/// Upper bound (exclusive) of the improvement band
pub const IMPROVEMENT_CEILING: f64 = 80.0;
/// Number of skills reported as strongest and as weakest
pub const TOP_SKILL_COUNT: usize = 3;

/// Course completion counts
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CourseProgressSummary {
    /// Number of progress records
    pub total_courses: usize,
    /// Courses whose overall completion reached 100
    pub completed_courses: usize,
    /// Courses with `0 < completion_rate < 100`
    pub in_progress_courses: usize,
    /// Mean content completion rate
    pub average_completion_rate: f64,
}

/// Assessment attempt statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssessmentPerformance {
    /// Number of attempts across all courses
    pub total_assessments: usize,
    /// Mean attempt percentage
    pub average_score: f64,
    /// Fraction of attempts at or above [`PASSING_PERCENTAGE`] (0-1)
    pub pass_rate: f64,
    /// Slope of the most recent scores; positive means improving
    pub improvement_trend: f64,
}

/// Study-time statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StudyPatterns {
    /// Total study time in minutes
    pub total_study_time: u64,
    /// Study time per course in minutes
    pub average_session_duration: f64,
    /// `1 - coefficient of variation` of per-course study time, floored at 0
    pub consistency_score: f64,
}

/// Average percentage for one skill
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillAverage {
    /// Skill name
    pub skill: String,
    /// Mean percentage across every attempt that scored the skill
    pub average: f64,
}

/// Skill strengths and weaknesses
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SkillDevelopment {
    /// Highest-averaging skills, strongest first
    pub strongest_areas: Vec<SkillAverage>,
    /// Lowest-averaging skills, weakest first
    pub weakest_areas: Vec<SkillAverage>,
    /// Skills averaging at least [`MASTERY_THRESHOLD`]
    pub mastered_skills: Vec<String>,
    /// Skills averaging within the improvement band
    pub improvement_areas: Vec<String>,
}

/// Full analytics summary for one learner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearningAnalytics {
    /// Learner id
    pub user_id: String,
    /// Course completion counts
    pub course_progress: CourseProgressSummary,
    /// Assessment attempt statistics
    pub assessment_performance: AssessmentPerformance,
    /// Study-time statistics
    pub study_patterns: StudyPatterns,
    /// Skill strengths and weaknesses
    pub skill_development: SkillDevelopment,
}

/// Summarize a learner's history
///
/// # Arguments
/// * `user_id` - Learner the progress records belong to
/// * `progress` - The learner's progress records
/// * `catalog` - Course catalog, used for overall completion
/// * `assessments` - Assessment definitions for the catalog's courses
#[must_use]
pub fn generate_analytics(
    user_id: &str,
    progress: &[UserProgress],
    catalog: &Catalog,
    assessments: &[Assessment],
) -> LearningAnalytics {
    debug!("{user_id}: analysing {} progress record(s)", progress.len());

    let scores: Vec<&TestScore> = progress.iter().flat_map(|p| &p.test_scores).collect();

    LearningAnalytics {
        user_id: user_id.to_string(),
        course_progress: course_progress(progress, catalog, assessments),
        assessment_performance: assessment_performance(&scores),
        study_patterns: study_patterns(progress),
        skill_development: skill_development(&scores),
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    values.sum::<f64>() / n as f64
}

fn course_progress(
    progress: &[UserProgress],
    catalog: &Catalog,
    assessments: &[Assessment],
) -> CourseProgressSummary {
    let completed_courses = progress
        .iter()
        .filter(|p| {
            catalog.get_course(&p.course_id).map_or_else(
                || p.is_completed(),
                |course| calculate_overall_completion(p, course, assessments) >= 100.0,
            )
        })
        .count();

    CourseProgressSummary {
        total_courses: progress.len(),
        completed_courses,
        in_progress_courses: progress
            .iter()
            .filter(|p| p.completion_rate > 0.0 && p.completion_rate < 100.0)
            .count(),
        average_completion_rate: mean(progress.iter().map(|p| p.completion_rate)),
    }
}

#[allow(clippy::cast_precision_loss)]
fn assessment_performance(scores: &[&TestScore]) -> AssessmentPerformance {
    if scores.is_empty() {
        return AssessmentPerformance::default();
    }

    let passed = scores
        .iter()
        .filter(|s| s.percentage >= PASSING_PERCENTAGE)
        .count();

    let mut chronological = scores.to_vec();
    chronological.sort_by_key(|s| s.completed_at);
    let recent: Vec<f64> = chronological
        .iter()
        .skip(chronological.len().saturating_sub(TREND_WINDOW))
        .map(|s| s.percentage)
        .collect();

    AssessmentPerformance {
        total_assessments: scores.len(),
        average_score: mean(scores.iter().map(|s| s.percentage)),
        pass_rate: passed as f64 / scores.len() as f64,
        improvement_trend: calculate_trend(&recent),
    }
}

fn study_patterns(progress: &[UserProgress]) -> StudyPatterns {
    let total_study_time: u64 = progress
        .iter()
        .map(|p| u64::from(p.study_time_minutes))
        .sum();

    #[allow(clippy::cast_precision_loss)]
    let average_session_duration = if progress.is_empty() {
        0.0
    } else {
        total_study_time as f64 / progress.len() as f64
    };

    let samples: Vec<f64> = progress
        .iter()
        .filter(|p| p.study_time_minutes > 0)
        .map(|p| f64::from(p.study_time_minutes))
        .collect();

    StudyPatterns {
        total_study_time,
        average_session_duration,
        consistency_score: consistency_score(&samples),
    }
}

/// `1 - CV` over nonzero samples, floored at 0
///
/// One sample scores 0.5 and no samples score 0.
fn consistency_score(samples: &[f64]) -> f64 {
    match samples.len() {
        0 => 0.0,
        1 => 0.5,
        _ => {
            let avg = mean(samples.iter().copied());
            let variance = mean(samples.iter().map(|x| (x - avg).powi(2)));
            let cv = variance.sqrt() / avg;
            (1.0 - cv).max(0.0)
        }
    }
}

fn skill_development(scores: &[&TestScore]) -> SkillDevelopment {
    let mut totals: BTreeMap<&str, (f64, u32)> = BTreeMap::new();
    for score in scores {
        for (skill, value) in &score.skill_breakdown {
            let entry = totals.entry(skill.as_str()).or_insert((0.0, 0));
            entry.0 += value.percentage;
            entry.1 += 1;
        }
    }

    let mut averages: Vec<SkillAverage> = totals
        .into_iter()
        .map(|(skill, (sum, count))| SkillAverage {
            skill: skill.to_string(),
            average: sum / f64::from(count),
        })
        .collect();
    averages.sort_by(|a, b| {
        b.average
            .total_cmp(&a.average)
            .then_with(|| a.skill.cmp(&b.skill))
    });

    SkillDevelopment {
        strongest_areas: averages.iter().take(TOP_SKILL_COUNT).cloned().collect(),
        weakest_areas: averages.iter().rev().take(TOP_SKILL_COUNT).cloned().collect(),
        mastered_skills: skills_where(&averages, |avg| avg >= MASTERY_THRESHOLD),
        improvement_areas: skills_where(&averages, |avg| {
            (IMPROVEMENT_FLOOR..IMPROVEMENT_CEILING).contains(&avg)
        }),
    }
}

fn skills_where(averages: &[SkillAverage], keep: impl Fn(f64) -> bool) -> Vec<String> {
    averages
        .iter()
        .filter(|s| keep(s.average))
        .map(|s| s.skill.clone())
        .collect()
}

/// Least-squares slope of `scores` against their index
///
/// Positive means improving, negative declining. Fewer than two points give 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn calculate_trend(scores: &[f64]) -> f64 {
    if scores.len() < 2 {
        return 0.0;
    }

    let n = scores.len() as f64;
    let (sum_x, sum_y, sum_xy, sum_xx) = scores.iter().enumerate().fold(
        (0.0, 0.0, 0.0, 0.0),
        |(sx, sy, sxy, sxx), (i, &y)| {
            let x = i as f64;
            (sx + x, sy + y, x.mul_add(y, sxy), x.mul_add(x, sxx))
        },
    );

    let denominator = n.mul_add(sum_xx, -(sum_x * sum_x));
    if denominator == 0.0 {
        return 0.0;
    }
    n.mul_add(sum_xy, -(sum_x * sum_y)) / denominator
}
