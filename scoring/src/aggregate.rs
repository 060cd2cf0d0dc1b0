//! # Aggregate Module
//!
//! Recomputes question and assessment aggregates from stored values. These
//! functions are deterministic: the same history and maxima always produce the
//! same result, which is what makes a regrade idempotent.

use crate::error::{ScoringError, check_max_points};
use crate::types::{AssessmentScore, QuestionScore};

/// Helper to compute percentage safely.
pub fn percentage(earned: f64, total: f64) -> f64 {
    if total <= 0.0 {
        0.0
    } else {
        (earned * 100.0) / total
    }
}

/// Recomputes an instance-question from the points recorded on its graded submissions.
///
/// The best recorded value wins and is capped at `max_points`. Recorded values
/// are used as-is: a later change of `max_points` only affects the cap and the
/// percentage. An empty history scores zero.
///
/// # Errors
///
/// - `ZeroMaxPoints` when `max_points` is zero. The caller should persist
///   `QuestionScore::default()` (zero points, zero percent) and report it.
/// - `InvalidMaxPoints` when `max_points` is negative or not finite.
pub fn recompute_question<I>(recorded_points: I, max_points: f64) -> Result<QuestionScore, ScoringError>
where
    I: IntoIterator<Item = f64>,
{
    check_max_points(max_points)?;
    if max_points == 0.0 {
        return Err(ScoringError::ZeroMaxPoints);
    }

    let best = recorded_points
        .into_iter()
        .filter(|p| p.is_finite())
        .fold(0.0_f64, f64::max);
    let points = best.min(max_points);

    Ok(QuestionScore {
        points,
        score_perc: percentage(points, max_points),
    })
}

/// Sums question points into the assessment aggregate.
///
/// `points` is the exact sum and `score_perc` is left unclamped so that
/// over-scoring stays visible. The credited values cap the sum to
/// `[0, max_points]`. A zero maximum yields zero percentages.
pub fn recompute_assessment<I>(question_points: I, max_points: f64) -> AssessmentScore
where
    I: IntoIterator<Item = f64>,
{
    let points: f64 = question_points.into_iter().sum();
    let credited_points = points.min(max_points).max(0.0);

    AssessmentScore {
        max_points,
        points,
        score_perc: percentage(points, max_points),
        credited_points,
        credited_score_perc: percentage(credited_points, max_points),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_guards_zero_total() {
        assert_eq!(percentage(5.0, 0.0), 0.0);
        assert_eq!(percentage(3.0, 12.0), 25.0);
    }

    #[test]
    fn best_submission_wins_not_last() {
        let score = recompute_question([2.0, 0.0, 4.0, 1.0], 11.0).unwrap();
        assert_eq!(score.points, 4.0);
        assert!((score.score_perc - 400.0 / 11.0).abs() < 1e-9);
    }

    #[test]
    fn best_is_capped_at_new_max_without_rescaling_history() {
        // recorded under a max of 11, question later reduced to 5
        let score = recompute_question([2.0, 4.0, 8.0, 11.0], 5.0).unwrap();
        assert_eq!(score.points, 5.0);
        assert_eq!(score.score_perc, 100.0);

        // raised to 20: history stays at 11
        let score = recompute_question([2.0, 4.0, 8.0, 11.0], 20.0).unwrap();
        assert_eq!(score.points, 11.0);
        assert_eq!(score.score_perc, 55.0);
    }

    #[test]
    fn empty_history_scores_zero() {
        let score = recompute_question(std::iter::empty(), 7.0).unwrap();
        assert_eq!(score, QuestionScore::default());
    }

    #[test]
    fn zero_max_points_is_an_error_not_nan() {
        assert_eq!(
            recompute_question([1.0], 0.0),
            Err(ScoringError::ZeroMaxPoints)
        );
        assert_eq!(
            recompute_question([1.0], -2.0),
            Err(ScoringError::InvalidMaxPoints(-2.0))
        );
    }

    #[test]
    fn assessment_sum_is_exact_and_unclamped() {
        let score = recompute_assessment([1.0, 11.0, 12.0], 30.0);
        assert_eq!(score.points, 24.0);
        assert_eq!(score.score_perc, 80.0);
        assert_eq!(score.credited_points, 24.0);

        let score = recompute_assessment([1.0, 11.0, 12.0], 13.0);
        assert_eq!(score.points, 24.0);
        assert!(score.score_perc > 100.0);
        assert_eq!(score.credited_points, 13.0);
        assert_eq!(score.credited_score_perc, 100.0);
    }

    #[test]
    fn assessment_with_zero_max_reports_zero_percent() {
        let score = recompute_assessment([3.0], 0.0);
        assert_eq!(score.points, 3.0);
        assert_eq!(score.score_perc, 0.0);
        assert_eq!(score.credited_points, 0.0);
    }
}
