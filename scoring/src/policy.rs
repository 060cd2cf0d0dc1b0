//! # Award Policy
//!
//! Decides how many points a freshly graded submission records. The recorded
//! value is what later recomputes and regrades read back; it is never rescaled.

use crate::error::{ScoringError, check_max_points, check_score};
use crate::types::{Award, QuestionState, ScoringMode};

/// Computes the points to record for a submission graded with `score`.
///
/// - `Flat`: `score × max_points`.
/// - `Ladder`: a fully-correct answer adds `current_value` to the question's
///   current points and raises the value by `init_points`. Anything less adds
///   `score × current_value` and resets the value to `init_points`. Both are
///   capped at `max_points`.
///
/// # Errors
///
/// `ScoreOutOfRange` if `score` is not in `[0, 1]`, `InvalidMaxPoints` if the
/// question maximum is negative or not finite.
pub fn award(mode: ScoringMode, state: QuestionState, score: f64) -> Result<Award, ScoringError> {
    check_score(score)?;
    check_max_points(state.max_points)?;

    let max = state.max_points;
    let base = state.points.clamp(0.0, max);

    let award = match mode {
        ScoringMode::Flat => Award {
            points: score * max,
            next_value: state.current_value,
        },
        ScoringMode::Ladder { init_points } => {
            if score >= 1.0 {
                Award {
                    points: (base + state.current_value).min(max),
                    next_value: (state.current_value + init_points).min(max),
                }
            } else {
                Award {
                    points: (base + score * state.current_value).min(max),
                    next_value: init_points.min(max),
                }
            }
        }
    };

    Ok(award)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ladder_run(max_points: f64, init_points: f64, scores: &[f64]) -> Vec<f64> {
        let mode = ScoringMode::Ladder { init_points };
        let mut state = QuestionState {
            max_points,
            points: 0.0,
            current_value: init_points,
        };
        let mut recorded = Vec::new();
        for &s in scores {
            let a = award(mode, state, s).unwrap();
            state.points = state.points.max(a.points);
            state.current_value = a.next_value;
            recorded.push(a.points);
        }
        recorded
    }

    #[test]
    fn flat_award_is_score_times_max() {
        let state = QuestionState {
            max_points: 8.0,
            points: 6.0,
            current_value: 8.0,
        };
        let a = award(ScoringMode::Flat, state, 0.25).unwrap();
        assert_eq!(a.points, 2.0);
        assert_eq!(a.next_value, 8.0);
    }

    #[test]
    fn ladder_climbs_and_resets_like_the_homework_suite() {
        // addVectors: max 11, init 2. correct, incorrect, correct x4
        let recorded = ladder_run(11.0, 2.0, &[1.0, 0.0, 1.0, 1.0, 1.0, 1.0]);
        assert_eq!(recorded, vec![2.0, 2.0, 4.0, 8.0, 11.0, 11.0]);
    }

    #[test]
    fn ladder_for_fossil_fuels() {
        // fossilFuelsRadio: max 14, init 3.
        let recorded = ladder_run(14.0, 3.0, &[1.0, 1.0, 0.0, 1.0, 0.0]);
        assert_eq!(recorded, vec![3.0, 9.0, 9.0, 12.0, 12.0]);
    }

    #[test]
    fn ladder_partial_credit_uses_current_value_and_resets() {
        let mode = ScoringMode::Ladder { init_points: 2.0 };
        let state = QuestionState {
            max_points: 10.0,
            points: 4.0,
            current_value: 6.0,
        };
        let a = award(mode, state, 0.5).unwrap();
        assert_eq!(a.points, 7.0);
        assert_eq!(a.next_value, 2.0);
    }

    #[test]
    fn out_of_range_score_is_rejected() {
        let state = QuestionState {
            max_points: 1.0,
            points: 0.0,
            current_value: 1.0,
        };
        assert_eq!(
            award(ScoringMode::Flat, state, 1.5),
            Err(ScoringError::ScoreOutOfRange(1.5))
        );
        assert!(award(ScoringMode::Flat, state, -0.1).is_err());
    }

    #[test]
    fn zero_max_points_awards_nothing() {
        let state = QuestionState {
            max_points: 0.0,
            points: 0.0,
            current_value: 0.0,
        };
        let a = award(ScoringMode::Ladder { init_points: 0.0 }, state, 1.0).unwrap();
        assert_eq!(a.points, 0.0);
    }
}
