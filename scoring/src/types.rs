//! # Types Module
//!
//! Data passed into and returned from the scoring functions.

use serde::Serialize;

/// How a graded submission turns into recorded points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoringMode {
    /// `points = score × max_points`.
    Flat,
    /// Homework value ladder. Each consecutive fully-correct answer is worth
    /// `init_points` more than the previous one, up to the question maximum.
    Ladder { init_points: f64 },
}

/// The mutable per-question state the award policy reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuestionState {
    /// Current maximum points of the instance-question.
    pub max_points: f64,
    /// Points currently awarded to the instance-question.
    pub points: f64,
    /// Value of the next fully-correct answer (ladder mode only).
    pub current_value: f64,
}

/// Outcome of grading one submission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Award {
    /// Points to record on the submission.
    pub points: f64,
    /// Ladder value to store for the next submission.
    pub next_value: f64,
}

/// Aggregate for one instance-question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct QuestionScore {
    pub points: f64,
    pub score_perc: f64,
}

/// Aggregate for one assessment instance.
///
/// `points` and `score_perc` are exact and unclamped. `credited_*` cap the
/// sum at the assessment maximum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AssessmentScore {
    pub max_points: f64,
    pub points: f64,
    pub score_perc: f64,
    pub credited_points: f64,
    pub credited_score_perc: f64,
}
