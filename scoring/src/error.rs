//! Scoring Error Types

/// Represents all error types that can occur while scoring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoringError {
    /// A percentage was requested against a maximum of zero points.
    ZeroMaxPoints,
    /// A maximum points value was negative or not a finite number.
    InvalidMaxPoints(f64),
    /// A correctness score fell outside `[0, 1]`.
    ScoreOutOfRange(f64),
}

impl std::fmt::Display for ScoringError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoringError::ZeroMaxPoints => write!(f, "Maximum points is zero"),
            ScoringError::InvalidMaxPoints(v) => write!(f, "Invalid maximum points: {v}"),
            ScoringError::ScoreOutOfRange(v) => write!(f, "Score {v} is outside [0, 1]"),
        }
    }
}

impl std::error::Error for ScoringError {}

pub(crate) fn check_max_points(max_points: f64) -> Result<(), ScoringError> {
    if !max_points.is_finite() || max_points < 0.0 {
        return Err(ScoringError::InvalidMaxPoints(max_points));
    }
    Ok(())
}

pub(crate) fn check_score(score: f64) -> Result<(), ScoringError> {
    if !(0.0..=1.0).contains(&score) {
        return Err(ScoringError::ScoreOutOfRange(score));
    }
    Ok(())
}
