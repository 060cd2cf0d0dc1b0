//! # Scorebar
//!
//! Read-only view of a percentage for progress-bar style rendering. The bar
//! width is clamped to `[0, 100]` and floored; the label keeps the real value.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scorebar {
    /// Filled width in whole percent, `0..=100`.
    pub width: u8,
    /// Formatted percentage, e.g. `"46.67%"`.
    pub label: String,
    /// Whether the label belongs inside the filled part (score at least 50%).
    pub label_inside: bool,
}

impl Scorebar {
    /// Builds the bar for `score_perc`. `None` (not yet scored) renders nothing.
    pub fn from_perc(score_perc: Option<f64>) -> Option<Self> {
        let perc = score_perc.filter(|p| p.is_finite())?;
        Some(Self {
            width: perc.clamp(0.0, 100.0).floor() as u8,
            label: format!("{}%", format_points(perc, 2)),
            label_inside: perc >= 50.0,
        })
    }

    /// Width of the unfilled remainder.
    pub fn remainder(&self) -> u8 {
        100 - self.width
    }
}

/// Formats a value with at most `digits` decimals, dropping trailing zeros.
pub fn format_points(value: f64, digits: usize) -> String {
    let s = format!("{value:.digits$}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}
