//! Per-assessment configuration stored as JSON beside the assessment's files,
//! and the configuration deltas that drive a regrade.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use crate::paths::{config_dir, config_path, ensure_parent_dir};

#[derive(Debug, thiserror::Error)]
pub enum AssessmentConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to write config file at {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid config JSON format: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid assessment config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AssessmentType {
    Homework, // value ladder on repeated correct answers
    Exam,     // points proportional to the graded score
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct QuestionConfig {
    pub qid: String,

    #[serde(default)]
    pub title: String,

    pub max_points: f64,

    /// Points credited for the first correct answer on a homework question.
    /// Ignored for exams.
    #[serde(default)]
    pub init_points: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AssessmentConfig {
    pub title: String,

    #[serde(default = "default_assessment_type")]
    pub assessment_type: AssessmentType,

    /// Total possible points. `None` means the sum of the question maxima.
    #[serde(default)]
    pub max_points: Option<f64>,

    /// If false, students may save answers but grading requests are refused.
    #[serde(default = "default_allow_real_time_grading")]
    pub allow_real_time_grading: bool,

    #[serde(default)]
    pub questions: Vec<QuestionConfig>,
}

impl AssessmentConfig {
    /// Total possible points, falling back to the sum of the question maxima.
    pub fn effective_max_points(&self) -> f64 {
        self.max_points
            .unwrap_or_else(|| self.questions.iter().map(|q| q.max_points).sum())
    }

    pub fn validate(&self) -> Result<(), AssessmentConfigError> {
        if self.title.trim().is_empty() {
            return Err(AssessmentConfigError::Invalid("title must not be empty".into()));
        }
        if let Some(max) = self.max_points {
            check_points("assessment max_points", max)?;
        }

        let mut seen = HashSet::new();
        for q in &self.questions {
            if q.qid.trim().is_empty() {
                return Err(AssessmentConfigError::Invalid("question qid must not be empty".into()));
            }
            if !seen.insert(q.qid.as_str()) {
                return Err(AssessmentConfigError::Invalid(format!(
                    "duplicate question qid '{}'",
                    q.qid
                )));
            }
            check_points(&format!("max_points of '{}'", q.qid), q.max_points)?;
            if let Some(init) = q.init_points {
                check_points(&format!("init_points of '{}'", q.qid), init)?;
                if init > q.max_points {
                    return Err(AssessmentConfigError::Invalid(format!(
                        "init_points of '{}' exceeds its max_points",
                        q.qid
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn load(root: &Path, assessment_id: i64) -> Result<Self, AssessmentConfigError> {
        let path = config_path(root, assessment_id);
        let contents = fs::read_to_string(&path).map_err(|source| AssessmentConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let cfg: AssessmentConfig = serde_json::from_str(&contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path, assessment_id: i64) -> Result<(), AssessmentConfigError> {
        let path = config_path(root, assessment_id);
        ensure_parent_dir(&path).map_err(|source| AssessmentConfigError::Write {
            path: config_dir(root, assessment_id).display().to_string(),
            source,
        })?;
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json).map_err(|source| AssessmentConfigError::Write {
            path: path.display().to_string(),
            source,
        })
    }
}

/// Configuration changes applied at the start of a regrade.
///
/// Question maxima are keyed by qid. Anything absent is left as it is.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ConfigChanges {
    #[serde(default)]
    pub assessment_max_points: Option<f64>,

    #[serde(default)]
    pub question_max_points: BTreeMap<String, f64>,
}

impl ConfigChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_assessment_max_points(mut self, max_points: f64) -> Self {
        self.assessment_max_points = Some(max_points);
        self
    }

    pub fn with_question_max_points(mut self, qid: impl Into<String>, max_points: f64) -> Self {
        self.question_max_points.insert(qid.into(), max_points);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.assessment_max_points.is_none() && self.question_max_points.is_empty()
    }

    pub fn validate(&self) -> Result<(), AssessmentConfigError> {
        if let Some(max) = self.assessment_max_points {
            check_points("assessment max_points", max)?;
        }
        for (qid, max) in &self.question_max_points {
            check_points(&format!("max_points of '{qid}'"), *max)?;
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, AssessmentConfigError> {
        let changes: ConfigChanges = serde_json::from_str(json)?;
        changes.validate()?;
        Ok(changes)
    }
}

fn check_points(what: &str, value: f64) -> Result<(), AssessmentConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AssessmentConfigError::Invalid(format!(
            "{what} must be a non-negative number, got {value}"
        )));
    }
    Ok(())
}

//Default Functions

fn default_assessment_type() -> AssessmentType {
    AssessmentType::Exam
}

fn default_allow_real_time_grading() -> bool {
    true
}
