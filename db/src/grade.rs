//! Persisted recomputation of instance-question and assessment-instance aggregates.
//!
//! Both functions read the stored state, run the pure arithmetic from the
//! `scoring` crate and write the result back. They are generic over
//! `ConnectionTrait` so callers can run them inside a transaction.

use std::collections::HashSet;

use scoring::aggregate::{recompute_assessment, recompute_question};
use scoring::error::ScoringError;
use scoring::types::{AssessmentScore, QuestionScore};
use sea_orm::{ConnectionTrait, DbErr};
use tracing::{debug, warn};

use crate::models::{assessment_instance, instance_question, submission};

#[derive(Debug)]
pub enum GradeComputationError {
    InstanceQuestionNotFound(i64),
    AssessmentInstanceNotFound(i64),
    /// The instance-question has a maximum of zero. Its aggregate was stored as 0/0.
    ZeroMaxPoints { instance_question_id: i64 },
    Scoring {
        instance_question_id: i64,
        source: ScoringError,
    },
    Database(DbErr),
}

impl From<DbErr> for GradeComputationError {
    fn from(value: DbErr) -> Self {
        GradeComputationError::Database(value)
    }
}

impl std::fmt::Display for GradeComputationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GradeComputationError::InstanceQuestionNotFound(id) => {
                write!(f, "Instance question {id} not found")
            }
            GradeComputationError::AssessmentInstanceNotFound(id) => {
                write!(f, "Assessment instance {id} not found")
            }
            GradeComputationError::ZeroMaxPoints { instance_question_id } => {
                write!(f, "Instance question {instance_question_id} has zero max points")
            }
            GradeComputationError::Scoring {
                instance_question_id,
                source,
            } => write!(f, "Scoring error on instance question {instance_question_id}: {source}"),
            GradeComputationError::Database(e) => write!(f, "Database error: {e}"),
        }
    }
}

impl std::error::Error for GradeComputationError {}

impl GradeComputationError {
    /// Errors that are reported per instance-question without aborting a batch.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GradeComputationError::ZeroMaxPoints { .. } | GradeComputationError::Scoring { .. }
        )
    }
}

/// Recomputes one instance-question from its stored submission history and persists it.
///
/// Only graded submissions contribute. Recorded points are read back unchanged,
/// so a new `max_points` affects the cap and the percentage only.
pub async fn recompute_instance_question<C>(
    db: &C,
    instance_question_id: i64,
) -> Result<QuestionScore, GradeComputationError>
where
    C: ConnectionTrait,
{
    let iq = instance_question::Model::get_by_id(db, instance_question_id)
        .await?
        .ok_or(GradeComputationError::InstanceQuestionNotFound(instance_question_id))?;

    let history = submission::Model::get_by_instance_question_id(db, iq.id).await?;
    let recorded = history.iter().filter_map(|s| s.points);

    match recompute_question(recorded, iq.max_points) {
        Ok(score) => {
            instance_question::Model::update_score(db, iq.id, score).await?;
            debug!(
                instance_question_id = iq.id,
                points = score.points,
                score_perc = score.score_perc,
                "recomputed instance question"
            );
            Ok(score)
        }
        Err(ScoringError::ZeroMaxPoints) => {
            instance_question::Model::update_score(db, iq.id, QuestionScore::default()).await?;
            warn!(instance_question_id = iq.id, "instance question has zero max points");
            Err(GradeComputationError::ZeroMaxPoints {
                instance_question_id: iq.id,
            })
        }
        Err(source) => Err(GradeComputationError::Scoring {
            instance_question_id: iq.id,
            source,
        }),
    }
}

/// Sums every instance-question of the assessment instance against the
/// instance's maximum and persists the aggregate.
pub async fn recompute_assessment_instance<C>(
    db: &C,
    assessment_instance_id: i64,
) -> Result<AssessmentScore, GradeComputationError>
where
    C: ConnectionTrait,
{
    recompute_assessment_instance_excluding(db, assessment_instance_id, &HashSet::new()).await
}

/// Same as [`recompute_assessment_instance`], but instance-questions listed in
/// `excluded` contribute nothing to the sum.
pub async fn recompute_assessment_instance_excluding<C>(
    db: &C,
    assessment_instance_id: i64,
    excluded: &HashSet<i64>,
) -> Result<AssessmentScore, GradeComputationError>
where
    C: ConnectionTrait,
{
    let ai = assessment_instance::Model::get_by_id(db, assessment_instance_id)
        .await?
        .ok_or(GradeComputationError::AssessmentInstanceNotFound(assessment_instance_id))?;
    let iqs = instance_question::Model::get_by_assessment_instance_id(db, ai.id).await?;
    let points = iqs
        .iter()
        .filter(|iq| !excluded.contains(&iq.id))
        .map(|iq| iq.points);

    let score = recompute_assessment(points, ai.max_points);
    assessment_instance::Model::update_score(db, ai.id, &score).await?;

    debug!(
        assessment_instance_id = ai.id,
        points = score.points,
        max_points = score.max_points,
        score_perc = score.score_perc,
        "recomputed assessment instance"
    );
    Ok(score)
}
