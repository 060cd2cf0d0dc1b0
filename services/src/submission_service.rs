//! Submission store.
//!
//! Every answer is appended to the history of its instance-question. A graded
//! answer records its points through the award policy and then refreshes the
//! question and assessment aggregates. All of it happens under the
//! instance-question lock and inside one transaction.

use std::sync::Arc;

use db::grade::{self, GradeComputationError};
use db::models::{assessment, assessment_instance, assessment_question, instance_question, submission};
use scoring::policy::award;
use scoring::types::{AssessmentScore, QuestionScore, ScoringMode};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use serde_json::Value;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::error::{ServiceError, ServiceResult};
use crate::locks::InstanceQuestionLocks;
use crate::validation::{AnswerValidator, NonEmptyObjectValidator};

/// A request to append one answer.
///
/// `score` is the correctness reported by the grader. `None` saves the answer
/// without grading it.
#[derive(Debug, Clone, Validate)]
pub struct RecordSubmission {
    pub instance_question_id: i64,
    pub submitted_answer: Value,
    #[validate(range(min = 0.0, max = 1.0, message = "Score must be between 0 and 1"))]
    pub score: Option<f64>,
}

impl RecordSubmission {
    pub fn graded(instance_question_id: i64, submitted_answer: Value, score: f64) -> Self {
        Self {
            instance_question_id,
            submitted_answer,
            score: Some(score),
        }
    }

    pub fn saved(instance_question_id: i64, submitted_answer: Value) -> Self {
        Self {
            instance_question_id,
            submitted_answer,
            score: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub submission: submission::Model,
    pub question: QuestionScore,
    pub assessment: AssessmentScore,
}

pub struct SubmissionService {
    db: DatabaseConnection,
    locks: InstanceQuestionLocks,
    validator: Arc<dyn AnswerValidator>,
}

impl SubmissionService {
    pub fn new(db: DatabaseConnection, locks: InstanceQuestionLocks) -> Self {
        Self::with_validator(db, locks, Arc::new(NonEmptyObjectValidator))
    }

    pub fn with_validator(
        db: DatabaseConnection,
        locks: InstanceQuestionLocks,
        validator: Arc<dyn AnswerValidator>,
    ) -> Self {
        Self { db, locks, validator }
    }

    pub async fn record_submission(&self, request: RecordSubmission) -> ServiceResult<SubmissionOutcome> {
        request
            .validate()
            .map_err(|e| ServiceError::InvalidAnswer(e.to_string()))?;
        if request.score.is_some_and(|s| !s.is_finite()) {
            return Err(ServiceError::InvalidAnswer("Score must be a finite number".into()));
        }

        let _guard = self.locks.try_acquire(request.instance_question_id)?;

        let txn = self.db.begin().await?;
        match self.record_in_txn(&txn, &request).await {
            Ok(outcome) => {
                txn.commit().await?;
                info!(
                    instance_question_id = request.instance_question_id,
                    submission_id = outcome.submission.id,
                    graded = request.score.is_some(),
                    points = outcome.question.points,
                    "recorded submission"
                );
                Ok(outcome)
            }
            Err(err) => {
                if let Err(rollback_err) = txn.rollback().await {
                    warn!(error = %rollback_err, "rollback failed");
                }
                debug!(
                    instance_question_id = request.instance_question_id,
                    error = %err,
                    "submission rejected"
                );
                Err(err)
            }
        }
    }

    async fn record_in_txn(
        &self,
        txn: &DatabaseTransaction,
        request: &RecordSubmission,
    ) -> ServiceResult<SubmissionOutcome> {
        let iq_id = request.instance_question_id;
        let iq = instance_question::Model::get_by_id(txn, iq_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Instance question {iq_id}")))?;
        let ai = assessment_instance::Model::get_by_id(txn, iq.assessment_instance_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Assessment instance {}", iq.assessment_instance_id)))?;
        let assessment = assessment::Model::get_by_id(txn, ai.assessment_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Assessment {}", ai.assessment_id)))?;

        if request.score.is_some() && !assessment.allow_real_time_grading {
            return Err(ServiceError::GradingDisabled {
                assessment_id: assessment.id,
            });
        }

        self.validator
            .validate(&iq, &request.submitted_answer)
            .map_err(ServiceError::InvalidAnswer)?;

        let Some(score) = request.score else {
            let submission =
                submission::Model::create(txn, iq.id, &request.submitted_answer, None, None).await?;
            return Ok(SubmissionOutcome {
                submission,
                question: QuestionScore {
                    points: iq.points,
                    score_perc: iq.score_perc,
                },
                assessment: ai.score(),
            });
        };

        let question = assessment_question::Model::get_by_id(txn, iq.assessment_question_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Assessment question {}", iq.assessment_question_id)))?;

        let mode = match question.init_points {
            Some(init_points) if assessment.is_homework() => ScoringMode::Ladder { init_points },
            _ => ScoringMode::Flat,
        };
        let awarded = award(mode, iq.state(), score).map_err(|source| GradeComputationError::Scoring {
            instance_question_id: iq.id,
            source,
        })?;

        let submission = submission::Model::create(
            txn,
            iq.id,
            &request.submitted_answer,
            Some(score),
            Some(awarded.points),
        )
        .await?;
        instance_question::Model::record_attempt(txn, iq.id, awarded.next_value).await?;

        let question_score = match grade::recompute_instance_question(txn, iq.id).await {
            Ok(s) => s,
            Err(GradeComputationError::ZeroMaxPoints { .. }) => QuestionScore::default(),
            Err(e) => return Err(e.into()),
        };
        let assessment_score = grade::recompute_assessment_instance(txn, ai.id).await?;

        debug!(
            instance_question_id = iq.id,
            score,
            recorded_points = awarded.points,
            next_value = awarded.next_value,
            "graded submission"
        );

        Ok(SubmissionOutcome {
            submission,
            question: question_score,
            assessment: assessment_score,
        })
    }
}
