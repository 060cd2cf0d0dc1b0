//! Regrade Orchestrator
//!
//! Applies configuration changes and recomputes aggregates from the stored
//! submission history. Grading code is never re-run and the history is never
//! modified. One instance regrade runs in a single transaction while holding
//! the lock of every instance-question it touches, so readers observe either
//! the pre- or the post-regrade state.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use db::grade::{self, GradeComputationError};
use db::models::{assessment, assessment_instance, assessment_question, instance_question};
use scoring::types::{AssessmentScore, QuestionScore};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{error, info, warn};
use util::assessment_config::{AssessmentConfigError, ConfigChanges};

use crate::error::{ServiceError, ServiceResult};
use crate::locks::InstanceQuestionLocks;

/// Lifecycle of a regrade for one assessment instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RegradeState {
    Idle,
    Running,
    /// The pass finished and was committed, possibly with per-question failures.
    Completed,
    /// The pass aborted and was rolled back.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RegradeStatus {
    Completed,
    PartialFailure,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegradeFailure {
    pub instance_question_id: i64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegradedQuestion {
    pub instance_question_id: i64,
    pub qid: String,
    pub max_points: f64,
    pub score: QuestionScore,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegradeResult {
    pub assessment_instance_id: i64,
    pub status: RegradeStatus,
    pub questions: Vec<RegradedQuestion>,
    pub assessment: AssessmentScore,
    pub failures: Vec<RegradeFailure>,
}

impl RegradeResult {
    pub fn failed_instance_question_ids(&self) -> Vec<i64> {
        self.failures.iter().map(|f| f.instance_question_id).collect()
    }

    /// Turns a partial failure into `ServiceError::RegradePartialFailure`.
    pub fn into_result(self) -> ServiceResult<Self> {
        match self.status {
            RegradeStatus::Completed => Ok(self),
            RegradeStatus::PartialFailure => Err(ServiceError::RegradePartialFailure {
                assessment_instance_id: self.assessment_instance_id,
                failed: self.failed_instance_question_ids(),
            }),
        }
    }
}

/// An instance a whole-assessment regrade could not regrade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedInstance {
    pub assessment_instance_id: i64,
    /// Rejected because a question was locked by a record or another regrade.
    pub busy: bool,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentRegradeReport {
    pub assessment_id: i64,
    pub results: Vec<RegradeResult>,
    pub skipped: Vec<SkippedInstance>,
}

impl AssessmentRegradeReport {
    /// True when every instance was regraded without per-question failures.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty() && self.results.iter().all(|r| r.status == RegradeStatus::Completed)
    }

    pub fn skipped_instance_ids(&self) -> Vec<i64> {
        self.skipped.iter().map(|s| s.assessment_instance_id).collect()
    }

    pub fn result_for(&self, assessment_instance_id: i64) -> Option<&RegradeResult> {
        self.results
            .iter()
            .find(|r| r.assessment_instance_id == assessment_instance_id)
    }
}

pub struct RegradeOrchestrator {
    db: DatabaseConnection,
    locks: InstanceQuestionLocks,
    states: Arc<RwLock<HashMap<i64, RegradeState>>>,
}

impl RegradeOrchestrator {
    pub fn new(db: DatabaseConnection, locks: InstanceQuestionLocks) -> Self {
        Self {
            db,
            locks,
            states: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// State of the most recent regrade of the instance. `Idle` if it was never regraded.
    pub async fn state(&self, assessment_instance_id: i64) -> RegradeState {
        self.states
            .read()
            .await
            .get(&assessment_instance_id)
            .copied()
            .unwrap_or(RegradeState::Idle)
    }

    async fn set_state(&self, assessment_instance_id: i64, state: RegradeState) {
        self.states.write().await.insert(assessment_instance_id, state);
    }

    /// Applies `changes` to one assessment instance and recomputes every
    /// instance-question and then the instance total.
    ///
    /// A question that fails to recompute is reported in the result and left
    /// out of the total. Any other error rolls the whole pass back.
    pub async fn regrade_assessment_instance(
        &self,
        assessment_instance_id: i64,
        changes: &ConfigChanges,
    ) -> ServiceResult<RegradeResult> {
        changes.validate()?;

        if assessment_instance::Model::get_by_id(&self.db, assessment_instance_id)
            .await?
            .is_none()
        {
            return Err(ServiceError::NotFound(format!("Assessment instance {assessment_instance_id}")));
        }
        let iq_ids: Vec<i64> = instance_question::Model::get_by_assessment_instance_id(&self.db, assessment_instance_id)
            .await?
            .iter()
            .map(|iq| iq.id)
            .collect();

        let _guards = self.locks.try_acquire_all(&iq_ids)?;
        self.set_state(assessment_instance_id, RegradeState::Running).await;

        let outcome = self.run_in_transaction(assessment_instance_id, changes).await;
        match &outcome {
            Ok(result) => {
                self.set_state(assessment_instance_id, RegradeState::Completed).await;
                if result.status == RegradeStatus::PartialFailure {
                    warn!(
                        assessment_instance_id,
                        failed = ?result.failed_instance_question_ids(),
                        "regrade completed with failures"
                    );
                } else {
                    info!(
                        assessment_instance_id,
                        points = result.assessment.points,
                        max_points = result.assessment.max_points,
                        "regrade completed"
                    );
                }
            }
            Err(err) => {
                self.set_state(assessment_instance_id, RegradeState::Failed).await;
                error!(assessment_instance_id, error = %err, "regrade failed");
            }
        }
        outcome
    }

    async fn run_in_transaction(
        &self,
        assessment_instance_id: i64,
        changes: &ConfigChanges,
    ) -> ServiceResult<RegradeResult> {
        let txn = self.db.begin().await?;
        match regrade_in_txn(&txn, assessment_instance_id, changes).await {
            Ok(result) => {
                txn.commit().await?;
                Ok(result)
            }
            Err(err) => {
                if let Err(rollback_err) = txn.rollback().await {
                    warn!(error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }

    /// Applies `changes` to the assessment and its questions, then regrades
    /// every instance of the assessment.
    ///
    /// The configuration update is committed before the instances are
    /// regraded. An instance that cannot be regraded (e.g. one of its
    /// questions is busy) is reported in `skipped` and the pass moves on.
    /// Running the same call again regrades what was skipped.
    pub async fn regrade_assessment(
        &self,
        assessment_id: i64,
        changes: &ConfigChanges,
    ) -> ServiceResult<AssessmentRegradeReport> {
        changes.validate()?;

        let txn = self.db.begin().await?;
        match apply_assessment_changes(&txn, assessment_id, changes).await {
            Ok(()) => txn.commit().await?,
            Err(err) => {
                if let Err(rollback_err) = txn.rollback().await {
                    warn!(error = %rollback_err, "rollback failed");
                }
                return Err(err);
            }
        }

        let instances = assessment_instance::Model::get_by_assessment_id(&self.db, assessment_id).await?;
        info!(assessment_id, instances = instances.len(), "regrading assessment");

        let mut report = AssessmentRegradeReport {
            assessment_id,
            results: Vec::with_capacity(instances.len()),
            skipped: Vec::new(),
        };
        for ai in instances {
            match self.regrade_assessment_instance(ai.id, changes).await {
                Ok(result) => report.results.push(result),
                Err(err) => report.skipped.push(SkippedInstance {
                    assessment_instance_id: ai.id,
                    busy: matches!(err, ServiceError::ConcurrentModification { .. }),
                    reason: err.to_string(),
                }),
            }
        }

        if !report.skipped.is_empty() {
            warn!(
                assessment_id,
                skipped = ?report.skipped_instance_ids(),
                "assessment regrade left instances behind"
            );
        }
        Ok(report)
    }
}

async fn apply_assessment_changes(
    txn: &DatabaseTransaction,
    assessment_id: i64,
    changes: &ConfigChanges,
) -> ServiceResult<()> {
    if assessment::Model::get_by_id(txn, assessment_id).await?.is_none() {
        return Err(ServiceError::NotFound(format!("Assessment {assessment_id}")));
    }
    if changes.is_empty() {
        return Ok(());
    }

    let questions = assessment_question::Model::get_by_assessment_id(txn, assessment_id).await?;
    check_known_qids(changes, questions.iter().map(|q| q.qid.as_str()))?;

    if let Some(max_points) = changes.assessment_max_points {
        assessment::Model::set_max_points(txn, assessment_id, max_points).await?;
    }
    for q in &questions {
        if let Some(&max_points) = changes.question_max_points.get(&q.qid) {
            assessment_question::Model::set_max_points(txn, q.id, max_points).await?;
        }
    }
    Ok(())
}

async fn regrade_in_txn(
    txn: &DatabaseTransaction,
    assessment_instance_id: i64,
    changes: &ConfigChanges,
) -> ServiceResult<RegradeResult> {
    let iqs = instance_question::Model::get_by_assessment_instance_id(txn, assessment_instance_id).await?;

    let mut qids = HashMap::with_capacity(iqs.len());
    for iq in &iqs {
        let question = assessment_question::Model::get_by_id(txn, iq.assessment_question_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Assessment question {}", iq.assessment_question_id)))?;
        qids.insert(iq.id, question.qid);
    }
    check_known_qids(changes, qids.values().map(String::as_str))?;

    if let Some(max_points) = changes.assessment_max_points {
        assessment_instance::Model::set_max_points(txn, assessment_instance_id, max_points).await?;
    }

    let mut questions = Vec::with_capacity(iqs.len());
    let mut failures = Vec::new();
    let mut excluded = HashSet::new();

    for iq in &iqs {
        let qid = qids.get(&iq.id).cloned().unwrap_or_default();
        let max_points = match changes.question_max_points.get(&qid) {
            Some(&new_max) => {
                instance_question::Model::set_max_points(txn, iq.id, new_max).await?;
                new_max
            }
            None => iq.max_points,
        };

        match grade::recompute_instance_question(txn, iq.id).await {
            Ok(score) => questions.push(RegradedQuestion {
                instance_question_id: iq.id,
                qid,
                max_points,
                score,
            }),
            Err(err) if err.is_recoverable() => {
                if !matches!(err, GradeComputationError::ZeroMaxPoints { .. }) {
                    excluded.insert(iq.id);
                }
                failures.push(RegradeFailure {
                    instance_question_id: iq.id,
                    reason: err.to_string(),
                });
            }
            Err(err) => return Err(err.into()),
        }
    }

    let assessment = grade::recompute_assessment_instance_excluding(txn, assessment_instance_id, &excluded).await?;

    let status = if failures.is_empty() {
        RegradeStatus::Completed
    } else {
        RegradeStatus::PartialFailure
    };

    Ok(RegradeResult {
        assessment_instance_id,
        status,
        questions,
        assessment,
        failures,
    })
}

fn check_known_qids<'a, I>(changes: &ConfigChanges, known: I) -> ServiceResult<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let known: HashSet<&str> = known.into_iter().collect();
    if let Some(unknown) = changes
        .question_max_points
        .keys()
        .find(|qid| !known.contains(qid.as_str()))
    {
        return Err(AssessmentConfigError::Invalid(format!("unknown question id '{unknown}'")).into());
    }
    Ok(())
}
