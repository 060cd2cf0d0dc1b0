use std::path::Path;

use db::models::{assessment, assessment_instance, assessment_question, instance_question};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use tracing::{info, warn};
use util::assessment_config::{AssessmentConfig, AssessmentType, QuestionConfig};

use crate::error::{ServiceError, ServiceResult};

#[derive(Debug, Clone)]
pub struct CreatedAssessment {
    pub assessment: assessment::Model,
    pub questions: Vec<assessment_question::Model>,
}

#[derive(Debug, Clone)]
pub struct StartedInstance {
    pub instance: assessment_instance::Model,
    pub instance_questions: Vec<instance_question::Model>,
}

impl StartedInstance {
    /// The instance-question bound to `assessment_question_id`, if any.
    pub fn instance_question_for(&self, assessment_question_id: i64) -> Option<&instance_question::Model> {
        self.instance_questions
            .iter()
            .find(|iq| iq.assessment_question_id == assessment_question_id)
    }
}

/// Validates `config` and persists the assessment with its questions.
///
/// Questions are numbered in the order they appear. The assessment maximum
/// defaults to the sum of the question maxima.
pub async fn create_assessment(db: &DatabaseConnection, config: &AssessmentConfig) -> ServiceResult<CreatedAssessment> {
    config.validate()?;

    let txn = db.begin().await?;
    let created = match insert_assessment(&txn, config).await {
        Ok(created) => created,
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                warn!(error = %rollback_err, "rollback failed");
            }
            return Err(err);
        }
    };
    txn.commit().await?;

    info!(
        assessment_id = created.assessment.id,
        title = %created.assessment.title,
        questions = created.questions.len(),
        max_points = created.assessment.max_points,
        "created assessment"
    );
    Ok(created)
}

async fn insert_assessment(txn: &DatabaseTransaction, config: &AssessmentConfig) -> ServiceResult<CreatedAssessment> {
    let assessment = assessment::Model::create(
        txn,
        &config.title,
        config.assessment_type.into(),
        config.effective_max_points(),
        config.allow_real_time_grading,
    )
    .await?;

    let mut questions = Vec::with_capacity(config.questions.len());
    for (index, q) in config.questions.iter().enumerate() {
        let title = if q.title.is_empty() { q.qid.as_str() } else { q.title.as_str() };
        let question = assessment_question::Model::create(
            txn,
            assessment.id,
            &q.qid,
            title,
            index as i32 + 1,
            q.max_points,
            q.init_points,
        )
        .await?;
        questions.push(question);
    }

    Ok(CreatedAssessment { assessment, questions })
}

/// Starts the user's next attempt with one instance-question per assessment question.
///
/// Each instance-question copies the question maximum, and its ladder value
/// starts at `init_points` (or the maximum when the question has none).
pub async fn start_assessment_instance(
    db: &DatabaseConnection,
    assessment_id: i64,
    user_id: i64,
) -> ServiceResult<StartedInstance> {
    let assessment = assessment::Model::get_by_id(db, assessment_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Assessment {assessment_id}")))?;

    let txn = db.begin().await?;
    let started = match insert_instance(&txn, &assessment, user_id).await {
        Ok(started) => started,
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                warn!(error = %rollback_err, "rollback failed");
            }
            return Err(err);
        }
    };
    txn.commit().await?;

    info!(
        assessment_id,
        user_id,
        assessment_instance_id = started.instance.id,
        number = started.instance.number,
        "started assessment instance"
    );
    Ok(started)
}

async fn insert_instance(
    txn: &DatabaseTransaction,
    assessment: &assessment::Model,
    user_id: i64,
) -> ServiceResult<StartedInstance> {
    let number = assessment_instance::Model::latest_number(txn, assessment.id, user_id)
        .await?
        .map_or(1, |n| n + 1);
    let instance =
        assessment_instance::Model::create(txn, assessment.id, user_id, number, assessment.max_points).await?;

    let questions = assessment_question::Model::get_by_assessment_id(txn, assessment.id).await?;
    let mut instance_questions = Vec::with_capacity(questions.len());
    for q in questions {
        let current_value = q.init_points.unwrap_or(q.max_points);
        let iq = instance_question::Model::create(txn, instance.id, q.id, q.max_points, current_value).await?;
        instance_questions.push(iq);
    }

    Ok(StartedInstance {
        instance,
        instance_questions,
    })
}

/// Rebuilds the JSON configuration of a stored assessment.
pub async fn assessment_config(db: &DatabaseConnection, assessment_id: i64) -> ServiceResult<AssessmentConfig> {
    let assessment = assessment::Model::get_by_id(db, assessment_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Assessment {assessment_id}")))?;
    let questions = assessment_question::Model::get_by_assessment_id(db, assessment_id).await?;

    Ok(AssessmentConfig {
        title: assessment.title,
        assessment_type: match assessment.assessment_type {
            assessment::AssessmentType::Homework => AssessmentType::Homework,
            assessment::AssessmentType::Exam => AssessmentType::Exam,
        },
        max_points: Some(assessment.max_points),
        allow_real_time_grading: assessment.allow_real_time_grading,
        questions: questions
            .into_iter()
            .map(|q| QuestionConfig {
                qid: q.qid,
                title: q.title,
                max_points: q.max_points,
                init_points: q.init_points,
            })
            .collect(),
    })
}

/// Writes the stored configuration to `{storage_root}/assessment_{id}/config/config.json`.
pub async fn export_assessment_config(
    db: &DatabaseConnection,
    storage_root: &Path,
    assessment_id: i64,
) -> ServiceResult<AssessmentConfig> {
    let config = assessment_config(db, assessment_id).await?;
    config.save(storage_root, assessment_id)?;
    Ok(config)
}

/// Loads `{storage_root}/assessment_{id}/config/config.json` and creates an assessment from it.
pub async fn import_assessment_config(
    db: &DatabaseConnection,
    storage_root: &Path,
    config_id: i64,
) -> ServiceResult<CreatedAssessment> {
    let config = AssessmentConfig::load(storage_root, config_id)?;
    create_assessment(db, &config).await
}
