//! Read-only aggregate views for presentation.

use db::models::{assessment_instance, assessment_question, instance_question};
use scoring::scorebar::Scorebar;
use sea_orm::DatabaseConnection;
use serde::Serialize;

use crate::error::{ServiceError, ServiceResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionScoreView {
    pub instance_question_id: i64,
    pub qid: String,
    pub number: i32,
    pub max_points: f64,
    pub points: f64,
    pub score_perc: f64,
    pub number_attempts: i32,
    /// `None` until the question has been graded at least once.
    pub scorebar: Option<Scorebar>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstanceScores {
    pub assessment_instance_id: i64,
    pub max_points: f64,
    pub points: f64,
    pub score_perc: f64,
    pub credited_points: f64,
    pub credited_score_perc: f64,
    pub scorebar: Option<Scorebar>,
    pub questions: Vec<QuestionScoreView>,
}

/// Current aggregates of an assessment instance, questions in display order.
pub async fn instance_scores(db: &DatabaseConnection, assessment_instance_id: i64) -> ServiceResult<InstanceScores> {
    let ai = assessment_instance::Model::get_by_id(db, assessment_instance_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Assessment instance {assessment_instance_id}")))?;

    let mut questions = Vec::new();
    for iq in instance_question::Model::get_by_assessment_instance_id(db, ai.id).await? {
        let question = assessment_question::Model::get_by_id(db, iq.assessment_question_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Assessment question {}", iq.assessment_question_id)))?;
        let graded = iq.number_attempts > 0;
        questions.push(QuestionScoreView {
            instance_question_id: iq.id,
            qid: question.qid,
            number: question.number,
            max_points: iq.max_points,
            points: iq.points,
            score_perc: iq.score_perc,
            number_attempts: iq.number_attempts,
            scorebar: Scorebar::from_perc(graded.then_some(iq.score_perc)),
        });
    }
    questions.sort_by_key(|q| q.number);

    Ok(InstanceScores {
        assessment_instance_id: ai.id,
        max_points: ai.max_points,
        points: ai.points,
        score_perc: ai.score_perc,
        credited_points: ai.credited_points,
        credited_score_perc: ai.credited_score_perc,
        scorebar: Scorebar::from_perc(Some(ai.score_perc)),
        questions,
    })
}
