use chrono::{DateTime, Utc};
use scoring::types::{QuestionScore, QuestionState};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, DbErr, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};

/// Binding of one assessment question to one assessment instance.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "instance_questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assessment_instance_id: i64,
    pub assessment_question_id: i64,
    pub max_points: f64,
    pub points: f64,
    pub score_perc: f64,
    /// Value of the next fully-correct answer on a homework question.
    pub current_value: f64,
    /// Number of graded submissions.
    pub number_attempts: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assessment_instance::Entity",
        from = "Column::AssessmentInstanceId",
        to = "super::assessment_instance::Column::Id",
        on_delete = "Cascade"
    )]
    AssessmentInstance,
    #[sea_orm(
        belongs_to = "super::assessment_question::Entity",
        from = "Column::AssessmentQuestionId",
        to = "super::assessment_question::Column::Id",
        on_delete = "Cascade"
    )]
    AssessmentQuestion,
    #[sea_orm(has_many = "super::submission::Entity")]
    Submission,
}

impl Related<super::assessment_instance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssessmentInstance.def()
    }
}

impl Related<super::assessment_question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssessmentQuestion.def()
    }
}

impl Related<super::submission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submission.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create<C>(
        db: &C,
        assessment_instance_id: i64,
        assessment_question_id: i64,
        max_points: f64,
        current_value: f64,
    ) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now();
        let active = ActiveModel {
            assessment_instance_id: Set(assessment_instance_id),
            assessment_question_id: Set(assessment_question_id),
            max_points: Set(max_points),
            points: Set(0.0),
            score_perc: Set(0.0),
            current_value: Set(current_value),
            number_attempts: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        active.insert(db).await
    }

    pub async fn get_by_id<C>(db: &C, id: i64) -> Result<Option<Self>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find_by_id(id).one(db).await
    }

    /// Instance-questions of an assessment instance, ordered by id.
    pub async fn get_by_assessment_instance_id<C>(
        db: &C,
        assessment_instance_id: i64,
    ) -> Result<Vec<Self>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::AssessmentInstanceId.eq(assessment_instance_id))
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    /// Stores the ladder value and attempt count after a graded submission.
    pub async fn record_attempt<C>(db: &C, id: i64, current_value: f64) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let Some(iq) = Self::get_by_id(db, id).await? else {
            return Err(DbErr::RecordNotFound("Instance question not found".into()));
        };

        let attempts = iq.number_attempts + 1;
        let mut active = iq.into_active_model();
        active.current_value = Set(current_value);
        active.number_attempts = Set(attempts);
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }

    pub async fn update_score<C>(db: &C, id: i64, score: QuestionScore) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let Some(iq) = Self::get_by_id(db, id).await? else {
            return Err(DbErr::RecordNotFound("Instance question not found".into()));
        };

        let mut active = iq.into_active_model();
        active.points = Set(score.points);
        active.score_perc = Set(score.score_perc);
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }

    pub async fn set_max_points<C>(db: &C, id: i64, max_points: f64) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let Some(iq) = Self::get_by_id(db, id).await? else {
            return Err(DbErr::RecordNotFound("Instance question not found".into()));
        };

        let mut active = iq.into_active_model();
        active.max_points = Set(max_points);
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }

    pub fn state(&self) -> QuestionState {
        QuestionState {
            max_points: self.max_points,
            points: self.points,
            current_value: self.current_value,
        }
    }
}
