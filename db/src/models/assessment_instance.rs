use chrono::{DateTime, Utc};
use scoring::types::AssessmentScore;
use sea_orm::entity::prelude::*;
use sea_orm::{
    ActiveModelTrait, DbErr, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, QuerySelect,
    Set,
};
use serde::{Deserialize, Serialize};

/// One student's attempt at an assessment (`assessment_instances` table).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "assessment_instances")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assessment_id: i64,
    pub user_id: i64,
    /// Attempt number, starting at 1 for each (assessment, user).
    pub number: i32,
    /// Snapshot of the assessment maximum. Updated by regrade.
    pub max_points: f64,
    /// Exact sum of the instance-question points.
    pub points: f64,
    /// `points / max_points × 100`, unclamped.
    pub score_perc: f64,
    /// `points` capped to `[0, max_points]`.
    pub credited_points: f64,
    pub credited_score_perc: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assessment::Entity",
        from = "Column::AssessmentId",
        to = "super::assessment::Column::Id",
        on_delete = "Cascade"
    )]
    Assessment,
    #[sea_orm(has_many = "super::instance_question::Entity")]
    InstanceQuestion,
}

impl Related<super::assessment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assessment.def()
    }
}

impl Related<super::instance_question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InstanceQuestion.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Creates a fresh attempt with zeroed aggregates.
    pub async fn create<C>(
        db: &C,
        assessment_id: i64,
        user_id: i64,
        number: i32,
        max_points: f64,
    ) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now();
        let active = ActiveModel {
            assessment_id: Set(assessment_id),
            user_id: Set(user_id),
            number: Set(number),
            max_points: Set(max_points),
            points: Set(0.0),
            score_perc: Set(0.0),
            credited_points: Set(0.0),
            credited_score_perc: Set(0.0),
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

    pub async fn get_by_assessment_id<C>(db: &C, assessment_id: i64) -> Result<Vec<Self>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::AssessmentId.eq(assessment_id))
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    /// Highest attempt number the user has on the assessment, if any.
    pub async fn latest_number<C>(db: &C, assessment_id: i64, user_id: i64) -> Result<Option<i32>, DbErr>
    where
        C: ConnectionTrait,
    {
        let latest = Entity::find()
            .filter(Column::AssessmentId.eq(assessment_id))
            .filter(Column::UserId.eq(user_id))
            .order_by_desc(Column::Number)
            .limit(1)
            .one(db)
            .await?;
        Ok(latest.map(|ai| ai.number))
    }

    pub async fn set_max_points<C>(db: &C, id: i64, max_points: f64) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let Some(instance) = Self::get_by_id(db, id).await? else {
            return Err(DbErr::RecordNotFound("Assessment instance not found".into()));
        };

        let mut active = instance.into_active_model();
        active.max_points = Set(max_points);
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }

    /// Persists a recomputed aggregate, including the maximum it was computed against.
    pub async fn update_score<C>(db: &C, id: i64, score: &AssessmentScore) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let Some(instance) = Self::get_by_id(db, id).await? else {
            return Err(DbErr::RecordNotFound("Assessment instance not found".into()));
        };

        let mut active = instance.into_active_model();
        active.max_points = Set(score.max_points);
        active.points = Set(score.points);
        active.score_perc = Set(score.score_perc);
        active.credited_points = Set(score.credited_points);
        active.credited_score_perc = Set(score.credited_score_perc);
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }

    pub fn score(&self) -> AssessmentScore {
        AssessmentScore {
            max_points: self.max_points,
            points: self.points,
            score_perc: self.score_perc,
            credited_points: self.credited_points,
            credited_score_perc: self.credited_score_perc,
        }
    }
}
