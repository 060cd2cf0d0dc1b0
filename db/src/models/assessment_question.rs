use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, DbErr, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};

/// A question as configured on an assessment (`assessment_questions` table).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "assessment_questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assessment_id: i64,
    /// Question identifier, unique within the assessment.
    pub qid: String,
    pub title: String,
    /// Display order.
    pub number: i32,
    pub max_points: f64,
    /// Ladder increment for homework questions. `None` means flat scoring.
    pub init_points: Option<f64>,
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
    pub async fn create<C>(
        db: &C,
        assessment_id: i64,
        qid: &str,
        title: &str,
        number: i32,
        max_points: f64,
        init_points: Option<f64>,
    ) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now();
        let active = ActiveModel {
            assessment_id: Set(assessment_id),
            qid: Set(qid.to_string()),
            title: Set(title.to_string()),
            number: Set(number),
            max_points: Set(max_points),
            init_points: Set(init_points),
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

    /// All questions of an assessment in display order.
    pub async fn get_by_assessment_id<C>(db: &C, assessment_id: i64) -> Result<Vec<Self>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::AssessmentId.eq(assessment_id))
            .order_by_asc(Column::Number)
            .all(db)
            .await
    }

    pub async fn get_by_qid<C>(db: &C, assessment_id: i64, qid: &str) -> Result<Option<Self>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::AssessmentId.eq(assessment_id))
            .filter(Column::Qid.eq(qid))
            .one(db)
            .await
    }

    pub async fn set_max_points<C>(db: &C, id: i64, max_points: f64) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let Some(question) = Self::get_by_id(db, id).await? else {
            return Err(DbErr::RecordNotFound("Assessment question not found".into()));
        };

        let mut active = question.into_active_model();
        active.max_points = Set(max_points);
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }
}
