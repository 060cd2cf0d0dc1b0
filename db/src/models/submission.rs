use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};

/// One answer attempt (`submissions` table).
///
/// Rows are append-only.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub instance_question_id: i64,
    /// Answer payload as JSON text.
    pub submitted_answer: String,
    /// Correctness in `[0, 1]`. `None` for a saved, ungraded answer.
    pub score: Option<f64>,
    pub correct: Option<bool>,
    /// Points as recorded at grading time.
    pub points: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::instance_question::Entity",
        from = "Column::InstanceQuestionId",
        to = "super::instance_question::Column::Id",
        on_delete = "Cascade"
    )]
    InstanceQuestion,
}

impl Related<super::instance_question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InstanceQuestion.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Appends a submission. `score` and `points` are both `Some` for a graded
    /// answer and both `None` for a save.
    pub async fn create<C>(
        db: &C,
        instance_question_id: i64,
        submitted_answer: &serde_json::Value,
        score: Option<f64>,
        points: Option<f64>,
    ) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let active = ActiveModel {
            instance_question_id: Set(instance_question_id),
            submitted_answer: Set(submitted_answer.to_string()),
            score: Set(score),
            correct: Set(score.map(|s| s >= 1.0)),
            points: Set(points),
            created_at: Set(Utc::now()),
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

    /// Full history of an instance-question in chronological order.
    pub async fn get_by_instance_question_id<C>(
        db: &C,
        instance_question_id: i64,
    ) -> Result<Vec<Self>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::InstanceQuestionId.eq(instance_question_id))
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    pub async fn count_for_instance_question<C>(
        db: &C,
        instance_question_id: i64,
    ) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::InstanceQuestionId.eq(instance_question_id))
            .count(db)
            .await
    }

    pub fn answer(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.submitted_answer)
    }

    pub fn is_graded(&self) -> bool {
        self.points.is_some()
    }
}
