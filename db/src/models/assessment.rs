use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, DbErr, EntityTrait, IntoActiveModel, Set};
use serde::{Deserialize, Serialize};
use util::assessment_config::AssessmentType as ConfigAssessmentType;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "assessment_type_enum")]
#[serde(rename_all = "lowercase")]
pub enum AssessmentType {
    #[sea_orm(string_value = "homework")]
    Homework,
    #[sea_orm(string_value = "exam")]
    Exam,
}

impl From<ConfigAssessmentType> for AssessmentType {
    fn from(value: ConfigAssessmentType) -> Self {
        match value {
            ConfigAssessmentType::Homework => AssessmentType::Homework,
            ConfigAssessmentType::Exam => AssessmentType::Exam,
        }
    }
}

/// Assessment model representing the `assessments` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "assessments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub assessment_type: AssessmentType,
    /// Total points the assessment is out of. Supplied by configuration.
    pub max_points: f64,
    /// When false, answers can be saved but not graded.
    pub allow_real_time_grading: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::assessment_question::Entity")]
    AssessmentQuestion,
    #[sea_orm(has_many = "super::assessment_instance::Entity")]
    AssessmentInstance,
}

impl Related<super::assessment_question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssessmentQuestion.def()
    }
}

impl Related<super::assessment_instance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssessmentInstance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Create a new assessment in the database.
    pub async fn create<C>(
        db: &C,
        title: &str,
        assessment_type: AssessmentType,
        max_points: f64,
        allow_real_time_grading: bool,
    ) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now();
        let active = ActiveModel {
            title: Set(title.to_string()),
            assessment_type: Set(assessment_type),
            max_points: Set(max_points),
            allow_real_time_grading: Set(allow_real_time_grading),
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

    /// Replace the assessment maximum. Used when a regrade reconfigures the assessment.
    pub async fn set_max_points<C>(db: &C, id: i64, max_points: f64) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let Some(assessment) = Self::get_by_id(db, id).await? else {
            return Err(DbErr::RecordNotFound("Assessment not found".into()));
        };

        let mut active = assessment.into_active_model();
        active.max_points = Set(max_points);
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }

    pub fn is_homework(&self) -> bool {
        self.assessment_type == AssessmentType::Homework
    }
}
