use crate::seed::{SeedContext, Seeder};
use db::models::assessment;
use sea_orm::EntityTrait;
use services::ServiceError;
use services::assessment_service::start_assessment_instance;

pub struct AssessmentInstanceSeeder;

const STUDENTS: i64 = 8;

#[async_trait::async_trait]
impl Seeder for AssessmentInstanceSeeder {
    async fn seed(&self, ctx: &SeedContext) -> Result<(), ServiceError> {
        let assessments = assessment::Entity::find().all(&ctx.db).await?;
        if assessments.is_empty() {
            return Err(ServiceError::NotFound("Assessments to start".into()));
        }

        for a in &assessments {
            for user_id in 1..=STUDENTS {
                start_assessment_instance(&ctx.db, a.id, user_id).await?;
            }
        }
        Ok(())
    }
}
