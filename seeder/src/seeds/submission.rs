use crate::seed::{SeedContext, Seeder};
use db::models::{assessment_instance, instance_question};
use sea_orm::EntityTrait;
use serde_json::json;
use services::ServiceError;
use services::submission_service::{RecordSubmission, SubmissionService};

pub struct SubmissionSeeder;

/// Mostly fully-correct answers, some wrong ones, the rest partial credit.
fn random_score() -> f64 {
    match fastrand::u8(..10) {
        0..=5 => 1.0,
        6..=7 => 0.0,
        _ => (fastrand::f64() * 100.0).round() / 100.0,
    }
}

#[async_trait::async_trait]
impl Seeder for SubmissionSeeder {
    async fn seed(&self, ctx: &SeedContext) -> Result<(), ServiceError> {
        let service = SubmissionService::new(ctx.db.clone(), ctx.locks.clone());
        let instances = assessment_instance::Entity::find().all(&ctx.db).await?;

        for ai in &instances {
            let iqs = instance_question::Model::get_by_assessment_instance_id(&ctx.db, ai.id).await?;
            for iq in &iqs {
                for attempt in 0..fastrand::usize(0..6) {
                    let answer = json!({ "attempt": attempt, "value": fastrand::i32(-20..20) });
                    let request = if fastrand::u8(..10) == 0 {
                        RecordSubmission::saved(iq.id, answer)
                    } else {
                        RecordSubmission::graded(iq.id, answer, random_score())
                    };
                    service.record_submission(request).await?;
                }
            }
        }
        Ok(())
    }
}
