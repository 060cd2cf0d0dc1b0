use crate::seed::{SeedContext, Seeder};
use services::ServiceError;
use services::assessment_service::{create_assessment, export_assessment_config};
use util::assessment_config::{AssessmentConfig, AssessmentType, QuestionConfig};

pub struct AssessmentSeeder;

fn question(qid: &str, title: &str, max_points: f64, init_points: Option<f64>) -> QuestionConfig {
    QuestionConfig {
        qid: qid.to_string(),
        title: title.to_string(),
        max_points,
        init_points,
    }
}

pub fn homework_fixture() -> AssessmentConfig {
    AssessmentConfig {
        title: "HW1".into(),
        assessment_type: AssessmentType::Homework,
        max_points: Some(30.0),
        allow_real_time_grading: true,
        questions: vec![
            question("addNumbers", "Add two numbers", 5.0, Some(1.0)),
            question("addVectors", "Addition of vectors in Cartesian coordinates", 11.0, Some(2.0)),
            question("fossilFuelsRadio", "Advantages of fossil fuels (radio)", 14.0, Some(3.0)),
        ],
    }
}

pub fn exam_fixture() -> AssessmentConfig {
    AssessmentConfig {
        title: "Exam 1".into(),
        assessment_type: AssessmentType::Exam,
        max_points: None,
        allow_real_time_grading: true,
        questions: vec![
            question("partialCredit1", "Partial credit 1", 10.0, None),
            question("partialCredit2", "Partial credit 2", 15.0, None),
            question("fossilFuelsRadio", "Advantages of fossil fuels (radio)", 5.0, None),
        ],
    }
}

#[async_trait::async_trait]
impl Seeder for AssessmentSeeder {
    async fn seed(&self, ctx: &SeedContext) -> Result<(), ServiceError> {
        for config in [homework_fixture(), exam_fixture()] {
            let created = create_assessment(&ctx.db, &config).await?;
            export_assessment_config(&ctx.db, &ctx.storage_root, created.assessment.id).await?;
        }
        Ok(())
    }
}
