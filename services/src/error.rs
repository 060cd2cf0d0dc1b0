use db::grade::GradeComputationError;
use sea_orm::DbErr;
use util::assessment_config::AssessmentConfigError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by the scoring services.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The answer payload or correctness score was rejected. Nothing was recorded.
    #[error("Invalid answer: {0}")]
    InvalidAnswer(String),

    #[error("Real-time grading is disabled for assessment {assessment_id}")]
    GradingDisabled { assessment_id: i64 },

    /// Another record or regrade holds the instance-question. Retry later.
    #[error("Instance question {instance_question_id} is being modified concurrently")]
    ConcurrentModification { instance_question_id: i64 },

    #[error("Regrade of assessment instance {assessment_instance_id} failed for instance questions {failed:?}")]
    RegradePartialFailure {
        assessment_instance_id: i64,
        failed: Vec<i64>,
    },

    #[error("{0} not found")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] AssessmentConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Grade computation failed: {0}")]
    Grade(#[from] GradeComputationError),
}
