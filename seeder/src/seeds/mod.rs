pub mod assessment;
pub mod assessment_instance;
pub mod submission;
