pub mod assessment;
pub mod assessment_instance;
pub mod assessment_question;
pub mod instance_question;
pub mod submission;

pub use assessment::Entity as Assessment;
pub use assessment_instance::Entity as AssessmentInstance;
pub use assessment_question::Entity as AssessmentQuestion;
pub use instance_question::Entity as InstanceQuestion;
pub use submission::Entity as Submission;
