pub mod m202605010001_create_assessments;
pub mod m202605010002_create_assessment_questions;
pub mod m202605010003_create_assessment_instances;
pub mod m202605010004_create_instance_questions;
pub mod m202605010005_create_submissions;
