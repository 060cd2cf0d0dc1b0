pub mod assessment_service;
pub mod error;
pub mod locks;
pub mod regrade_service;
pub mod scores;
pub mod submission_service;
pub mod validation;

pub use error::{ServiceError, ServiceResult};
