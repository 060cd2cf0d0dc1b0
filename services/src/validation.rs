use db::models::instance_question;
use serde_json::Value;

/// Question-specific check of an answer payload before it is recorded.
pub trait AnswerValidator: Send + Sync {
    fn validate(&self, instance_question: &instance_question::Model, answer: &Value) -> Result<(), String>;
}

/// Accepts any non-empty JSON object.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonEmptyObjectValidator;

impl AnswerValidator for NonEmptyObjectValidator {
    fn validate(&self, _instance_question: &instance_question::Model, answer: &Value) -> Result<(), String> {
        match answer {
            Value::Object(map) if !map.is_empty() => Ok(()),
            Value::Object(_) => Err("Answer must not be empty".into()),
            _ => Err("Answer must be a JSON object".into()),
        }
    }
}
