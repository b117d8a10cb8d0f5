// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Question id is empty")]
    EmptyQuestionId,

    #[error("Invalid token count for {field}: {value}")]
    InvalidTokenCount { field: &'static str, value: i64 },

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
