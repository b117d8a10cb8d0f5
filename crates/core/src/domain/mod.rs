// Domain Layer - Pure business logic and entities

pub mod error;
pub mod question_log;

// Re-exports
pub use error::DomainError;
pub use question_log::{QuestionId, QuestionLog};
