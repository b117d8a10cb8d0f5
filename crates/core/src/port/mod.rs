// Port Layer - Interfaces for external dependencies

pub mod id_provider; // For deterministic testing
pub mod question_log_repository;
pub mod question_logger;
pub mod time_provider;

// Re-exports
pub use id_provider::IdProvider;
pub use question_log_repository::{LogChange, QuestionLogRepository};
pub use question_logger::QuestionLogger;
pub use time_provider::TimeProvider;
