// Question Log Infrastructure - SQLite Adapter
// Implements: QuestionLogRepository

mod connection;
mod migration;
mod question_log_repository;

pub use connection::create_pool;
pub use migration::run_migrations;
pub use question_log_repository::SqliteQuestionLogRepository;

// Note: sqlx::Error conversion is handled by wrapping in helper functions
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
