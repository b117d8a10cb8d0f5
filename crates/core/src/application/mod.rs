// Application Layer - Use Cases and Business Logic

pub mod log_service;
pub mod smoke;

// Re-exports
pub use log_service::{CreateQuestionLog, LogService};
pub use smoke::{run_smoke_test, SmokeOutcome, SmokeScenario};
