// Question Logger Port
// The collaborator the smoke driver exercises. Implemented in-process by
// `LogService` and over JSON-RPC by the SDK client.

use crate::domain::QuestionId;
use crate::error::Result;
use async_trait::async_trait;

/// Logging collaborator for question/response interactions
#[async_trait]
pub trait QuestionLogger: Send + Sync {
    /// Create a new question log
    ///
    /// # Returns
    /// The new question ID, or `None` if the log could not be created
    /// (e.g. logging disabled)
    async fn create_question_log(
        &self,
        conversation_id: &str,
        user_id: &str,
    ) -> Result<Option<QuestionId>>;

    /// Replace the model choices of a log
    async fn update_question_log_models(
        &self,
        question_id: &QuestionId,
        models: &[String],
    ) -> Result<()>;

    /// Stamp the response time of a log with the current time
    async fn update_question_log_response(&self, question_id: &QuestionId) -> Result<()>;

    /// Append error messages to a log
    async fn update_question_log_errors(
        &self,
        question_id: &QuestionId,
        errors: &[String],
    ) -> Result<()>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::Mutex;

    /// A call observed by `RecordingLogger`
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum LoggerCall {
        Create {
            conversation_id: String,
            user_id: String,
        },
        UpdateModels {
            question_id: String,
            models: Vec<String>,
        },
        UpdateResponse {
            question_id: String,
        },
        UpdateErrors {
            question_id: String,
            errors: Vec<String>,
        },
    }

    /// Which operation should fail
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum FailOn {
        Create,
        UpdateModels,
        UpdateResponse,
        UpdateErrors,
    }

    /// Mock logger that records every call in order
    pub struct RecordingLogger {
        created_id: Option<QuestionId>,
        fail_on: Option<FailOn>,
        calls: Mutex<Vec<LoggerCall>>,
    }

    impl RecordingLogger {
        /// Logger whose create call returns `created_id`
        pub fn new(created_id: Option<&str>) -> Self {
            Self {
                created_id: created_id.map(QuestionId::new),
                fail_on: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn failing_on(mut self, fail_on: FailOn) -> Self {
            self.fail_on = Some(fail_on);
            self
        }

        pub fn calls(&self) -> Vec<LoggerCall> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: LoggerCall, op: FailOn) -> Result<()> {
            self.calls.lock().unwrap().push(call);
            if self.fail_on == Some(op) {
                return Err(AppError::Internal(format!("{:?} failed", op)));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl QuestionLogger for RecordingLogger {
        async fn create_question_log(
            &self,
            conversation_id: &str,
            user_id: &str,
        ) -> Result<Option<QuestionId>> {
            self.record(
                LoggerCall::Create {
                    conversation_id: conversation_id.to_string(),
                    user_id: user_id.to_string(),
                },
                FailOn::Create,
            )?;
            Ok(self.created_id.clone())
        }

        async fn update_question_log_models(
            &self,
            question_id: &QuestionId,
            models: &[String],
        ) -> Result<()> {
            self.record(
                LoggerCall::UpdateModels {
                    question_id: question_id.to_string(),
                    models: models.to_vec(),
                },
                FailOn::UpdateModels,
            )
        }

        async fn update_question_log_response(&self, question_id: &QuestionId) -> Result<()> {
            self.record(
                LoggerCall::UpdateResponse {
                    question_id: question_id.to_string(),
                },
                FailOn::UpdateResponse,
            )
        }

        async fn update_question_log_errors(
            &self,
            question_id: &QuestionId,
            errors: &[String],
        ) -> Result<()> {
            self.record(
                LoggerCall::UpdateErrors {
                    question_id: question_id.to_string(),
                    errors: errors.to_vec(),
                },
                FailOn::UpdateErrors,
            )
        }
    }
}
