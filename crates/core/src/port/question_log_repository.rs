// Question Log Repository Port (Interface)

use crate::domain::{QuestionId, QuestionLog};
use crate::error::Result;
use async_trait::async_trait;

/// In-place change applied by `QuestionLogRepository::modify`
pub type LogChange = Box<dyn for<'a> FnOnce(&'a mut QuestionLog) -> Result<()> + Send>;

/// Repository interface for QuestionLog persistence
#[async_trait]
pub trait QuestionLogRepository: Send + Sync {
    /// Insert a new log entry
    async fn insert(&self, log: &QuestionLog) -> Result<()>;

    /// Find log by ID
    async fn find_by_id(&self, id: &QuestionId) -> Result<Option<QuestionLog>>;

    /// Read a log, apply `change`, and write it back atomically
    ///
    /// # Returns
    /// The updated log, or `None` if no log with this ID exists
    async fn modify(
        &self,
        id: &QuestionId,
        change: LogChange,
    ) -> Result<Option<QuestionLog>>;

    /// Logs for a conversation/user pair, newest submission first
    async fn find_by_conversation_and_user(
        &self,
        conversation_id: &str,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<QuestionLog>>;

    /// Logs for a conversation submitted strictly after `since_millis`, newest first
    async fn find_recent_by_conversation(
        &self,
        conversation_id: &str,
        since_millis: i64,
        limit: i64,
    ) -> Result<Vec<QuestionLog>>;

    /// Total number of stored logs
    async fn count(&self) -> Result<i64>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory repository for testing
    #[derive(Default)]
    pub struct InMemoryQuestionLogRepository {
        logs: Mutex<HashMap<QuestionId, QuestionLog>>,
        fail_with: Mutex<Option<String>>,
    }

    impl InMemoryQuestionLogRepository {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make every subsequent call fail with a database error
        pub fn fail_with(&self, message: impl Into<String>) {
            *self.fail_with.lock().unwrap() = Some(message.into());
        }

        pub fn len(&self) -> usize {
            self.logs.lock().unwrap().len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }

        fn check(&self) -> Result<()> {
            match self.fail_with.lock().unwrap().clone() {
                Some(msg) => Err(AppError::Database(msg)),
                None => Ok(()),
            }
        }

        fn newest_first(mut logs: Vec<QuestionLog>, limit: i64) -> Vec<QuestionLog> {
            logs.sort_by(|a, b| b.submit_timestamp.cmp(&a.submit_timestamp));
            logs.truncate(limit.max(0) as usize);
            logs
        }
    }

    #[async_trait]
    impl QuestionLogRepository for InMemoryQuestionLogRepository {
        async fn insert(&self, log: &QuestionLog) -> Result<()> {
            self.check()?;
            let mut logs = self.logs.lock().unwrap();
            if logs.contains_key(&log.id) {
                return Err(AppError::Database(format!(
                    "Unique constraint violation: {}",
                    log.id
                )));
            }
            logs.insert(log.id.clone(), log.clone());
            Ok(())
        }

        async fn find_by_id(&self, id: &QuestionId) -> Result<Option<QuestionLog>> {
            self.check()?;
            Ok(self.logs.lock().unwrap().get(id).cloned())
        }

        async fn modify(
            &self,
            id: &QuestionId,
            change: LogChange,
        ) -> Result<Option<QuestionLog>> {
            self.check()?;
            let mut logs = self.logs.lock().unwrap();
            let Some(stored) = logs.get_mut(id) else {
                return Ok(None);
            };
            let mut updated = stored.clone();
            change(&mut updated)?;
            *stored = updated.clone();
            Ok(Some(updated))
        }

        async fn find_by_conversation_and_user(
            &self,
            conversation_id: &str,
            user_id: &str,
            limit: i64,
        ) -> Result<Vec<QuestionLog>> {
            self.check()?;
            let logs = self
                .logs
                .lock()
                .unwrap()
                .values()
                .filter(|l| l.conversation_id == conversation_id && l.user_id == user_id)
                .cloned()
                .collect();
            Ok(Self::newest_first(logs, limit))
        }

        async fn find_recent_by_conversation(
            &self,
            conversation_id: &str,
            since_millis: i64,
            limit: i64,
        ) -> Result<Vec<QuestionLog>> {
            self.check()?;
            let logs = self
                .logs
                .lock()
                .unwrap()
                .values()
                .filter(|l| {
                    l.conversation_id == conversation_id && l.submit_timestamp > since_millis
                })
                .cloned()
                .collect();
            Ok(Self::newest_first(logs, limit))
        }

        async fn count(&self) -> Result<i64> {
            self.check()?;
            Ok(self.logs.lock().unwrap().len() as i64)
        }
    }
}
