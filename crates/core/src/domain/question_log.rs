// Question Log Domain Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque question identifier (UUID v4 in production)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An empty id is treated as "no id"; whitespace still counts as an id
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for QuestionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One logged question/response interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionLog {
    pub id: QuestionId,
    pub conversation_id: String,
    pub user_id: String,

    pub submit_timestamp: i64,           // epoch ms
    pub response_timestamp: Option<i64>, // epoch ms, set once the bot answered

    pub model_choices: Vec<String>,
    pub error_codes: Vec<String>,

    pub user_query_tokens: Option<i64>,
    pub bot_response_tokens: Option<i64>,
}

impl QuestionLog {
    /// Create a fresh log entry
    ///
    /// # Arguments
    ///
    /// * `id` - Question ID (injected, not generated)
    /// * `conversation_id` - Conversation the question belongs to
    /// * `user_id` - User who asked
    /// * `submit_timestamp` - Submission time in epoch ms (injected, not system time)
    pub fn new(
        id: QuestionId,
        conversation_id: impl Into<String>,
        user_id: impl Into<String>,
        submit_timestamp: i64,
    ) -> Self {
        Self {
            id,
            conversation_id: conversation_id.into(),
            user_id: user_id.into(),
            submit_timestamp,
            response_timestamp: None,
            model_choices: Vec::new(),
            error_codes: Vec::new(),
            user_query_tokens: None,
            bot_response_tokens: None,
        }
    }

    pub fn with_model_choices(mut self, model_choices: Vec<String>) -> Self {
        self.model_choices = model_choices;
        self
    }

    /// Replace the model choices
    pub fn set_model_choices(&mut self, model_choices: Vec<String>) {
        self.model_choices = model_choices;
    }

    pub fn record_response(&mut self, response_timestamp: i64) {
        self.response_timestamp = Some(response_timestamp);
    }

    /// Append error codes, keeping the ones already recorded
    pub fn append_errors<I, S>(&mut self, errors: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.error_codes.extend(errors.into_iter().map(Into::into));
    }

    /// Update token counts; `None` leaves the stored value untouched
    pub fn set_tokens(
        &mut self,
        user_query_tokens: Option<i64>,
        bot_response_tokens: Option<i64>,
    ) -> crate::domain::error::Result<()> {
        if let Some(value) = user_query_tokens.filter(|v| *v < 0) {
            return Err(crate::domain::DomainError::InvalidTokenCount {
                field: "user_query_tokens",
                value,
            });
        }
        if let Some(value) = bot_response_tokens.filter(|v| *v < 0) {
            return Err(crate::domain::DomainError::InvalidTokenCount {
                field: "bot_response_tokens",
                value,
            });
        }

        if user_query_tokens.is_some() {
            self.user_query_tokens = user_query_tokens;
        }
        if bot_response_tokens.is_some() {
            self.bot_response_tokens = bot_response_tokens;
        }
        Ok(())
    }

    /// Re-attribute the log to another user, returning the previous user ID
    pub fn reassign_user(&mut self, user_id: impl Into<String>) -> String {
        std::mem::replace(&mut self.user_id, user_id.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> QuestionLog {
        QuestionLog::new(QuestionId::new("q-1"), "conv-1", "user-1", 1_000)
    }

    #[test]
    fn test_new_log_starts_without_response() {
        let log = sample();
        assert_eq!(log.response_timestamp, None);
        assert!(log.error_codes.is_empty());
        assert!(log.model_choices.is_empty());
        assert_eq!(log.user_query_tokens, None);
    }

    #[test]
    fn test_append_errors_keeps_existing() {
        let mut log = sample();
        log.append_errors(["E1"]);
        log.append_errors(vec!["E2".to_string(), "E3".to_string()]);
        assert_eq!(log.error_codes, vec!["E1", "E2", "E3"]);
    }

    #[test]
    fn test_set_model_choices_replaces() {
        let mut log = sample().with_model_choices(vec!["General".into()]);
        log.set_model_choices(vec!["Finance".into(), "Legal".into()]);
        assert_eq!(log.model_choices, vec!["Finance", "Legal"]);
    }

    #[test]
    fn test_set_tokens_only_touches_provided_counts() {
        let mut log = sample();
        log.set_tokens(Some(12), Some(40)).unwrap();
        log.set_tokens(None, Some(55)).unwrap();
        assert_eq!(log.user_query_tokens, Some(12));
        assert_eq!(log.bot_response_tokens, Some(55));
    }

    #[test]
    fn test_set_tokens_rejects_negative() {
        let mut log = sample();
        let err = log.set_tokens(Some(-1), None).unwrap_err();
        assert!(err.to_string().contains("user_query_tokens"));
        assert_eq!(log.user_query_tokens, None);
    }

    #[test]
    fn test_reassign_user_returns_previous() {
        let mut log = sample();
        let old = log.reassign_user("user-2");
        assert_eq!(old, "user-1");
        assert_eq!(log.user_id, "user-2");
    }

    #[test]
    fn test_question_id_emptiness() {
        assert!(QuestionId::new("").is_empty());
        assert!(!QuestionId::new("  ").is_empty());
        assert!(!QuestionId::new("abc123").is_empty());
        assert_eq!(QuestionId::from("abc123").to_string(), "abc123");
    }
}
