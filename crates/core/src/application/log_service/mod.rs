// Log Service - Core use cases for question logging

pub mod validate;
#[cfg(test)]
mod validate_test;

use crate::domain::{QuestionId, QuestionLog};
use crate::error::Result;
use crate::port::{IdProvider, LogChange, QuestionLogRepository, QuestionLogger, TimeProvider};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Create request (conversation and user are required)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateQuestionLog {
    pub conversation_id: String,
    pub user_id: String,

    /// Epoch ms; defaults to "now"
    #[serde(default)]
    pub submit_timestamp: Option<i64>,

    #[serde(default)]
    pub model_choices: Vec<String>,
}

impl CreateQuestionLog {
    pub fn new(conversation_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            user_id: user_id.into(),
            submit_timestamp: None,
            model_choices: Vec::new(),
        }
    }

    pub fn submitted_at(mut self, submit_timestamp: i64) -> Self {
        self.submit_timestamp = Some(submit_timestamp);
        self
    }

    pub fn with_model_choices(mut self, model_choices: Vec<String>) -> Self {
        self.model_choices = model_choices;
        self
    }
}

/// Question log service
///
/// Without a repository the service runs in disabled mode: creates return
/// `None`, updates are skipped and queries return nothing.
pub struct LogService {
    repo: Option<Arc<dyn QuestionLogRepository>>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl LogService {
    pub fn new(
        repo: Arc<dyn QuestionLogRepository>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            repo: Some(repo),
            id_provider,
            time_provider,
        }
    }

    /// Service with logging disabled (no backing store configured)
    pub fn disabled(
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            repo: None,
            id_provider,
            time_provider,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.repo.is_some()
    }

    pub fn now_millis(&self) -> i64 {
        self.time_provider.now_millis()
    }

    /// Create a new question log
    pub async fn create(&self, req: CreateQuestionLog) -> Result<Option<QuestionId>> {
        validate::validate_create(&req)?;

        let Some(repo) = &self.repo else {
            warn!("Logging disabled, skipping log creation");
            return Ok(None);
        };

        let id = QuestionId::new(self.id_provider.generate_id());
        let submit_timestamp = req
            .submit_timestamp
            .unwrap_or_else(|| self.time_provider.now_millis());

        let log = QuestionLog::new(id.clone(), req.conversation_id, req.user_id, submit_timestamp)
            .with_model_choices(req.model_choices);

        repo.insert(&log).await?;

        info!(
            question_id = %id,
            conversation_id = %log.conversation_id,
            user_id = %log.user_id,
            "Question log created"
        );
        Ok(Some(id))
    }

    /// Replace model choices
    ///
    /// # Returns
    /// `true` if a stored log was changed; unknown or empty IDs are skipped
    pub async fn update_models(
        &self,
        id: &QuestionId,
        model_choices: Vec<String>,
    ) -> Result<bool> {
        validate::validate_entries("model_choices", &model_choices)?;
        let summary = model_choices.join(", ");
        let changed = self
            .apply(
                id,
                "models",
                Box::new(move |log: &mut QuestionLog| -> Result<()> {
                    log.set_model_choices(model_choices);
                    Ok(())
                }),
            )
            .await?;
        if changed {
            info!(question_id = %id, models = %summary, "Question log updated with model choices");
        }
        Ok(changed)
    }

    /// Set the response timestamp explicitly
    pub async fn update_response_at(
        &self,
        id: &QuestionId,
        response_timestamp: i64,
    ) -> Result<bool> {
        let changed = self
            .apply(
                id,
                "response",
                Box::new(move |log: &mut QuestionLog| -> Result<()> {
                    log.record_response(response_timestamp);
                    Ok(())
                }),
            )
            .await?;
        if changed {
            info!(question_id = %id, response_timestamp, "Question log updated with response timestamp");
        }
        Ok(changed)
    }

    /// Append error codes
    pub async fn update_errors(
        &self,
        id: &QuestionId,
        error_codes: Vec<String>,
    ) -> Result<bool> {
        validate::validate_entries("error_codes", &error_codes)?;
        let count = error_codes.len();
        let changed = self
            .apply(
                id,
                "errors",
                Box::new(move |log: &mut QuestionLog| -> Result<()> {
                    log.append_errors(error_codes);
                    Ok(())
                }),
            )
            .await?;
        if changed {
            info!(question_id = %id, added = count, "Question log updated with error codes");
        }
        Ok(changed)
    }

    /// Set token counts; `None` keeps the stored value
    pub async fn update_tokens(
        &self,
        id: &QuestionId,
        user_query_tokens: Option<i64>,
        bot_response_tokens: Option<i64>,
    ) -> Result<bool> {
        validate::validate_tokens(user_query_tokens, bot_response_tokens)?;
        let changed = self
            .apply(
                id,
                "tokens",
                Box::new(move |log: &mut QuestionLog| -> Result<()> {
                    log.set_tokens(user_query_tokens, bot_response_tokens)?;
                    Ok(())
                }),
            )
            .await?;
        if changed {
            info!(
                question_id = %id,
                user_query_tokens = ?user_query_tokens,
                bot_response_tokens = ?bot_response_tokens,
                "Question log updated with token counts"
            );
        }
        Ok(changed)
    }

    /// Re-attribute a log to the correct user
    pub async fn update_user_id(&self, id: &QuestionId, user_id: String) -> Result<bool> {
        validate::validate_identifier("user_id", &user_id)?;
        let new_user = user_id.clone();
        let changed = self
            .apply(
                id,
                "user",
                Box::new(move |log: &mut QuestionLog| -> Result<()> {
                    let previous = log.reassign_user(user_id);
                    debug!(previous_user_id = %previous, "Replacing user ID");
                    Ok(())
                }),
            )
            .await?;
        if changed {
            info!(question_id = %id, user_id = %new_user, "Question log user ID updated");
        }
        Ok(changed)
    }

    pub async fn get(&self, id: &QuestionId) -> Result<Option<QuestionLog>> {
        match &self.repo {
            Some(repo) if !id.is_empty() => repo.find_by_id(id).await,
            _ => Ok(None),
        }
    }

    /// Logs for a conversation/user pair, newest first
    pub async fn query_logs(
        &self,
        conversation_id: &str,
        user_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<QuestionLog>> {
        validate::validate_identifier("conversation_id", conversation_id)?;
        validate::validate_identifier("user_id", user_id)?;

        let Some(repo) = &self.repo else {
            warn!("Logging disabled, cannot query logs");
            return Ok(Vec::new());
        };

        let logs = repo
            .find_by_conversation_and_user(conversation_id, user_id, validate::clamp_limit(limit))
            .await?;
        debug!(
            conversation_id,
            user_id,
            found = logs.len(),
            "Queried logs for conversation and user"
        );
        Ok(logs)
    }

    /// Recent logs of a conversation regardless of user
    ///
    /// Used to find logs created by a frontend under a different user ID.
    pub async fn query_recent_logs_by_conversation(
        &self,
        conversation_id: &str,
        minutes_back: Option<i64>,
    ) -> Result<Vec<QuestionLog>> {
        validate::validate_identifier("conversation_id", conversation_id)?;
        let minutes_back = minutes_back.unwrap_or(validate::DEFAULT_RECENT_MINUTES);
        validate::validate_minutes_back(minutes_back)?;

        let Some(repo) = &self.repo else {
            warn!("Logging disabled, cannot query logs");
            return Ok(Vec::new());
        };

        let cutoff = self.time_provider.now_millis() - minutes_back * 60 * 1000;
        let logs = repo
            .find_recent_by_conversation(conversation_id, cutoff, validate::DEFAULT_QUERY_LIMIT)
            .await?;
        debug!(
            conversation_id,
            minutes_back,
            found = logs.len(),
            "Queried recent logs by conversation"
        );
        Ok(logs)
    }

    /// Number of stored logs (0 when disabled)
    pub async fn count(&self) -> Result<i64> {
        match &self.repo {
            Some(repo) => repo.count().await,
            None => Ok(0),
        }
    }

    /// Shared read-modify-write path; returns whether a log was changed
    async fn apply(&self, id: &QuestionId, what: &'static str, change: LogChange) -> Result<bool> {
        let Some(repo) = &self.repo else {
            warn!(update = what, "Logging disabled, skipping update");
            return Ok(false);
        };
        if id.is_empty() {
            warn!(update = what, "Question ID missing, skipping update");
            return Ok(false);
        }

        match repo.modify(id, change).await? {
            Some(_) => Ok(true),
            None => {
                warn!(question_id = %id, update = what, "Question log not found, skipping update");
                Ok(false)
            }
        }
    }
}

#[async_trait]
impl QuestionLogger for LogService {
    async fn create_question_log(
        &self,
        conversation_id: &str,
        user_id: &str,
    ) -> Result<Option<QuestionId>> {
        self.create(CreateQuestionLog::new(conversation_id, user_id))
            .await
    }

    async fn update_question_log_models(
        &self,
        question_id: &QuestionId,
        models: &[String],
    ) -> Result<()> {
        self.update_models(question_id, models.to_vec())
            .await
            .map(|_| ())
    }

    async fn update_question_log_response(&self, question_id: &QuestionId) -> Result<()> {
        let now = self.time_provider.now_millis();
        self.update_response_at(question_id, now).await.map(|_| ())
    }

    async fn update_question_log_errors(
        &self,
        question_id: &QuestionId,
        errors: &[String],
    ) -> Result<()> {
        self.update_errors(question_id, errors.to_vec())
            .await
            .map(|_| ())
    }
}
