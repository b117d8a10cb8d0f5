//! RPC Request/Response Types
//!
//! JSON-RPC method parameters and results. Params are named (JSON objects).
//! Required string fields default to empty so a missing field surfaces as a
//! VALIDATION_ERROR instead of a generic parse error.

use qlog_core::domain::QuestionLog;
use serde::{Deserialize, Serialize};

/// log.create.v1 - Create a question log
#[derive(Debug, Deserialize)]
pub struct CreateLogRequest {
    #[serde(default)]
    pub conversation_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub submit_timestamp: Option<i64>,
    #[serde(default)]
    pub model_choices: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateLogResponse {
    pub question_id: Option<String>,
    pub created: bool,
}

/// log.update_models.v1 - Replace model choices
#[derive(Debug, Deserialize)]
pub struct UpdateModelsRequest {
    #[serde(default)]
    pub question_id: String,
    pub model_choices: Option<Vec<String>>,
}

/// log.update_response.v1 - Record the response time (defaults to now)
#[derive(Debug, Deserialize)]
pub struct UpdateResponseRequest {
    #[serde(default)]
    pub question_id: String,
    #[serde(default)]
    pub response_timestamp: Option<i64>,
}

/// log.update_errors.v1 - Append error codes
#[derive(Debug, Deserialize)]
pub struct UpdateErrorsRequest {
    #[serde(default)]
    pub question_id: String,
    pub error_codes: Option<Vec<String>>,
}

/// log.update_tokens.v1 - Record token counts
#[derive(Debug, Deserialize)]
pub struct UpdateTokensRequest {
    #[serde(default)]
    pub question_id: String,
    #[serde(default)]
    pub user_query_tokens: Option<i64>,
    #[serde(default)]
    pub bot_response_tokens: Option<i64>,
}

/// log.update_user.v1 - Re-attribute a log to another user
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub question_id: String,
    #[serde(default)]
    pub user_id: String,
}

/// Result of every log.update_*.v1 method
#[derive(Debug, Clone, Serialize)]
pub struct UpdateLogResponse {
    pub question_id: String,
    /// false when the log does not exist or logging is disabled
    pub updated: bool,
}

/// log.get.v1 - Fetch a single log
#[derive(Debug, Deserialize)]
pub struct GetLogRequest {
    #[serde(default)]
    pub question_id: String,
}

/// log.query.v1 - Logs for a conversation and user
#[derive(Debug, Deserialize)]
pub struct QueryLogsRequest {
    #[serde(default)]
    pub conversation_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// log.query_recent.v1 - Recent logs for a conversation (any user)
#[derive(Debug, Deserialize)]
pub struct QueryRecentRequest {
    #[serde(default)]
    pub conversation_id: String,
    #[serde(default)]
    pub minutes_back: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryLogsResponse {
    pub logs: Vec<QuestionLog>,
}

/// admin.stats.v1 - Service statistics (no parameters)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub total_logs: i64,
    pub logging_enabled: bool,
    pub uptime_seconds: i64,
}
