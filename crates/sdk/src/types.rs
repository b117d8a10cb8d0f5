//! SDK Request/Response Types
//!
//! Mirrors the JSON-RPC types from the api-rpc crate.

use qlog_core::domain::QuestionLog;
use serde::{Deserialize, Serialize};

/// Request to create a question log
#[derive(Debug, Clone, Serialize)]
pub struct CreateLogRequest {
    pub conversation_id: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submit_timestamp: Option<i64>,
    pub model_choices: Vec<String>,
}

/// Response from create
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLogResponse {
    pub question_id: Option<String>,
    pub created: bool,
}

/// Response from every update method
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateLogResponse {
    pub question_id: String,
    pub updated: bool,
}

/// Response from the query methods
#[derive(Debug, Clone, Deserialize)]
pub struct QueryLogsResponse {
    pub logs: Vec<QuestionLog>,
}

/// Service statistics
#[derive(Debug, Clone, Deserialize)]
pub struct StatsResponse {
    pub total_logs: i64,
    pub logging_enabled: bool,
    pub uptime_seconds: i64,
}
