// Request validation for the log service

use super::CreateQuestionLog;
use crate::error::{AppError, Result};

/// Longest accepted identifier (conversation/user IDs)
pub const MAX_ID_LEN: usize = 256;

/// Longest accepted model name or error message
pub const MAX_ENTRY_LEN: usize = 2048;

/// Most entries accepted in one models/errors update
pub const MAX_ENTRIES: usize = 64;

/// Default and maximum page size for `query_logs`
pub const DEFAULT_QUERY_LIMIT: i64 = 10;
pub const MAX_QUERY_LIMIT: i64 = 100;

/// Default look-back window for recent-log queries
pub const DEFAULT_RECENT_MINUTES: i64 = 5;
pub const MAX_RECENT_MINUTES: i64 = 24 * 60;

pub fn validate_create(req: &CreateQuestionLog) -> Result<()> {
    validate_identifier("conversation_id", &req.conversation_id)?;
    validate_identifier("user_id", &req.user_id)?;
    if let Some(ts) = req.submit_timestamp {
        if ts < 0 {
            return Err(AppError::Validation(format!(
                "submit_timestamp must not be negative, got {}",
                ts
            )));
        }
    }
    validate_entries("model_choices", &req.model_choices)
}

pub fn validate_identifier(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} cannot be empty", field)));
    }
    if value.len() > MAX_ID_LEN {
        return Err(AppError::Validation(format!(
            "{} too long ({} > {} bytes)",
            field,
            value.len(),
            MAX_ID_LEN
        )));
    }
    Ok(())
}

/// Model choices and error codes: bounded list, entries stored as given
pub fn validate_entries(field: &str, entries: &[String]) -> Result<()> {
    if entries.len() > MAX_ENTRIES {
        return Err(AppError::Validation(format!(
            "{} has too many entries ({} > {})",
            field,
            entries.len(),
            MAX_ENTRIES
        )));
    }
    for (i, entry) in entries.iter().enumerate() {
        if entry.len() > MAX_ENTRY_LEN {
            return Err(AppError::Validation(format!(
                "{}[{}] too long ({} > {} bytes)",
                field,
                i,
                entry.len(),
                MAX_ENTRY_LEN
            )));
        }
    }
    Ok(())
}

pub fn validate_tokens(user_query_tokens: Option<i64>, bot_response_tokens: Option<i64>) -> Result<()> {
    for (field, value) in [
        ("user_query_tokens", user_query_tokens),
        ("bot_response_tokens", bot_response_tokens),
    ] {
        if let Some(v) = value.filter(|v| *v < 0) {
            return Err(AppError::Validation(format!(
                "{} out of range: {}",
                field, v
            )));
        }
    }
    Ok(())
}

pub fn validate_minutes_back(minutes_back: i64) -> Result<()> {
    if !(1..=MAX_RECENT_MINUTES).contains(&minutes_back) {
        return Err(AppError::Validation(format!(
            "minutes_back out of range: {} (expected 1..={})",
            minutes_back, MAX_RECENT_MINUTES
        )));
    }
    Ok(())
}

/// Clamp a requested page size into 1..=MAX_QUERY_LIMIT
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit
        .unwrap_or(DEFAULT_QUERY_LIMIT)
        .clamp(1, MAX_QUERY_LIMIT)
}
