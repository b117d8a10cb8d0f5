// SQLite QuestionLogRepository Implementation

use async_trait::async_trait;
use qlog_core::domain::{QuestionId, QuestionLog};
use qlog_core::error::{AppError, Result};
use qlog_core::port::{LogChange, QuestionLogRepository};
use sqlx::{Sqlite, SqlitePool, Transaction};

// Helper to convert sqlx::Error to AppError with structured information
fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(code) = db_err.code() {
                let code_str = code.as_ref();

                // SQLite error codes: https://www.sqlite.org/rescode.html
                match code_str {
                    "2067" | "1555" => AppError::Database(format!(
                        "Unique constraint violation: {} ({})",
                        db_err.message(),
                        code_str
                    )),
                    "5" => AppError::Database(format!(
                        "Database locked (SQLITE_BUSY): {}",
                        db_err.message()
                    )),
                    "13" => AppError::Database(format!("Database full: {}", db_err.message())),
                    _ => AppError::Database(format!(
                        "Database error [{}]: {}",
                        code_str,
                        db_err.message()
                    )),
                }
            } else {
                AppError::Database(format!("Database error: {}", db_err.message()))
            }
        }
        sqlx::Error::RowNotFound => AppError::Database("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => {
            AppError::Database(format!("Column not found: {}", col))
        }
        _ => AppError::Database(err.to_string()),
    }
}

pub struct SqliteQuestionLogRepository {
    pool: SqlitePool,
}

impl SqliteQuestionLogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn select_in_tx(
        tx: &mut Transaction<'_, Sqlite>,
        id: &QuestionId,
    ) -> Result<Option<QuestionLog>> {
        let row = sqlx::query_as::<_, QuestionLogRow>("SELECT * FROM question_logs WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&mut **tx)
            .await
            .map_err(map_sqlx_error)?;

        row.map(QuestionLogRow::into_log).transpose()
    }
}

#[async_trait]
impl QuestionLogRepository for SqliteQuestionLogRepository {
    async fn insert(&self, log: &QuestionLog) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO question_logs (
                id, conversation_id, user_id,
                submit_timestamp, response_timestamp,
                model_choices, error_codes,
                user_query_tokens, bot_response_tokens
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(log.id.as_str())
        .bind(&log.conversation_id)
        .bind(&log.user_id)
        .bind(log.submit_timestamp)
        .bind(log.response_timestamp)
        .bind(serde_json::to_string(&log.model_choices)?)
        .bind(serde_json::to_string(&log.error_codes)?)
        .bind(log.user_query_tokens)
        .bind(log.bot_response_tokens)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &QuestionId) -> Result<Option<QuestionLog>> {
        let row = sqlx::query_as::<_, QuestionLogRow>("SELECT * FROM question_logs WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(QuestionLogRow::into_log).transpose()
    }

    async fn modify(
        &self,
        id: &QuestionId,
        change: LogChange,
    ) -> Result<Option<QuestionLog>> {
        // IMMEDIATE takes the write lock at BEGIN, so writers queue on busy_timeout
        let mut tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(map_sqlx_error)?;

        let Some(mut log) = Self::select_in_tx(&mut tx, id).await? else {
            tx.rollback().await.map_err(map_sqlx_error)?;
            return Ok(None);
        };

        if let Err(e) = change(&mut log) {
            tx.rollback().await.map_err(map_sqlx_error)?;
            return Err(e);
        }

        sqlx::query(
            r#"
            UPDATE question_logs
            SET user_id = ?, response_timestamp = ?,
                model_choices = ?, error_codes = ?,
                user_query_tokens = ?, bot_response_tokens = ?
            WHERE id = ?
            "#,
        )
        .bind(&log.user_id)
        .bind(log.response_timestamp)
        .bind(serde_json::to_string(&log.model_choices)?)
        .bind(serde_json::to_string(&log.error_codes)?)
        .bind(log.user_query_tokens)
        .bind(log.bot_response_tokens)
        .bind(log.id.as_str())
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(Some(log))
    }

    async fn find_by_conversation_and_user(
        &self,
        conversation_id: &str,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<QuestionLog>> {
        let rows: Vec<QuestionLogRow> = sqlx::query_as(
            r#"
            SELECT * FROM question_logs
            WHERE conversation_id = ? AND user_id = ?
            ORDER BY submit_timestamp DESC, id ASC
            LIMIT ?
            "#,
        )
        .bind(conversation_id)
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(QuestionLogRow::into_log).collect()
    }

    async fn find_recent_by_conversation(
        &self,
        conversation_id: &str,
        since_millis: i64,
        limit: i64,
    ) -> Result<Vec<QuestionLog>> {
        let rows: Vec<QuestionLogRow> = sqlx::query_as(
            r#"
            SELECT * FROM question_logs
            WHERE conversation_id = ? AND submit_timestamp > ?
            ORDER BY submit_timestamp DESC, id ASC
            LIMIT ?
            "#,
        )
        .bind(conversation_id)
        .bind(since_millis)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(QuestionLogRow::into_log).collect()
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM question_logs")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(count)
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct QuestionLogRow {
    id: String,
    conversation_id: String,
    user_id: String,
    submit_timestamp: i64,
    response_timestamp: Option<i64>,
    model_choices: String, // JSON array
    error_codes: String,   // JSON array
    user_query_tokens: Option<i64>,
    bot_response_tokens: Option<i64>,
}

impl QuestionLogRow {
    fn into_log(self) -> Result<QuestionLog> {
        Ok(QuestionLog {
            id: QuestionId::new(self.id),
            conversation_id: self.conversation_id,
            user_id: self.user_id,
            submit_timestamp: self.submit_timestamp,
            response_timestamp: self.response_timestamp,
            model_choices: serde_json::from_str(&self.model_choices)?,
            error_codes: serde_json::from_str(&self.error_codes)?,
            user_query_tokens: self.user_query_tokens,
            bot_response_tokens: self.bot_response_tokens,
        })
    }
}
