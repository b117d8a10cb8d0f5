//! RPC Method Handlers
//!
//! Implements the business logic for each JSON-RPC method.

use crate::error::{missing_field, throttled, to_rpc_error};
use crate::rate_limiter::RateLimiter;
use crate::types::{
    CreateLogRequest, CreateLogResponse, GetLogRequest, QueryLogsRequest, QueryLogsResponse,
    QueryRecentRequest, StatsResponse, UpdateErrorsRequest, UpdateLogResponse,
    UpdateModelsRequest, UpdateResponseRequest, UpdateTokensRequest, UpdateUserRequest,
};
use jsonrpsee::types::ErrorObjectOwned;
use qlog_core::application::{CreateQuestionLog, LogService};
use qlog_core::domain::{QuestionId, QuestionLog};
use qlog_core::error::AppError;
use std::sync::Arc;
use std::time::Instant;

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    service: Arc<LogService>,
    rate_limiter: RateLimiter,
    start_time: Instant,
}

fn required_id(question_id: String, fields: &str) -> Result<QuestionId, ErrorObjectOwned> {
    let id = QuestionId::new(question_id);
    if id.is_empty() {
        return Err(missing_field(fields));
    }
    Ok(id)
}

impl RpcHandler {
    pub fn new(service: Arc<LogService>, rate_limiter: RateLimiter) -> Self {
        Self {
            service,
            rate_limiter,
            start_time: Instant::now(),
        }
    }

    async fn admit(&self) -> Result<(), ErrorObjectOwned> {
        if self.rate_limiter.check().await {
            Ok(())
        } else {
            tracing::warn!("Rate limit exceeded");
            Err(throttled())
        }
    }

    /// log.create.v1
    pub async fn create(
        &self,
        params: CreateLogRequest,
    ) -> Result<CreateLogResponse, ErrorObjectOwned> {
        self.admit().await?;

        if params.conversation_id.is_empty() || params.user_id.is_empty() {
            return Err(missing_field("conversation_id, user_id"));
        }

        let req = CreateQuestionLog {
            conversation_id: params.conversation_id,
            user_id: params.user_id,
            submit_timestamp: params.submit_timestamp,
            model_choices: params.model_choices,
        };

        let question_id = self.service.create(req).await.map_err(to_rpc_error)?;

        Ok(CreateLogResponse {
            created: question_id.is_some(),
            question_id: question_id.map(QuestionId::into_inner),
        })
    }

    /// log.update_models.v1
    pub async fn update_models(
        &self,
        params: UpdateModelsRequest,
    ) -> Result<UpdateLogResponse, ErrorObjectOwned> {
        self.admit().await?;

        const FIELDS: &str = "question_id, model_choices (array)";
        let id = required_id(params.question_id, FIELDS)?;
        let models = params.model_choices.ok_or_else(|| missing_field(FIELDS))?;

        let updated = self
            .service
            .update_models(&id, models)
            .await
            .map_err(to_rpc_error)?;

        Ok(UpdateLogResponse {
            question_id: id.into_inner(),
            updated,
        })
    }

    /// log.update_response.v1
    pub async fn update_response(
        &self,
        params: UpdateResponseRequest,
    ) -> Result<UpdateLogResponse, ErrorObjectOwned> {
        self.admit().await?;

        let id = required_id(params.question_id, "question_id")?;
        let at = params
            .response_timestamp
            .unwrap_or_else(|| self.service.now_millis());

        let updated = self
            .service
            .update_response_at(&id, at)
            .await
            .map_err(to_rpc_error)?;

        Ok(UpdateLogResponse {
            question_id: id.into_inner(),
            updated,
        })
    }

    /// log.update_errors.v1
    pub async fn update_errors(
        &self,
        params: UpdateErrorsRequest,
    ) -> Result<UpdateLogResponse, ErrorObjectOwned> {
        self.admit().await?;

        const FIELDS: &str = "question_id, error_codes (array)";
        let id = required_id(params.question_id, FIELDS)?;
        let errors = params.error_codes.ok_or_else(|| missing_field(FIELDS))?;

        let updated = self
            .service
            .update_errors(&id, errors)
            .await
            .map_err(to_rpc_error)?;

        Ok(UpdateLogResponse {
            question_id: id.into_inner(),
            updated,
        })
    }

    /// log.update_tokens.v1
    pub async fn update_tokens(
        &self,
        params: UpdateTokensRequest,
    ) -> Result<UpdateLogResponse, ErrorObjectOwned> {
        self.admit().await?;

        let id = required_id(params.question_id, "question_id")?;
        let updated = self
            .service
            .update_tokens(&id, params.user_query_tokens, params.bot_response_tokens)
            .await
            .map_err(to_rpc_error)?;

        Ok(UpdateLogResponse {
            question_id: id.into_inner(),
            updated,
        })
    }

    /// log.update_user.v1
    pub async fn update_user(
        &self,
        params: UpdateUserRequest,
    ) -> Result<UpdateLogResponse, ErrorObjectOwned> {
        self.admit().await?;

        let id = required_id(params.question_id, "question_id, user_id")?;
        if params.user_id.is_empty() {
            return Err(missing_field("question_id, user_id"));
        }

        let updated = self
            .service
            .update_user_id(&id, params.user_id)
            .await
            .map_err(to_rpc_error)?;

        Ok(UpdateLogResponse {
            question_id: id.into_inner(),
            updated,
        })
    }

    /// log.get.v1
    pub async fn get(&self, params: GetLogRequest) -> Result<QuestionLog, ErrorObjectOwned> {
        let id = required_id(params.question_id, "question_id")?;

        self.service
            .get(&id)
            .await
            .map_err(to_rpc_error)?
            .ok_or_else(|| to_rpc_error(AppError::NotFound(format!("Question log {} not found", id))))
    }

    /// log.query.v1
    pub async fn query(
        &self,
        params: QueryLogsRequest,
    ) -> Result<QueryLogsResponse, ErrorObjectOwned> {
        let logs = self
            .service
            .query_logs(&params.conversation_id, &params.user_id, params.limit)
            .await
            .map_err(to_rpc_error)?;

        Ok(QueryLogsResponse { logs })
    }

    /// log.query_recent.v1
    pub async fn query_recent(
        &self,
        params: QueryRecentRequest,
    ) -> Result<QueryLogsResponse, ErrorObjectOwned> {
        let logs = self
            .service
            .query_recent_logs_by_conversation(&params.conversation_id, params.minutes_back)
            .await
            .map_err(to_rpc_error)?;

        Ok(QueryLogsResponse { logs })
    }

    /// admin.stats.v1
    pub async fn stats(&self) -> Result<StatsResponse, ErrorObjectOwned> {
        let total_logs = self.service.count().await.map_err(to_rpc_error)?;

        Ok(StatsResponse {
            total_logs,
            logging_enabled: self.service.is_enabled(),
            uptime_seconds: self.start_time.elapsed().as_secs() as i64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::code;
    use qlog_core::port::id_provider::SequentialIdProvider;
    use qlog_core::port::question_log_repository::mocks::InMemoryQuestionLogRepository;
    use qlog_core::port::time_provider::FixedTimeProvider;

    fn handler_with_limit(burst: u32) -> RpcHandler {
        let service = LogService::new(
            Arc::new(InMemoryQuestionLogRepository::new()),
            Arc::new(SequentialIdProvider::new("q")),
            Arc::new(FixedTimeProvider::new(5_000)),
        );
        RpcHandler::new(Arc::new(service), RateLimiter::new(burst, 1))
    }

    fn create_req(conversation_id: &str, user_id: &str) -> CreateLogRequest {
        CreateLogRequest {
            conversation_id: conversation_id.to_string(),
            user_id: user_id.to_string(),
            submit_timestamp: None,
            model_choices: vec![],
        }
    }

    #[tokio::test]
    async fn test_create_then_update_flow() {
        let handler = handler_with_limit(100);

        let created = handler.create(create_req("conv", "user")).await.unwrap();
        assert!(created.created);
        let id = created.question_id.unwrap();

        let res = handler
            .update_errors(UpdateErrorsRequest {
                question_id: id.clone(),
                error_codes: Some(vec!["TestError: This is a test".to_string()]),
            })
            .await
            .unwrap();
        assert!(res.updated);

        handler
            .update_response(UpdateResponseRequest {
                question_id: id.clone(),
                response_timestamp: None,
            })
            .await
            .unwrap();

        let log = handler.get(GetLogRequest { question_id: id }).await.unwrap();
        assert_eq!(log.error_codes, vec!["TestError: This is a test"]);
        assert_eq!(log.response_timestamp, Some(5_000));
    }

    #[tokio::test]
    async fn test_missing_fields_are_validation_errors() {
        let handler = handler_with_limit(100);

        let err = handler.create(create_req("", "user")).await.unwrap_err();
        assert_eq!(err.code(), code::VALIDATION_ERROR);

        let err = handler
            .update_models(UpdateModelsRequest {
                question_id: "q-1".to_string(),
                model_choices: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), code::VALIDATION_ERROR);
        assert!(err.message().contains("model_choices"));
    }

    #[tokio::test]
    async fn test_update_unknown_log_reports_not_updated() {
        let handler = handler_with_limit(100);

        let res = handler
            .update_models(UpdateModelsRequest {
                question_id: "ghost".to_string(),
                model_choices: Some(vec!["General".to_string()]),
            })
            .await
            .unwrap();
        assert!(!res.updated);
    }

    #[tokio::test]
    async fn test_get_unknown_is_not_found() {
        let handler = handler_with_limit(100);

        let err = handler
            .get(GetLogRequest {
                question_id: "ghost".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), code::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_writes_are_throttled() {
        let handler = handler_with_limit(1);

        handler.create(create_req("conv", "user")).await.unwrap();
        let err = handler.create(create_req("conv", "user")).await.unwrap_err();
        assert_eq!(err.code(), code::THROTTLED);

        // reads are not rate limited
        let stats = handler.stats().await.unwrap();
        assert_eq!(stats.total_logs, 1);
        assert!(stats.logging_enabled);
    }
}
