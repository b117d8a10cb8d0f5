//! Question Log Client Implementation

use crate::error::{Result, SdkError};
use crate::types::{
    CreateLogRequest, CreateLogResponse, QueryLogsResponse, StatsResponse, UpdateLogResponse,
};
use async_trait::async_trait;
use jsonrpsee::core::client::ClientT;
use jsonrpsee::core::params::ObjectParams;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use qlog_core::domain::{QuestionId, QuestionLog};
use qlog_core::port::QuestionLogger;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;

/// Question log daemon client
///
/// # Example
///
/// ```no_run
/// use qlog_sdk::QuestionLogClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = QuestionLogClient::connect("http://127.0.0.1:9631").await?;
/// let stats = client.stats().await?;
/// println!("{} logs stored", stats.total_logs);
/// # Ok(())
/// # }
/// ```
pub struct QuestionLogClient {
    client: HttpClient,
}

/// Turn a serializable struct into named JSON-RPC params
fn object_params<T: Serialize>(value: &T) -> Result<ObjectParams> {
    let Value::Object(map) = serde_json::to_value(value)? else {
        return Err(SdkError::Other("params must serialize to an object".to_string()));
    };

    let mut params = ObjectParams::new();
    for (key, value) in map {
        params.insert(&key, value)?;
    }
    Ok(params)
}

impl QuestionLogClient {
    /// Connect to the question log daemon
    ///
    /// # Arguments
    ///
    /// * `url` - RPC endpoint URL (e.g., `http://127.0.0.1:9631`)
    pub async fn connect(url: impl AsRef<str>) -> Result<Self> {
        let url = url.as_ref();

        let client = HttpClientBuilder::default()
            .request_timeout(Duration::from_secs(30))
            .build(url)
            .map_err(|e| SdkError::Connection(format!("Failed to create client: {}", e)))?;

        Ok(Self { client })
    }

    async fn call<R>(&self, method: &str, params: Value) -> Result<R>
    where
        R: serde::de::DeserializeOwned,
    {
        let response: R = self.client.request(method, object_params(&params)?).await?;
        Ok(response)
    }

    /// Create a question log
    ///
    /// `question_id` in the response is `None` when the daemon runs with
    /// logging disabled.
    pub async fn create(
        &self,
        conversation_id: impl Into<String>,
        user_id: impl Into<String>,
        submit_timestamp: Option<i64>,
        model_choices: Vec<String>,
    ) -> Result<CreateLogResponse> {
        let request = CreateLogRequest {
            conversation_id: conversation_id.into(),
            user_id: user_id.into(),
            submit_timestamp,
            model_choices,
        };
        let response: CreateLogResponse = self
            .client
            .request("log.create.v1", object_params(&request)?)
            .await?;

        Ok(response)
    }

    /// Replace the model choices of a log
    pub async fn update_models(
        &self,
        question_id: &str,
        model_choices: Vec<String>,
    ) -> Result<UpdateLogResponse> {
        self.call(
            "log.update_models.v1",
            json!({ "question_id": question_id, "model_choices": model_choices }),
        )
        .await
    }

    /// Record the response time; `None` lets the daemon use its clock
    pub async fn update_response(
        &self,
        question_id: &str,
        response_timestamp: Option<i64>,
    ) -> Result<UpdateLogResponse> {
        self.call(
            "log.update_response.v1",
            json!({ "question_id": question_id, "response_timestamp": response_timestamp }),
        )
        .await
    }

    /// Append error codes to a log
    pub async fn update_errors(
        &self,
        question_id: &str,
        error_codes: Vec<String>,
    ) -> Result<UpdateLogResponse> {
        self.call(
            "log.update_errors.v1",
            json!({ "question_id": question_id, "error_codes": error_codes }),
        )
        .await
    }

    /// Record token counts
    pub async fn update_tokens(
        &self,
        question_id: &str,
        user_query_tokens: Option<i64>,
        bot_response_tokens: Option<i64>,
    ) -> Result<UpdateLogResponse> {
        self.call(
            "log.update_tokens.v1",
            json!({
                "question_id": question_id,
                "user_query_tokens": user_query_tokens,
                "bot_response_tokens": bot_response_tokens,
            }),
        )
        .await
    }

    /// Re-attribute a log to another user
    pub async fn update_user(&self, question_id: &str, user_id: &str) -> Result<UpdateLogResponse> {
        self.call(
            "log.update_user.v1",
            json!({ "question_id": question_id, "user_id": user_id }),
        )
        .await
    }

    /// Fetch a single log
    pub async fn get(&self, question_id: &str) -> Result<QuestionLog> {
        self.call("log.get.v1", json!({ "question_id": question_id }))
            .await
    }

    /// Logs for a conversation and user, newest first
    pub async fn query(
        &self,
        conversation_id: &str,
        user_id: &str,
        limit: Option<i64>,
    ) -> Result<QueryLogsResponse> {
        self.call(
            "log.query.v1",
            json!({ "conversation_id": conversation_id, "user_id": user_id, "limit": limit }),
        )
        .await
    }

    /// Recent logs for a conversation regardless of user
    pub async fn query_recent(
        &self,
        conversation_id: &str,
        minutes_back: Option<i64>,
    ) -> Result<QueryLogsResponse> {
        self.call(
            "log.query_recent.v1",
            json!({ "conversation_id": conversation_id, "minutes_back": minutes_back }),
        )
        .await
    }

    /// Service statistics
    pub async fn stats(&self) -> Result<StatsResponse> {
        self.call("admin.stats.v1", json!({})).await
    }
}

#[async_trait]
impl QuestionLogger for QuestionLogClient {
    async fn create_question_log(
        &self,
        conversation_id: &str,
        user_id: &str,
    ) -> qlog_core::Result<Option<QuestionId>> {
        let response = self.create(conversation_id, user_id, None, Vec::new()).await?;
        Ok(response.question_id.map(QuestionId::new))
    }

    async fn update_question_log_models(
        &self,
        question_id: &QuestionId,
        models: &[String],
    ) -> qlog_core::Result<()> {
        self.update_models(question_id.as_str(), models.to_vec())
            .await?;
        Ok(())
    }

    async fn update_question_log_response(
        &self,
        question_id: &QuestionId,
    ) -> qlog_core::Result<()> {
        self.update_response(question_id.as_str(), None).await?;
        Ok(())
    }

    async fn update_question_log_errors(
        &self,
        question_id: &QuestionId,
        errors: &[String],
    ) -> qlog_core::Result<()> {
        self.update_errors(question_id.as_str(), errors.to_vec())
            .await?;
        Ok(())
    }
}
