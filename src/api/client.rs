//! GraphQL client for the conversation service.
//!
//! `ConversationBackend` is the seam the event loop talks to; `GraphqlClient`
//! is the HTTP implementation. Every call carries its full context (history
//! plus configuration); the server holds no session state for us.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::query;
use super::types::{
    FeedbackRequest, FeedbackResponse, RunConversationRequest, RunConversationResponse,
};

#[async_trait]
pub trait ConversationBackend: Send + Sync {
    /// Returns the endpoint or a short label for logs.
    fn name(&self) -> &str;

    /// Run one exchange: the server plays every round and returns the new history.
    async fn run_conversation(
        &self,
        request: &RunConversationRequest,
    ) -> Result<RunConversationResponse, ApiError>;

    /// Submit ratings. `Ok(false)` means the server answered but declined.
    async fn submit_feedback(&self, request: &FeedbackRequest) -> Result<bool, ApiError>;
}

// ============================================================================
// GraphQL Envelope
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphqlRequest<'a, V: Serialize> {
    query: &'a str,
    operation_name: &'a str,
    variables: &'a V,
}

#[derive(Deserialize)]
struct GraphqlResponse<D> {
    data: Option<D>,
    #[serde(default)]
    errors: Option<Vec<GraphqlError>>,
}

#[derive(Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunConversationData {
    run_conversation: Option<RunConversationResponse>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitFeedbackData {
    submit_feedback: Option<FeedbackResponse>,
}

fn join_errors(errors: &[GraphqlError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

// ============================================================================
// Client
// ============================================================================

pub struct GraphqlClient {
    endpoint: String,
    client: reqwest::Client,
    run_document: String,
}

impl GraphqlClient {
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>, subtask_depth: usize) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().unwrap_or_else(|e| {
            warn!("Falling back to default HTTP client: {}", e);
            reqwest::Client::new()
        });

        Self {
            endpoint: endpoint.into(),
            client,
            run_document: query::run_conversation(subtask_depth),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST one operation and unwrap the GraphQL envelope.
    async fn execute<V, D>(&self, document: &str, operation: &str, variables: &V) -> Result<D, ApiError>
    where
        V: Serialize + Sync,
        D: DeserializeOwned,
    {
        let body = GraphqlRequest {
            query: document,
            operation_name: operation,
            variables,
        };

        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!("{} response: HTTP {} ({} bytes)", operation, status, text.len());

        let envelope = serde_json::from_str::<GraphqlResponse<D>>(&text);

        if !status.is_success() {
            // Validation failures come back as 4xx with a proper error list.
            if let Ok(GraphqlResponse {
                errors: Some(errors),
                ..
            }) = &envelope
                && !errors.is_empty()
            {
                return Err(ApiError::GraphQl(join_errors(errors)));
            }
            warn!("{} failed: HTTP {} - {}", operation, status, text);
            return Err(ApiError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        let envelope = envelope.map_err(|e| ApiError::Decode(e.to_string()))?;
        if let Some(errors) = envelope.errors.filter(|e| !e.is_empty()) {
            let message = join_errors(&errors);
            warn!("{} returned GraphQL errors: {}", operation, message);
            return Err(ApiError::GraphQl(message));
        }
        envelope.data.ok_or(ApiError::EmptyResponse)
    }
}

#[async_trait]
impl ConversationBackend for GraphqlClient {
    fn name(&self) -> &str {
        &self.endpoint
    }

    async fn run_conversation(
        &self,
        request: &RunConversationRequest,
    ) -> Result<RunConversationResponse, ApiError> {
        info!(
            "runConversation: {} turns, {} personalities, lead={}, rounds={}",
            request.conversation.len(),
            request.assistant_personalities.len(),
            request.lead_personality,
            request.num_rounds
        );
        let data: RunConversationData = self
            .execute(&self.run_document, query::RUN_CONVERSATION_OPERATION, request)
            .await?;
        let response = data.run_conversation.ok_or(ApiError::EmptyResponse)?;
        info!(
            "runConversation returned {} turns, final output: {}",
            response.conversation.len(),
            response.final_output.as_deref().is_some_and(|s| !s.is_empty())
        );
        Ok(response)
    }

    async fn submit_feedback(&self, request: &FeedbackRequest) -> Result<bool, ApiError> {
        info!("submitFeedback: {} ratings", request.feedback.len());
        let data: SubmitFeedbackData = self
            .execute(query::SUBMIT_FEEDBACK, query::SUBMIT_FEEDBACK_OPERATION, request)
            .await?;
        let response = data.submit_feedback.ok_or(ApiError::EmptyResponse)?;
        Ok(response.success.succeeded())
    }
}
