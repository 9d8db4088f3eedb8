//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;

use async_trait::async_trait;
use ratatui::text::Line;

use crate::api::{
    ApiError, ConversationBackend, FeedbackRequest, RunConversationRequest,
    RunConversationResponse, Turn,
};
use crate::core::config::SessionEnd;
use crate::core::roster::Roster;
use crate::core::state::App;

/// Collect a line's spans into plain text.
pub fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}

/// A backend that answers every call with a canned result and records the
/// requests it saw.
#[derive(Default)]
pub struct StubBackend {
    pub response: RunConversationResponse,
    pub fail_with: Option<String>,
    pub requests: Mutex<Vec<RunConversationRequest>>,
    pub feedback: Mutex<Vec<FeedbackRequest>>,
}

#[async_trait]
impl ConversationBackend for StubBackend {
    fn name(&self) -> &str {
        "stub"
    }

    async fn run_conversation(
        &self,
        request: &RunConversationRequest,
    ) -> Result<RunConversationResponse, ApiError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.fail_with {
            Some(message) => Err(ApiError::GraphQl(message.clone())),
            None => Ok(self.response.clone()),
        }
    }

    async fn submit_feedback(&self, request: &FeedbackRequest) -> Result<bool, ApiError> {
        self.feedback.lock().unwrap().push(request.clone());
        Ok(self.fail_with.is_none())
    }
}

/// Creates a test App with the default roster.
pub fn test_app() -> App {
    App::new(Roster::default(), SessionEnd::EndSession)
}

pub fn assistant_turn(name: &str, content: &str) -> Turn {
    Turn {
        role: "assistant".to_string(),
        name: Some(name.to_string()),
        content: content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_records_requests_and_fails_on_demand() {
        let stub = StubBackend {
            fail_with: Some("down".into()),
            ..Default::default()
        };
        let request = RunConversationRequest {
            conversation: vec![Turn::user("hi")],
            assistant_personalities: vec!["Summarizer".into()],
            lead_personality: "Summarizer".into(),
            num_rounds: 1,
        };
        let result = tokio_test::block_on(stub.run_conversation(&request));
        assert_eq!(result, Err(ApiError::GraphQl("down".into())));
        assert_eq!(stub.requests.lock().unwrap().len(), 1);
    }
}
