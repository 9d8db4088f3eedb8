//! Wire types for the conversation service.
//!
//! Field names follow the server's GraphQL schema, which is camelCase.
//! Every response field defaults when absent: a partial payload decodes into
//! empty collections and `None`s rather than failing.

use serde::{Deserialize, Deserializer, Serialize};

/// One entry in the conversation history.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            name: Some("User".to_string()),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            name: Some("System".to_string()),
            content: content.into(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == "user"
    }

    /// Display label: the explicit name, else "You" for the user and
    /// "Assistant" for everyone else.
    pub fn sender(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ if self.is_user() => "You",
            _ => "Assistant",
        }
    }

    /// Header shown above a bubble, or `None` for an anonymous user turn.
    pub fn header(&self) -> Option<String> {
        let named = self.name.as_deref().is_some_and(|n| !n.is_empty());
        (named || !self.is_user()).then(|| format!("{} ({})", self.sender(), self.role))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub assistant: String,
    pub question: String,
}

/// A 1–5 rating for one assistant.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Rating {
    pub assistant: String,
    pub rating: i32,
}

// ============================================================================
// Requests
// ============================================================================

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RunConversationRequest {
    pub conversation: Vec<Turn>,
    pub assistant_personalities: Vec<String>,
    pub lead_personality: String,
    pub num_rounds: u32,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FeedbackRequest {
    pub conversation: Vec<Turn>,
    pub feedback: Vec<Rating>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<Question>>,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RunConversationResponse {
    pub conversation: Vec<Turn>,
    pub questions: Option<Vec<Question>>,
    pub final_output: Option<String>,
    pub plan: Option<Plan>,
    pub conversation_memory: Option<ConversationMemory>,
    #[serde(deserialize_with = "null_as_default")]
    pub agent_collaboration: Vec<AgentCollaboration>,
    pub complexity_metrics: Option<ComplexityMetrics>,
    pub processing_status: Option<ProcessingStatus>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Plan {
    #[serde(deserialize_with = "null_as_default")]
    pub steps: Vec<PlanStep>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanStep {
    pub step_number: i64,
    pub completed: bool,
    pub step_name: String,
    pub step_description: String,
    pub step_explanation: String,
    pub step_output: String,
    pub step_full_text: String,
    #[serde(deserialize_with = "null_as_default")]
    pub subtasks: Vec<Subtask>,
}

/// A plan node. Subtasks nest to whatever depth the server sends.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Subtask {
    pub subtask_number: i64,
    pub completed: bool,
    pub subtask_name: String,
    pub subtask_description: String,
    pub subtask_explanation: String,
    pub subtask_output: String,
    pub subtask_full_text: String,
    #[serde(deserialize_with = "null_as_default")]
    pub subtasks: Vec<Subtask>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ConversationMemory {
    #[serde(deserialize_with = "null_as_default")]
    pub facts: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub arguments: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub decisions: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub direct_replies: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub recommended_actions: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub to_do_list: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub completed_tasks: Vec<String>,
    pub rounds_left: i64,
    pub decided_output_type: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentCollaboration {
    pub agent_name: String,
    pub priority_score: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub contributions: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub votes_cast: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub questions_asked: Vec<String>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ComplexityMetrics {
    pub overall_score: f64,
    pub reasoning_depth: f64,
    pub solution_complexity: f64,
    pub collaboration_intensity: f64,
    /// In `[0, 1]`.
    pub confidence_level: f64,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessingStatus {
    pub current_round: i64,
    pub total_rounds: i64,
    pub current_step: String,
    /// In `[0, 100]`.
    pub progress_percentage: f64,
    /// Seconds.
    pub estimated_time_remaining: Option<i64>,
}

/// `success` arrives as a boolean from a conforming server and as a
/// human-readable string from the reference one.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum FeedbackOutcome {
    Flag(bool),
    Message(String),
}

impl FeedbackOutcome {
    pub fn succeeded(&self) -> bool {
        match self {
            FeedbackOutcome::Flag(ok) => *ok,
            FeedbackOutcome::Message(msg) => !msg.trim().is_empty(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct FeedbackResponse {
    pub success: FeedbackOutcome,
}

/// GraphQL lists may come back as explicit `null`; treat that as empty.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_header_rules() {
        let anonymous_user = Turn {
            role: "user".into(),
            name: None,
            content: "hi".into(),
        };
        assert_eq!(anonymous_user.header(), None);
        assert_eq!(anonymous_user.sender(), "You");

        let named_user = Turn::user("hi");
        assert_eq!(named_user.header().as_deref(), Some("User (user)"));

        let anonymous_assistant = Turn {
            role: "assistant".into(),
            name: None,
            content: "hello".into(),
        };
        assert_eq!(
            anonymous_assistant.header().as_deref(),
            Some("Assistant (assistant)")
        );

        let empty_name = Turn {
            role: "assistant".into(),
            name: Some(String::new()),
            content: "hello".into(),
        };
        assert_eq!(empty_name.sender(), "Assistant");
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let request = RunConversationRequest {
            conversation: vec![Turn::user("Hello")],
            assistant_personalities: vec!["Helpful Assistant".into()],
            lead_personality: "Helpful Assistant".into(),
            num_rounds: 3,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["leadPersonality"], "Helpful Assistant");
        assert_eq!(json["numRounds"], 3);
        assert_eq!(json["assistantPersonalities"][0], "Helpful Assistant");
        assert_eq!(json["conversation"][0]["role"], "user");
    }

    #[test]
    fn test_feedback_request_omits_absent_questions() {
        let request = FeedbackRequest {
            conversation: vec![],
            feedback: vec![Rating {
                assistant: "Summarizer".into(),
                rating: 4,
            }],
            questions: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("questions").is_none());
        assert_eq!(json["feedback"][0]["rating"], 4);
    }

    #[test]
    fn test_partial_response_defaults() {
        let json = r#"{"conversation":[{"role":"assistant","name":null,"content":"Hi"}]}"#;
        let response: RunConversationResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.conversation.len(), 1);
        assert!(response.questions.is_none());
        assert!(response.final_output.is_none());
        assert!(response.plan.is_none());
        assert!(response.agent_collaboration.is_empty());
    }

    #[test]
    fn test_null_lists_decode_as_empty() {
        let json = r#"{"conversation":[],"agentCollaboration":null,
            "plan":{"steps":[{"stepNumber":1,"stepName":"Scope","subtasks":null}]}}"#;
        let response: RunConversationResponse = serde_json::from_str(json).unwrap();
        assert!(response.agent_collaboration.is_empty());
        let plan = response.plan.unwrap();
        assert_eq!(plan.steps[0].step_name, "Scope");
        assert!(plan.steps[0].subtasks.is_empty());
    }

    #[test]
    fn test_nested_subtasks_decode() {
        let json = r#"{"steps":[{"stepNumber":1,"subtasks":[
            {"subtaskNumber":1,"subtaskName":"a","subtasks":[
                {"subtaskNumber":1,"subtaskName":"a.1","subtasks":[]}]}]}]}"#;
        let plan: Plan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.steps[0].subtasks[0].subtasks[0].subtask_name, "a.1");
    }

    #[test]
    fn test_feedback_outcome_accepts_bool_and_string() {
        let flag: FeedbackResponse = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(flag.success.succeeded());
        let negative: FeedbackResponse = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert!(!negative.success.succeeded());
        let message: FeedbackResponse =
            serde_json::from_str(r#"{"success":"Feedback submitted successfully."}"#).unwrap();
        assert!(message.success.succeeded());
    }
}
