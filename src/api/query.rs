//! GraphQL documents for the two mutations the client issues.
//!
//! GraphQL has no recursive selections, so the `subtasks` selection for plan
//! steps is generated down to a fixed depth.

pub const RUN_CONVERSATION_OPERATION: &str = "RunConversation";
pub const SUBMIT_FEEDBACK_OPERATION: &str = "SubmitFeedback";

/// Nesting depth requested for plan subtasks when the config doesn't say.
pub const DEFAULT_SUBTASK_DEPTH: usize = 4;

const SUBTASK_FIELDS: &str = "subtaskNumber completed subtaskName subtaskDescription \
    subtaskExplanation subtaskOutput subtaskFullText";

/// Build the `subtasks { ... }` selection nested `depth` levels deep.
/// Depth 0 selects nothing.
pub fn subtask_selection(depth: usize) -> String {
    (0..depth).fold(String::new(), |inner, _| {
        if inner.is_empty() {
            format!("subtasks {{ {SUBTASK_FIELDS} }}")
        } else {
            format!("subtasks {{ {SUBTASK_FIELDS} {inner} }}")
        }
    })
}

/// The `runConversation` mutation with every artifact the client can display.
pub fn run_conversation(subtask_depth: usize) -> String {
    format!(
        r#"mutation {RUN_CONVERSATION_OPERATION}(
  $conversation: [ConversationInput!]!,
  $assistantPersonalities: [String!]!,
  $leadPersonality: String!,
  $numRounds: Int!
) {{
  runConversation(
    conversation: $conversation,
    assistantPersonalities: $assistantPersonalities,
    leadPersonality: $leadPersonality,
    numRounds: $numRounds
  ) {{
    conversation {{ role name content }}
    questions {{ assistant question }}
    finalOutput
    plan {{
      steps {{
        stepNumber completed stepName stepDescription stepExplanation stepOutput stepFullText
        {subtasks}
      }}
    }}
    conversationMemory {{
      facts arguments decisions directReplies recommendedActions toDoList completedTasks
      roundsLeft decidedOutputType
    }}
    agentCollaboration {{ agentName priorityScore contributions votesCast questionsAsked }}
    complexityMetrics {{
      overallScore reasoningDepth solutionComplexity collaborationIntensity confidenceLevel
    }}
    processingStatus {{
      currentRound totalRounds currentStep progressPercentage estimatedTimeRemaining
    }}
  }}
}}"#,
        subtasks = subtask_selection(subtask_depth),
    )
}

pub const SUBMIT_FEEDBACK: &str = r#"mutation SubmitFeedback(
  $conversation: [ConversationInput!]!,
  $feedback: [FeedbackInput!]!,
  $questions: [QuestionInput!]
) {
  submitFeedback(
    conversation: $conversation,
    feedback: $feedback,
    questions: $questions
  ) {
    success
  }
}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtask_selection_depth_zero_is_empty() {
        assert_eq!(subtask_selection(0), "");
    }

    #[test]
    fn test_subtask_selection_nests() {
        let selection = subtask_selection(3);
        assert_eq!(selection.matches("subtasks {").count(), 3);
        assert_eq!(selection.matches("subtaskName").count(), 3);
        // Braces must balance for the document to parse server-side.
        assert_eq!(selection.matches('{').count(), selection.matches('}').count());
    }

    #[test]
    fn test_run_conversation_document_shape() {
        let doc = run_conversation(DEFAULT_SUBTASK_DEPTH);
        assert!(doc.starts_with("mutation RunConversation("));
        assert!(doc.contains("finalOutput"));
        assert!(doc.contains("conversationMemory"));
        assert!(doc.contains("processingStatus"));
        assert_eq!(doc.matches('{').count(), doc.matches('}').count());
        assert_eq!(doc.matches('(').count(), doc.matches(')').count());
    }

    #[test]
    fn test_submit_feedback_document_shape() {
        assert!(SUBMIT_FEEDBACK.contains("submitFeedback("));
        assert!(SUBMIT_FEEDBACK.contains("$questions: [QuestionInput!]"));
    }
}
