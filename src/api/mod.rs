pub mod client;
pub mod error;
pub mod query;
pub mod types;

pub use client::{ConversationBackend, GraphqlClient};
pub use error::ApiError;
pub use types::{
    AgentCollaboration, ComplexityMetrics, ConversationMemory, FeedbackRequest, Plan, PlanStep,
    ProcessingStatus, Question, Rating, RunConversationRequest, RunConversationResponse, Subtask,
    Turn,
};
