//! # Application State
//!
//! Core business state for Roundtable. Domain logic only, no TUI types.
//! Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── roster: Roster                 // personalities, lead, rounds
//! ├── phase: Phase                   // Idle → Active ⇄ Awaiting → Finished
//! ├── session: SessionToken          // bumped on every start
//! ├── session_id: Option<Uuid>       // log correlation for the current session
//! ├── started_at: Option<DateTime>   // shown in the title bar
//! ├── history: Vec<Turn>             // single source of truth for the thread
//! ├── questions: Vec<Question>       // clarifying questions from the last response
//! ├── final_output: Option<String>   // lead's final answer, if any
//! ├── insights: Insights             // plan / memory / collaboration / metrics / status
//! ├── last_error: Option<String>     // inline error block
//! ├── notices: Notices               // toasts
//! ├── feedback_pending: bool         // a feedback submission is in flight
//! └── session_end: SessionEnd        // termination policy
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use chrono::{DateTime, Local};
use uuid::Uuid;

use crate::api::{
    AgentCollaboration, ComplexityMetrics, ConversationMemory, Plan, ProcessingStatus, Question,
    RunConversationResponse, Turn,
};
use crate::core::config::{ResolvedConfig, SessionEnd};
use crate::core::notice::Notices;
use crate::core::roster::Roster;

pub const WELCOME_MESSAGE: &str =
    "Welcome! Configure your assistants on the left and start the conversation.";

/// Where the conversation is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No conversation started yet.
    Idle,
    /// Accepting messages.
    Active,
    /// A request is in flight; the history already holds the user's turn.
    Awaiting,
    /// The planned rounds are done; a new start is required.
    Finished,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Idle => "Not started",
            Phase::Active => "Active",
            Phase::Awaiting => "Waiting for assistants",
            Phase::Finished => "Finished",
        }
    }
}

/// Identifies one start/response cycle. Responses carrying an older token
/// belong to a superseded session and are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SessionToken(pub u64);

impl SessionToken {
    pub fn next(self) -> Self {
        SessionToken(self.0 + 1)
    }
}

/// Auxiliary artifacts returned alongside the conversation. Replaced
/// wholesale by every response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Insights {
    pub plan: Option<Plan>,
    pub memory: Option<ConversationMemory>,
    pub collaboration: Vec<AgentCollaboration>,
    pub metrics: Option<ComplexityMetrics>,
    pub status: Option<ProcessingStatus>,
}

impl Insights {
    pub fn from_response(response: &RunConversationResponse) -> Self {
        Self {
            plan: response.plan.clone(),
            memory: response.conversation_memory.clone(),
            collaboration: response.agent_collaboration.clone(),
            metrics: response.complexity_metrics.clone(),
            status: response.processing_status.clone(),
        }
    }
}

pub struct App {
    pub roster: Roster,
    pub phase: Phase,
    pub session: SessionToken,
    pub session_id: Option<Uuid>,
    pub started_at: Option<DateTime<Local>>,
    pub history: Vec<Turn>,
    pub questions: Vec<Question>,
    pub final_output: Option<String>,
    pub insights: Insights,
    pub last_error: Option<String>,
    pub notices: Notices,
    pub feedback_pending: bool,
    pub session_end: SessionEnd,
}

impl App {
    pub fn new(roster: Roster, session_end: SessionEnd) -> Self {
        Self {
            roster,
            phase: Phase::Idle,
            session: SessionToken::default(),
            session_id: None,
            started_at: None,
            history: vec![Turn::system(WELCOME_MESSAGE)],
            questions: Vec::new(),
            final_output: None,
            insights: Insights::default(),
            last_error: None,
            notices: Notices::default(),
            feedback_pending: false,
            session_end,
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(config.roster.clone(), config.session_end)
    }

    /// True while a conversation request is in flight.
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Awaiting
    }

    /// True once a start has happened and the session hasn't finished.
    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Active | Phase::Awaiting)
    }

    /// Whether the start action is enabled right now.
    pub fn can_start(&self) -> bool {
        self.roster.can_start(self.is_loading())
    }

    /// Feedback needs at least one assistant turn to rate.
    pub fn can_give_feedback(&self) -> bool {
        !self.feedback_pending
            && !self.is_loading()
            && !self.roster.selected.is_empty()
            && self.history.iter().any(|t| t.role == "assistant")
    }
}
