//! # Actions
//!
//! Everything that can happen in Roundtable becomes an `Action`.
//! User presses Enter in the chat box? That's `Action::Send(text)`.
//! The backend answers? That's `Action::ConversationLoaded { token, result }`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an `Effect` describing any I/O the event loop
//! should perform. No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! This makes everything testable: feed actions, assert on state and effects.

use log::{debug, info, warn};
use uuid::Uuid;

use crate::api::{
    ApiError, FeedbackRequest, Rating, RunConversationRequest, RunConversationResponse, Turn,
};
use crate::core::config::SessionEnd;
use crate::core::state::{App, Insights, Phase, SessionToken};

pub const START_REJECTED: &str = "Please select personalities, a lead, and set rounds.";
pub const SEND_REJECTED_INACTIVE: &str = "Please start a new conversation first.";
pub const SEND_REJECTED_BUSY: &str = "The assistants are still responding. Please wait.";
pub const SESSION_FINISHED: &str =
    "All planned rounds are complete. Start a new conversation to continue.";

#[derive(Debug)]
pub enum Action {
    Quit,
    /// Config panel: full next selection.
    SelectionChanged(Vec<String>),
    /// Config panel: next lead (may be empty).
    LeadChanged(String),
    /// Config panel: accepted round count.
    RoundsChanged(u32),
    /// Config panel: raw text that didn't parse as rounds.
    RoundsRejected(String),
    Start,
    Send(String),
    ConversationLoaded {
        token: SessionToken,
        result: Result<RunConversationResponse, ApiError>,
    },
    SubmitFeedback(Vec<Rating>),
    FeedbackSubmitted(Result<bool, ApiError>),
}

#[derive(Debug, PartialEq)]
pub enum Effect {
    None,
    Quit,
    RunConversation {
        token: SessionToken,
        request: RunConversationRequest,
    },
    SubmitFeedback(FeedbackRequest),
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Quit => Effect::Quit,
        Action::SelectionChanged(selected) => {
            if config_locked(app, "selection") {
                return Effect::None;
            }
            app.roster.selected = selected;
            // The panel sends the lead change separately; keep the invariant
            // even if it doesn't.
            if !app.roster.lead.is_empty() && !app.roster.is_selected(&app.roster.lead) {
                app.roster.lead = app.roster.selected.first().cloned().unwrap_or_default();
            }
            Effect::None
        }
        Action::LeadChanged(lead) => {
            if config_locked(app, "lead") {
                return Effect::None;
            }
            if lead.is_empty() || app.roster.is_selected(&lead) {
                app.roster.lead = lead;
            } else {
                warn!("Ignoring lead '{}': not among the selected personalities", lead);
            }
            Effect::None
        }
        Action::RoundsChanged(rounds) => {
            if config_locked(app, "rounds") {
                return Effect::None;
            }
            if rounds >= 1 {
                app.roster.rounds = rounds;
            }
            Effect::None
        }
        Action::RoundsRejected(raw) => {
            app.notices
                .warning(format!("'{}' is not a valid number of rounds (whole number ≥ 1).", raw.trim()));
            Effect::None
        }
        Action::Start => start(app),
        Action::Send(text) => send(app, text),
        Action::ConversationLoaded { token, result } => conversation_loaded(app, token, result),
        Action::SubmitFeedback(ratings) => submit_feedback(app, ratings),
        Action::FeedbackSubmitted(result) => {
            app.feedback_pending = false;
            match result {
                Ok(true) => app.notices.success("Feedback submitted. Thank you!"),
                Ok(false) => app.notices.warning("The server did not accept the feedback."),
                Err(e) => app.notices.error(format!("Feedback failed: {e}")),
            }
            Effect::None
        }
    }
}

/// Config edits are frozen while a request is in flight.
fn config_locked(app: &App, field: &str) -> bool {
    if app.is_loading() {
        warn!("Ignoring {} change while a request is in flight", field);
        true
    } else {
        false
    }
}

fn start(app: &mut App) -> Effect {
    if let Err(e) = app.roster.validate() {
        debug!("Start rejected: {}", e);
        app.notices.error(START_REJECTED);
        return Effect::None;
    }

    if app.is_loading() {
        info!("Starting over while {:?} is in flight; its response will be dropped", app.session);
    }

    app.session = app.session.next();
    let session_id = Uuid::new_v4();
    app.session_id = Some(session_id);
    app.started_at = Some(chrono::Local::now());
    app.phase = Phase::Active;
    app.history = vec![Turn::system(app.roster.announcement())];
    app.questions.clear();
    app.final_output = None;
    app.insights = Insights::default();
    app.last_error = None;

    info!(
        "Session {:?} ({}) started: lead={}, selected={:?}, rounds={}",
        app.session, session_id, app.roster.lead, app.roster.selected, app.roster.rounds
    );
    Effect::None
}

fn send(app: &mut App, text: String) -> Effect {
    match app.phase {
        Phase::Idle | Phase::Finished => {
            app.notices.warning(SEND_REJECTED_INACTIVE);
            return Effect::None;
        }
        Phase::Awaiting => {
            app.notices.warning(SEND_REJECTED_BUSY);
            return Effect::None;
        }
        Phase::Active => {}
    }

    let content = text.trim();
    if content.is_empty() {
        return Effect::None;
    }

    app.history.push(Turn::user(content));
    app.questions.clear();
    app.final_output = None;
    app.last_error = None;
    app.phase = Phase::Awaiting;

    let request = RunConversationRequest {
        conversation: app.history.clone(),
        assistant_personalities: app.roster.selected.clone(),
        lead_personality: app.roster.lead.clone(),
        num_rounds: app.roster.rounds,
    };
    debug!(
        "Session {:?}: sending {} turns",
        app.session,
        request.conversation.len()
    );
    Effect::RunConversation {
        token: app.session,
        request,
    }
}

fn conversation_loaded(
    app: &mut App,
    token: SessionToken,
    result: Result<RunConversationResponse, ApiError>,
) -> Effect {
    if token != app.session || app.phase != Phase::Awaiting {
        info!(
            "Dropping response for {:?} (current {:?}, phase {:?})",
            token, app.session, app.phase
        );
        return Effect::None;
    }

    match result {
        Ok(response) => {
            app.insights = Insights::from_response(&response);
            app.history = response.conversation;
            app.questions = response.questions.unwrap_or_default();
            app.final_output = response.final_output.filter(|s| !s.trim().is_empty());

            let reached_total = app.history.len() >= app.roster.expected_turns();
            let finished = app.final_output.is_some() && reached_total;
            app.phase = match (finished, app.session_end) {
                (true, SessionEnd::EndSession) => {
                    app.notices.info(SESSION_FINISHED);
                    Phase::Finished
                }
                _ => Phase::Active,
            };
            debug!(
                "Session {:?}: {} turns, {} questions, phase {:?}",
                app.session,
                app.history.len(),
                app.questions.len(),
                app.phase
            );
        }
        Err(e) => {
            let message = e.to_string();
            app.notices.error(format!("Error: {message}"));
            app.last_error = Some(message);
            app.phase = Phase::Active;
        }
    }
    Effect::None
}

fn submit_feedback(app: &mut App, ratings: Vec<Rating>) -> Effect {
    if app.feedback_pending {
        app.notices.warning("Feedback is already being submitted.");
        return Effect::None;
    }
    if ratings.is_empty() {
        return Effect::None;
    }
    app.feedback_pending = true;
    Effect::SubmitFeedback(FeedbackRequest {
        conversation: app.history.clone(),
        feedback: ratings,
        questions: (!app.questions.is_empty()).then(|| app.questions.clone()),
    })
}
