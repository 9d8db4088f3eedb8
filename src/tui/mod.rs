//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into `core::Action` values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Animating** (request in flight, toasts on screen): draws every ~80ms
//!   so the spinner moves and expired toasts disappear.
//! - **Idle**: sleeps up to 500ms, only redraws on events, resize or
//!   background results.
//!
//! ## Background Work
//!
//! Network calls run as tokio tasks against a `ConversationBackend`. Each
//! task reports back with a single `Action` over a std mpsc channel that
//! the loop drains once per iteration.

mod component;
mod components;
mod event;
pub mod markdown;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::api::{ConversationBackend, FeedbackRequest, GraphqlClient, RunConversationRequest};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::roster::Roster;
use crate::core::state::{App, SessionToken};
use crate::tui::component::EventHandler;
use crate::tui::components::{
    ChatEvent, ChatInput, ConfigEvent, ConfigPanelState, FeedbackEvent, FeedbackFormState,
    ThreadState,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Which pane receives editing keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Panel,
    Chat,
}

/// Content of the main pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Thread,
    Plan,
    Memory,
    Agents,
    Metrics,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Thread,
        View::Plan,
        View::Memory,
        View::Agents,
        View::Metrics,
    ];

    pub fn title(self) -> &'static str {
        match self {
            View::Thread => "Thread",
            View::Plan => "Plan",
            View::Memory => "Memory",
            View::Agents => "Agents",
            View::Metrics => "Metrics",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|v| *v == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub focus: Focus,
    pub view: View,
    // Persistent component states
    pub thread: ThreadState,
    pub config_panel: ConfigPanelState,
    pub chat_input: ChatInput,
    /// Feedback overlay (None = hidden)
    pub feedback: Option<FeedbackFormState>,
    /// Scroll offset shared by the insight views
    pub insight_scroll: u16,
}

impl TuiState {
    pub fn new(roster: &Roster) -> Self {
        Self {
            focus: Focus::Panel, // Nothing to chat about before a start
            view: View::Thread,
            thread: ThreadState::new(),
            config_panel: ConfigPanelState::new(roster),
            chat_input: ChatInput::new(),
            feedback: None,
            insight_scroll: 0,
        }
    }

    pub fn open_feedback(&mut self, assistants: &[String]) {
        self.feedback = Some(FeedbackFormState::new(assistants));
    }

    fn switch_view(&mut self, view: View) {
        self.view = view;
        self.insight_scroll = 0;
    }

    fn scroll_insights(&mut self, event: &TuiEvent) {
        self.insight_scroll = match event {
            TuiEvent::ScrollUp => self.insight_scroll.saturating_sub(1),
            TuiEvent::ScrollDown => self.insight_scroll.saturating_add(1),
            TuiEvent::ScrollPageUp => self.insight_scroll.saturating_sub(10),
            TuiEvent::ScrollPageDown => self.insight_scroll.saturating_add(10),
            _ => self.insight_scroll,
        };
    }
}

/// Everything the thread shows; a change re-pins it to the bottom.
fn thread_signature(app: &App) -> (u64, usize, usize, bool, bool, bool) {
    (
        app.session.0,
        app.history.len(),
        app.questions.len(),
        app.final_output.is_some(),
        app.last_error.is_some(),
        app.is_loading(),
    )
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets us tell Shift+Enter from Enter; terminals
        // without it ignore the request.
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

pub fn build_backend(config: &ResolvedConfig) -> Arc<dyn ConversationBackend> {
    Arc::new(GraphqlClient::new(
        config.endpoint.clone(),
        config.request_timeout,
        config.subtask_depth,
    ))
}

/// Apply an action and carry out its effect. Returns true on quit.
fn dispatch(
    app: &mut App,
    action: Action,
    backend: &Arc<dyn ConversationBackend>,
    tx: &mpsc::Sender<Action>,
) -> bool {
    match update(app, action) {
        Effect::None => false,
        Effect::Quit => true,
        Effect::RunConversation { token, request } => {
            spawn_conversation_request(backend.clone(), token, request, tx.clone());
            false
        }
        Effect::SubmitFeedback(request) => {
            spawn_feedback(backend.clone(), request, tx.clone());
            false
        }
    }
}

/// Turn a panel event into reducer actions.
fn config_actions(event: ConfigEvent) -> Vec<Action> {
    match event {
        ConfigEvent::SelectionChanged { selected, lead } => {
            let mut actions = vec![Action::SelectionChanged(selected)];
            if let Some(lead) = lead {
                actions.push(Action::LeadChanged(lead));
            }
            actions
        }
        ConfigEvent::LeadChanged(lead) => vec![Action::LeadChanged(lead)],
        ConfigEvent::RoundsChanged(rounds) => vec![Action::RoundsChanged(rounds)],
        ConfigEvent::RoundsRejected(raw) => vec![Action::RoundsRejected(raw)],
        ConfigEvent::Start => vec![Action::Start],
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let backend = build_backend(&config);
    info!("Using conversation backend at {}", backend.name());
    let mut app = App::from_config(&config);
    let mut tui = TuiState::new(&app.roster);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame
    let mut last_signature = thread_signature(&app);

    loop {
        if app.notices.prune(Instant::now()) {
            needs_redraw = true;
        }
        tui.config_panel.sync(&app.roster, app.is_loading());

        let signature = thread_signature(&app);
        if signature != last_signature {
            tui.thread.pin_to_bottom();
            last_signature = signature;
        }

        let animating = app.is_loading() || !app.notices.is_empty();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        // Dynamic poll timeout: short when animating (~12fps), long when idle
        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);

        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if matches!(event, TuiEvent::Resize) {
                continue;
            }

            if matches!(event, TuiEvent::ForceQuit) {
                should_quit |= dispatch(&mut app, Action::Quit, &backend, &tx);
                continue;
            }

            // The feedback overlay is modal
            if let Some(form) = tui.feedback.as_mut() {
                match form.handle_event(&event) {
                    Some(FeedbackEvent::Submit(ratings)) => {
                        should_quit |=
                            dispatch(&mut app, Action::SubmitFeedback(ratings), &backend, &tx);
                        tui.feedback = None;
                    }
                    Some(FeedbackEvent::Dismiss) => tui.feedback = None,
                    None => {}
                }
                continue;
            }

            match event {
                TuiEvent::OpenFeedback => {
                    if app.can_give_feedback() {
                        tui.open_feedback(&app.roster.selected);
                    } else {
                        app.notices
                            .info("Feedback opens once the assistants have replied.");
                    }
                }
                TuiEvent::FocusNext | TuiEvent::FocusPrev => {
                    tui.focus = match tui.focus {
                        Focus::Panel => Focus::Chat,
                        Focus::Chat => Focus::Panel,
                    };
                }
                TuiEvent::NextView => tui.switch_view(tui.view.next()),
                TuiEvent::PrevView => tui.switch_view(tui.view.prev()),
                TuiEvent::ScrollUp
                | TuiEvent::ScrollDown
                | TuiEvent::ScrollPageUp
                | TuiEvent::ScrollPageDown
                | TuiEvent::ScrollToBottom => {
                    if tui.view == View::Thread {
                        tui.thread.handle_event(&event);
                    } else {
                        tui.scroll_insights(&event);
                    }
                }
                TuiEvent::Escape => {
                    if tui.focus == Focus::Chat {
                        tui.focus = Focus::Panel;
                    }
                }
                _ => match tui.focus {
                    Focus::Panel => {
                        if let Some(config_event) = tui.config_panel.handle_event(&event) {
                            let started = config_event == ConfigEvent::Start;
                            for action in config_actions(config_event) {
                                should_quit |= dispatch(&mut app, action, &backend, &tx);
                            }
                            if started && app.is_active() {
                                tui.focus = Focus::Chat;
                                tui.switch_view(View::Thread);
                            }
                            tui.config_panel.sync(&app.roster, app.is_loading());
                        }
                    }
                    Focus::Chat => {
                        if let Some(ChatEvent::Send(text)) = tui.chat_input.handle_event(&event) {
                            should_quit |= dispatch(&mut app, Action::Send(text), &backend, &tx);
                        }
                    }
                },
            }
        }

        if should_quit {
            break;
        }

        // Results from background tasks
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if dispatch(&mut app, action, &backend, &tx) {
                should_quit = true;
            }
        }
        if should_quit {
            break;
        }
    }

    info!("Roundtable shutting down");
    ratatui::restore();
    Ok(())
}

fn spawn_conversation_request(
    backend: Arc<dyn ConversationBackend>,
    token: SessionToken,
    request: RunConversationRequest,
    tx: mpsc::Sender<Action>,
) {
    info!(
        "Spawning runConversation for {:?} ({} turns)",
        token,
        request.conversation.len()
    );
    tokio::spawn(async move {
        let started = Instant::now();
        let result = backend.run_conversation(&request).await;
        match &result {
            Ok(response) => info!(
                "runConversation for {:?} finished in {}ms with {} turns",
                token,
                started.elapsed().as_millis(),
                response.conversation.len()
            ),
            Err(e) => warn!("runConversation for {:?} failed: {}", token, e),
        }
        if tx
            .send(Action::ConversationLoaded { token, result })
            .is_err()
        {
            warn!("Failed to deliver conversation result: receiver dropped");
        }
    });
}

fn spawn_feedback(
    backend: Arc<dyn ConversationBackend>,
    request: FeedbackRequest,
    tx: mpsc::Sender<Action>,
) {
    info!("Spawning submitFeedback ({} ratings)", request.feedback.len());
    tokio::spawn(async move {
        let result = backend.submit_feedback(&request).await;
        if let Err(e) = &result {
            warn!("submitFeedback failed: {}", e);
        }
        if tx.send(Action::FeedbackSubmitted(result)).is_err() {
            warn!("Failed to deliver feedback result: receiver dropped");
        }
    });
}
