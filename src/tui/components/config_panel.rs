//! # Config Panel
//!
//! Left-hand panel where the user picks personalities, the lead and the
//! round count, then starts a conversation.
//!
//! The panel is controlled: `ConfigPanelState::sync` copies the roster from
//! `App` every frame, and each edit is emitted as a `ConfigEvent` holding the
//! complete next value (computed with the `Roster` rules). The reducer decides
//! whether to apply it.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `ConfigPanelState` lives in `TuiState`
//! - `ConfigPanel` is created each frame with borrowed state

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::core::roster::{Roster, RoundsInput, parse_rounds};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::primitives::{Button, Checkbox, TextField, focus_card, label};
use crate::tui::event::TuiEvent;

pub const START_LABEL: &str = "Start New Conversation";
pub const BUSY_LABEL: &str = "Conversation in Progress...";
pub const NO_SELECTION_PLACEHOLDER: &str = "Select personalities first";
pub const NO_LEAD_PLACEHOLDER: &str = "Select a lead";
pub const ROUNDS_HINT: &str = "must be a whole number ≥ 1";

/// High-level events emitted by the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigEvent {
    /// Full next selection; `lead` is `Some` only when the lead was removed.
    SelectionChanged {
        selected: Vec<String>,
        lead: Option<String>,
    },
    LeadChanged(String),
    RoundsChanged(u32),
    /// Raw text that isn't a valid round count. Not applied.
    RoundsRejected(String),
    Start,
}

/// A focusable row of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    Personality(usize),
    Lead,
    Rounds,
    Start,
}

pub struct ConfigPanelState {
    /// Snapshot of the app's roster, refreshed by `sync`.
    pub roster: Roster,
    /// True while a request is outstanding.
    pub locked: bool,
    /// Index into `rows()`.
    pub cursor: usize,
    /// Text of the rounds field as typed.
    pub rounds_input: String,
    /// The rounds field holds text that was rejected.
    pub rounds_invalid: bool,
}

impl ConfigPanelState {
    pub fn new(roster: &Roster) -> Self {
        Self {
            rounds_input: roster.rounds.to_string(),
            roster: roster.clone(),
            locked: false,
            cursor: 0,
            rounds_invalid: false,
        }
    }

    /// Pull the latest roster and lock flag from the app.
    pub fn sync(&mut self, roster: &Roster, locked: bool) {
        if self.roster != *roster {
            self.roster = roster.clone();
        }
        self.locked = locked;
        // Keep the typed text unless it disagrees with the applied value.
        if !self.rounds_invalid && parse_rounds(&self.rounds_input) != RoundsInput::Accept(roster.rounds) {
            self.rounds_input = roster.rounds.to_string();
        }
        self.cursor = self.cursor.min(self.rows().len().saturating_sub(1));
    }

    pub fn rows(&self) -> Vec<Row> {
        (0..self.roster.available.len())
            .map(Row::Personality)
            .chain([Row::Lead, Row::Rounds, Row::Start])
            .collect()
    }

    pub fn current_row(&self) -> Row {
        self.rows().get(self.cursor).copied().unwrap_or(Row::Start)
    }

    pub fn can_start(&self) -> bool {
        self.roster.can_start(self.locked)
    }

    fn move_cursor(&mut self, step: isize) {
        let len = self.rows().len() as isize;
        if len == 0 {
            return;
        }
        self.cursor = (self.cursor as isize + step).rem_euclid(len) as usize;
    }

    fn toggle(&mut self, index: usize) -> Option<ConfigEvent> {
        let personality = self.roster.available.get(index)?;
        let toggled = self.roster.toggle(personality);
        Some(ConfigEvent::SelectionChanged {
            selected: toggled.selected,
            lead: toggled.lead,
        })
    }

    fn cycle_lead(&mut self, step: isize) -> Option<ConfigEvent> {
        self.roster
            .cycle_lead(step)
            .filter(|next| *next != self.roster.lead)
            .map(ConfigEvent::LeadChanged)
    }

    fn edit_rounds(&mut self, edit: impl FnOnce(&mut String)) -> Option<ConfigEvent> {
        edit(&mut self.rounds_input);
        match parse_rounds(&self.rounds_input) {
            RoundsInput::Accept(n) => {
                self.rounds_invalid = false;
                Some(ConfigEvent::RoundsChanged(n))
            }
            RoundsInput::Reject => {
                self.rounds_invalid = true;
                Some(ConfigEvent::RoundsRejected(self.rounds_input.clone()))
            }
        }
    }
}

impl EventHandler for ConfigPanelState {
    type Event = ConfigEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.locked {
            return None;
        }
        match event {
            TuiEvent::CursorUp => {
                self.move_cursor(-1);
                return None;
            }
            TuiEvent::CursorDown => {
                self.move_cursor(1);
                return None;
            }
            _ => {}
        }

        match (self.current_row(), event) {
            (Row::Personality(i), TuiEvent::Submit | TuiEvent::InputChar(' ')) => self.toggle(i),
            (Row::Lead, TuiEvent::CursorLeft) => self.cycle_lead(-1),
            (Row::Lead, TuiEvent::CursorRight | TuiEvent::Submit | TuiEvent::InputChar(' ')) => {
                self.cycle_lead(1)
            }
            (Row::Rounds, TuiEvent::InputChar(c)) if !c.is_control() => {
                let c = *c;
                self.edit_rounds(|s| s.push(c))
            }
            (Row::Rounds, TuiEvent::Paste(text)) => {
                let text = text.trim().to_string();
                self.edit_rounds(|s| s.push_str(&text))
            }
            (Row::Rounds, TuiEvent::Backspace) => self.edit_rounds(|s| {
                s.pop();
            }),
            (Row::Rounds, TuiEvent::Submit) => {
                self.move_cursor(1);
                None
            }
            (Row::Start, TuiEvent::Submit) => self.can_start().then_some(ConfigEvent::Start),
            _ => None,
        }
    }
}

/// Transient render wrapper for the config panel.
pub struct ConfigPanel<'a> {
    pub state: &'a mut ConfigPanelState,
    pub focused: bool,
}

impl<'a> ConfigPanel<'a> {
    pub fn new(state: &'a mut ConfigPanelState, focused: bool) -> Self {
        Self { state, focused }
    }

    fn is_cursor(&self, row: Row) -> bool {
        self.focused && !self.state.locked && self.state.current_row() == row
    }

    pub fn lines(&self) -> Vec<Line<'static>> {
        let state = &*self.state;
        let enabled = !state.locked;
        let roster = &state.roster;
        let mut lines = vec![label("Personalities", enabled)];

        for (i, name) in roster.available.iter().enumerate() {
            let checkbox = Checkbox {
                label: name,
                checked: roster.is_selected(name),
                enabled,
                focused: self.is_cursor(Row::Personality(i)),
            };
            lines.push(checkbox.line());
        }

        lines.push(Line::default());
        lines.push(label("Lead personality", enabled));
        let (lead_value, lead_placeholder) = if roster.selected.is_empty() {
            ("", NO_SELECTION_PLACEHOLDER)
        } else {
            (roster.lead.as_str(), NO_LEAD_PLACEHOLDER)
        };
        let mut lead_line = TextField {
            value: lead_value,
            placeholder: lead_placeholder,
            invalid: false,
            enabled: enabled && !roster.selected.is_empty(),
            focused: self.is_cursor(Row::Lead),
        }
        .line();
        if roster.selected.len() > 1 {
            lead_line.push_span(Span::styled("  ◂ ▸", Style::default().fg(Color::DarkGray)));
        }
        lines.push(lead_line);

        lines.push(Line::default());
        lines.push(label("Rounds", enabled));
        lines.push(
            TextField {
                value: &state.rounds_input,
                placeholder: "1",
                invalid: state.rounds_invalid,
                enabled,
                focused: self.is_cursor(Row::Rounds),
            }
            .line(),
        );
        if state.rounds_invalid {
            lines.push(Line::from(Span::styled(
                ROUNDS_HINT,
                Style::default().fg(Color::Red).add_modifier(Modifier::ITALIC),
            )));
        }

        lines.push(Line::default());
        let button_label = if state.locked { BUSY_LABEL } else { START_LABEL };
        lines.push(
            Button::new(button_label)
                .enabled(state.can_start())
                .focused(self.is_cursor(Row::Start))
                .line(),
        );
        lines
    }
}

impl Component for ConfigPanel<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let paragraph = Paragraph::new(self.lines())
            .block(focus_card("Assistants", self.focused))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::line_text;

    fn roster(selected: &[&str], lead: &str) -> Roster {
        Roster {
            available: vec!["Alice".into(), "Bob".into(), "Carol".into()],
            selected: selected.iter().map(|s| s.to_string()).collect(),
            lead: lead.to_string(),
            rounds: 3,
        }
    }

    fn panel_text(state: &mut ConfigPanelState) -> Vec<String> {
        ConfigPanel::new(state, true).lines().iter().map(line_text).collect()
    }

    fn goto(state: &mut ConfigPanelState, row: Row) {
        state.cursor = state.rows().iter().position(|r| *r == row).unwrap();
    }

    #[test]
    fn toggling_lead_off_reassigns() {
        let mut state = ConfigPanelState::new(&roster(&["Alice", "Bob"], "Alice"));
        goto(&mut state, Row::Personality(0));
        assert_eq!(
            state.handle_event(&TuiEvent::InputChar(' ')),
            Some(ConfigEvent::SelectionChanged {
                selected: vec!["Bob".into()],
                lead: Some("Bob".into()),
            })
        );
    }

    #[test]
    fn toggling_on_appends() {
        let mut state = ConfigPanelState::new(&roster(&["Bob"], "Bob"));
        goto(&mut state, Row::Personality(2));
        assert_eq!(
            state.handle_event(&TuiEvent::Submit),
            Some(ConfigEvent::SelectionChanged {
                selected: vec!["Bob".into(), "Carol".into()],
                lead: None,
            })
        );
    }

    #[test]
    fn lead_cycles_through_selected_only() {
        let mut state = ConfigPanelState::new(&roster(&["Alice", "Carol"], "Alice"));
        goto(&mut state, Row::Lead);
        assert_eq!(
            state.handle_event(&TuiEvent::CursorRight),
            Some(ConfigEvent::LeadChanged("Carol".into()))
        );
        // Single selection: cycling lands on the same lead, nothing to emit.
        state.sync(&roster(&["Alice"], "Alice"), false);
        assert_eq!(state.handle_event(&TuiEvent::CursorRight), None);
    }

    #[test]
    fn rounds_accept_and_reject() {
        let mut state = ConfigPanelState::new(&roster(&["Alice"], "Alice"));
        goto(&mut state, Row::Rounds);

        assert_eq!(
            state.handle_event(&TuiEvent::Backspace),
            Some(ConfigEvent::RoundsChanged(1))
        );
        assert_eq!(state.rounds_input, "");
        assert_eq!(
            state.handle_event(&TuiEvent::InputChar('5')),
            Some(ConfigEvent::RoundsChanged(5))
        );
        assert_eq!(
            state.handle_event(&TuiEvent::InputChar('x')),
            Some(ConfigEvent::RoundsRejected("5x".into()))
        );
        assert!(state.rounds_invalid);
        assert!(panel_text(&mut state).iter().any(|l| l == ROUNDS_HINT));

        state.handle_event(&TuiEvent::Backspace);
        assert!(!state.rounds_invalid);
    }

    #[test]
    fn zero_rounds_rejected() {
        let mut state = ConfigPanelState::new(&roster(&["Alice"], "Alice"));
        goto(&mut state, Row::Rounds);
        state.rounds_input.clear();
        assert_eq!(
            state.handle_event(&TuiEvent::InputChar('0')),
            Some(ConfigEvent::RoundsRejected("0".into()))
        );
    }

    #[test]
    fn sync_keeps_rejected_text_visible() {
        let mut state = ConfigPanelState::new(&roster(&["Alice"], "Alice"));
        state.rounds_input = "-5".into();
        state.rounds_invalid = true;
        state.sync(&roster(&["Alice"], "Alice"), false);
        assert_eq!(state.rounds_input, "-5");
    }

    #[test]
    fn sync_refreshes_rounds_from_app() {
        let mut state = ConfigPanelState::new(&roster(&["Alice"], "Alice"));
        let mut updated = roster(&["Alice"], "Alice");
        updated.rounds = 7;
        state.sync(&updated, false);
        assert_eq!(state.rounds_input, "7");
    }

    #[test]
    fn start_only_when_valid() {
        let mut state = ConfigPanelState::new(&roster(&["Alice"], "Alice"));
        goto(&mut state, Row::Start);
        assert_eq!(state.handle_event(&TuiEvent::Submit), Some(ConfigEvent::Start));

        state.sync(&roster(&[], ""), false);
        goto(&mut state, Row::Start);
        assert_eq!(state.handle_event(&TuiEvent::Submit), None);
    }

    #[test]
    fn locked_panel_ignores_input() {
        let mut state = ConfigPanelState::new(&roster(&["Alice"], "Alice"));
        state.sync(&roster(&["Alice"], "Alice"), true);
        goto(&mut state, Row::Personality(1));
        assert_eq!(state.handle_event(&TuiEvent::Submit), None);
        assert_eq!(state.handle_event(&TuiEvent::CursorDown), None);
        assert_eq!(state.current_row(), Row::Personality(1));
    }

    #[test]
    fn button_label_tracks_busy_state() {
        let mut state = ConfigPanelState::new(&roster(&["Alice"], "Alice"));
        assert!(panel_text(&mut state).iter().any(|l| l.contains(START_LABEL)));
        state.sync(&roster(&["Alice"], "Alice"), true);
        assert!(panel_text(&mut state).iter().any(|l| l.contains(BUSY_LABEL)));
    }

    #[test]
    fn lead_placeholders() {
        let mut state = ConfigPanelState::new(&roster(&[], ""));
        assert!(panel_text(&mut state).iter().any(|l| l.contains(NO_SELECTION_PLACEHOLDER)));
        state.sync(&roster(&["Bob"], ""), false);
        assert!(panel_text(&mut state).iter().any(|l| l.contains(NO_LEAD_PLACEHOLDER)));
    }

    #[test]
    fn checkboxes_reflect_selection() {
        let mut state = ConfigPanelState::new(&roster(&["Bob"], "Bob"));
        let lines = panel_text(&mut state);
        assert!(lines.contains(&"[ ] Alice".to_string()));
        assert!(lines.contains(&"[x] Bob".to_string()));
    }
}
