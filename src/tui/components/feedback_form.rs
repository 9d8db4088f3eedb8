//! # FeedbackForm Component
//!
//! Modal overlay for rating each participating assistant from 1 to 5.
//!
//! Up/Down pick an assistant, Left/Right or a digit set its rating, Enter
//! submits and Esc dismisses. The form is rebuilt from the current
//! selection every time it opens.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};

use crate::api::Rating;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::primitives::{Button, card, centered_rect};
use crate::tui::event::TuiEvent;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;
const DEFAULT_RATING: i32 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackEvent {
    Submit(Vec<Rating>),
    Dismiss,
}

#[derive(Debug, Clone)]
pub struct FeedbackFormState {
    pub ratings: Vec<Rating>,
    pub cursor: usize,
}

impl FeedbackFormState {
    pub fn new(assistants: &[String]) -> Self {
        Self {
            ratings: assistants
                .iter()
                .map(|name| Rating {
                    assistant: name.clone(),
                    rating: DEFAULT_RATING,
                })
                .collect(),
            cursor: 0,
        }
    }

    fn adjust(&mut self, delta: i32) {
        if let Some(entry) = self.ratings.get_mut(self.cursor) {
            entry.rating = (entry.rating + delta).clamp(MIN_RATING, MAX_RATING);
        }
    }

    fn set(&mut self, value: i32) {
        if let Some(entry) = self.ratings.get_mut(self.cursor) {
            entry.rating = value;
        }
    }
}

impl EventHandler for FeedbackFormState {
    type Event = FeedbackEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<FeedbackEvent> {
        match event {
            TuiEvent::Escape => Some(FeedbackEvent::Dismiss),
            TuiEvent::Submit if !self.ratings.is_empty() => {
                Some(FeedbackEvent::Submit(self.ratings.clone()))
            }
            TuiEvent::CursorUp => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            TuiEvent::CursorDown => {
                if self.cursor + 1 < self.ratings.len() {
                    self.cursor += 1;
                }
                None
            }
            TuiEvent::CursorLeft => {
                self.adjust(-1);
                None
            }
            TuiEvent::CursorRight => {
                self.adjust(1);
                None
            }
            TuiEvent::InputChar(c) => {
                if let Some(d) = c.to_digit(10)
                    && (MIN_RATING..=MAX_RATING).contains(&(d as i32))
                {
                    self.set(d as i32);
                }
                None
            }
            _ => None,
        }
    }
}

pub struct FeedbackForm<'a> {
    pub state: &'a FeedbackFormState,
    pub pending: bool,
}

impl FeedbackForm<'_> {
    fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(Span::styled(
                "How helpful was each assistant?",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::default(),
        ];
        let name_width = self
            .state
            .ratings
            .iter()
            .map(|r| r.assistant.chars().count())
            .max()
            .unwrap_or(0);

        for (i, entry) in self.state.ratings.iter().enumerate() {
            let focused = i == self.state.cursor;
            let marker = if focused { "▸ " } else { "  " };
            let stars: String = (MIN_RATING..=MAX_RATING)
                .map(|n| if n <= entry.rating { '★' } else { '☆' })
                .collect();
            let name_style = if focused {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            lines.push(Line::from(vec![
                Span::raw(marker),
                Span::styled(format!("{:<name_width$}", entry.assistant), name_style),
                Span::raw("  "),
                Span::styled(stars, Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!(" {}/{}", entry.rating, MAX_RATING),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
        }

        lines.push(Line::default());
        let label = if self.pending { "Submitting..." } else { "Submit" };
        lines.push(Button::new(label).enabled(!self.pending).line());
        lines.push(Line::from(Span::styled(
            "↑↓ choose · ←→ or 1-5 rate · Enter submit · Esc close",
            Style::default().fg(Color::DarkGray),
        )));
        lines
    }
}

impl Component for FeedbackForm<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let popup = centered_rect(60, 60, area);
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(self.lines()).block(card("Feedback").border_style(Style::default().fg(Color::Cyan))),
            popup,
        );
    }
}
