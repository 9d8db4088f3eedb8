//! # Thread Component
//!
//! Scrollable view of the conversation and the feedback that follows it.
//!
//! ## Sections, top to bottom
//!
//! ```text
//! ┌ MessageBubble × history ─────────────┐
//! │ "Assistant is typing..."  (loading)  │
//! │ Error block        (not loading)     │
//! │ Questions for Feedback (not loading) │
//! │ Final Output       (not loading)     │
//! └──────────────────────────────────────┘
//! ```
//!
//! ## Architecture
//!
//! `Thread` is a transient component (created each frame) that wraps
//! `&'a mut ThreadState` (persistent scroll state) and borrowed props.
//! Heights are measured with `Paragraph::line_count` before rendering so the
//! `ScrollView` canvas can be sized up front.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::api::{Question, Turn};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::MessageBubble;
use crate::tui::components::primitives::{card, spinner};
use crate::tui::event::TuiEvent;
use crate::tui::markdown;

pub const TYPING_TEXT: &str = "Assistant is typing...";
pub const QUESTIONS_TITLE: &str = "Questions for Feedback";
pub const FINAL_OUTPUT_TITLE: &str = "Final Output";

/// Border (2) + padding (2) around card content.
const CARD_HORIZONTAL_OVERHEAD: u16 = 4;

pub fn error_text(message: &str) -> String {
    format!("Error: {message}. Please try again or adjust settings.")
}

/// Scroll state for the thread. Must be persisted in the parent TuiState.
pub struct ThreadState {
    pub scroll_state: ScrollViewState,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Total canvas height from the last render
    pub content_height: u16,
}

impl Default for ThreadState {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreadState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            stick_to_bottom: true,
            viewport_height: 0,
            content_height: 0,
        }
    }

    fn max_offset(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position { x: current.x, y: max_y });
        }
    }

    /// Re-engage auto-scroll if the user has reached the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        if self.scroll_state.offset().y >= self.max_offset() {
            self.pin_to_bottom();
        }
    }

    /// Jump to the newest content and follow it.
    pub fn pin_to_bottom(&mut self) {
        self.stick_to_bottom = true;
        self.scroll_state.scroll_to_bottom();
    }

    /// True when content exists below the viewport.
    pub fn has_unseen_content(&self) -> bool {
        !self.stick_to_bottom && self.scroll_state.offset().y < self.max_offset()
    }
}

impl EventHandler for ThreadState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToBottom => self.pin_to_bottom(),
            _ => {}
        }
        None
    }
}

/// One vertical slice of the thread.
#[derive(Debug, Clone, PartialEq)]
pub enum Section<'a> {
    Turn(&'a Turn),
    Typing,
    Error(&'a str),
    Questions(&'a [Question]),
    FinalOutput(&'a str),
}

/// Data the thread renders.
#[derive(Clone, Copy)]
pub struct ThreadProps<'a> {
    pub history: &'a [Turn],
    pub questions: &'a [Question],
    pub final_output: Option<&'a str>,
    pub last_error: Option<&'a str>,
    pub is_loading: bool,
}

impl<'a> ThreadProps<'a> {
    /// Which sections are visible, in display order.
    pub fn sections(&self) -> Vec<Section<'a>> {
        let mut sections: Vec<Section<'a>> = self.history.iter().map(Section::Turn).collect();
        if self.is_loading {
            sections.push(Section::Typing);
            return sections;
        }
        if let Some(error) = self.last_error {
            sections.push(Section::Error(error));
        }
        if !self.questions.is_empty() {
            sections.push(Section::Questions(self.questions));
        }
        if let Some(output) = self.final_output.filter(|o| !o.trim().is_empty()) {
            sections.push(Section::FinalOutput(output));
        }
        sections
    }
}

fn questions_text(questions: &[Question]) -> Text<'static> {
    let lines: Vec<Line<'static>> = questions
        .iter()
        .map(|q| {
            Line::from(vec![
                Span::styled(
                    format!("{}: ", q.assistant),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::raw(q.question.clone()),
            ])
        })
        .collect();
    Text::from(lines)
}

/// Paragraph for every non-bubble section.
fn section_paragraph(section: &Section<'_>, spinner_frame: usize) -> Option<Paragraph<'static>> {
    let paragraph = match section {
        Section::Turn(_) => return None,
        Section::Typing => Paragraph::new(Line::from(vec![
            Span::styled(format!("{} ", spinner(spinner_frame)), Style::default().fg(Color::Cyan)),
            Span::styled(
                TYPING_TEXT,
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            ),
        ]))
        .block(Block::default().padding(Padding::horizontal(1))),
        Section::Error(message) => Paragraph::new(error_text(message))
            .style(Style::default().fg(Color::Red))
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::Red))
                    .padding(Padding::horizontal(1)),
            ),
        Section::Questions(questions) => {
            Paragraph::new(questions_text(questions)).block(card(QUESTIONS_TITLE))
        }
        Section::FinalOutput(output) => {
            Paragraph::new(markdown::render(output, Color::White)).block(card(FINAL_OUTPUT_TITLE))
        }
    };
    Some(paragraph.wrap(Wrap { trim: false }))
}

fn section_height(section: &Section<'_>, width: u16, spinner_frame: usize) -> u16 {
    match section {
        Section::Turn(turn) => MessageBubble::new(turn).height(width),
        _ => section_paragraph(section, spinner_frame)
            .map(|p| {
                let lines = p.line_count(width.saturating_sub(CARD_HORIZONTAL_OVERHEAD).max(1));
                u16::try_from(lines).unwrap_or(u16::MAX)
            })
            .unwrap_or(0),
    }
}

/// Scrollable thread component.
/// Created fresh each frame with references to state and data.
pub struct Thread<'a> {
    pub state: &'a mut ThreadState,
    pub props: ThreadProps<'a>,
    pub spinner_frame: usize,
}

impl<'a> Thread<'a> {
    pub fn new(state: &'a mut ThreadState, props: ThreadProps<'a>, spinner_frame: usize) -> Self {
        Self {
            state,
            props,
            spinner_frame,
        }
    }
}

impl Component for Thread<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar
        let sections = self.props.sections();
        let heights: Vec<u16> = sections
            .iter()
            .map(|s| section_height(s, content_width, self.spinner_frame))
            .collect();
        let total_height: u16 = heights.iter().fold(0u16, |acc, h| acc.saturating_add(*h));

        self.state.viewport_height = area.height;
        self.state.content_height = total_height;
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y: u16 = 0;
        for (section, height) in sections.iter().zip(heights) {
            let rect = Rect::new(0, y, content_width, height);
            match section {
                Section::Turn(turn) => scroll_view.render_widget(MessageBubble::new(turn), rect),
                other => {
                    if let Some(paragraph) = section_paragraph(other, self.spinner_frame) {
                        scroll_view.render_widget(paragraph, rect);
                    }
                }
            }
            y = y.saturating_add(height);
        }

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}
