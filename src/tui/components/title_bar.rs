//! # TitleBar Component
//!
//! One-line status bar across the top of the screen.
//!
//! Stateless: every field is a prop copied from `App` or `TuiState` right
//! before rendering. Segments are joined with `" | "` and the least important
//! ones come last so narrow terminals cut those first:
//!
//! `Roundtable | Active | lead: Summarizer | rounds: 2 | session #3 14:02 | ↓ New`

use chrono::{DateTime, Local};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::core::state::Phase;
use crate::tui::component::Component;
use crate::tui::components::primitives::spinner;

pub struct TitleBar<'a> {
    pub phase: Phase,
    pub lead: &'a str,
    pub rounds: u32,
    pub session: u64,
    pub started_at: Option<DateTime<Local>>,
    /// Content below the current thread scroll position
    pub has_unseen_content: bool,
    pub spinner_frame: usize,
}

impl TitleBar<'_> {
    fn phase_color(&self) -> Color {
        match self.phase {
            Phase::Idle => Color::DarkGray,
            Phase::Active => Color::Green,
            Phase::Awaiting => Color::Cyan,
            Phase::Finished => Color::Yellow,
        }
    }

    pub fn line(&self) -> Line<'static> {
        let sep = || Span::styled(" | ", Style::default().fg(Color::DarkGray));
        let mut phase = self.phase.label().to_string();
        if self.phase == Phase::Awaiting {
            phase = format!("{} {}", spinner(self.spinner_frame), phase);
        }

        let mut spans = vec![
            Span::styled("Roundtable", Style::default().add_modifier(Modifier::BOLD)),
            sep(),
            Span::styled(phase, Style::default().fg(self.phase_color())),
        ];
        if !self.lead.is_empty() {
            spans.push(sep());
            spans.push(Span::raw(format!("lead: {}", self.lead)));
        }
        spans.push(sep());
        spans.push(Span::raw(format!("rounds: {}", self.rounds)));

        if self.session > 0 {
            spans.push(sep());
            let started = self
                .started_at
                .map(|t| format!(" {}", t.format("%H:%M")))
                .unwrap_or_default();
            spans.push(Span::styled(
                format!("session #{}{}", self.session, started),
                Style::default().fg(Color::DarkGray),
            ));
        }
        if self.has_unseen_content {
            spans.push(sep());
            spans.push(Span::styled(
                "↓ New",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ));
        }
        Line::from(spans)
    }
}

impl Component for TitleBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(self.line(), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::line_text;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn bar(phase: Phase) -> TitleBar<'static> {
        TitleBar {
            phase,
            lead: "Summarizer",
            rounds: 2,
            session: 0,
            started_at: None,
            has_unseen_content: false,
            spinner_frame: 0,
        }
    }

    #[test]
    fn idle_bar_shows_config() {
        let text = line_text(&bar(Phase::Idle).line());
        assert_eq!(text, "Roundtable | Not started | lead: Summarizer | rounds: 2");
    }

    #[test]
    fn no_lead_segment_when_unset() {
        let mut title = bar(Phase::Idle);
        title.lead = "";
        assert!(!line_text(&title.line()).contains("lead:"));
    }

    #[test]
    fn session_and_unseen_indicator() {
        let mut title = bar(Phase::Active);
        title.session = 3;
        title.has_unseen_content = true;
        let text = line_text(&title.line());
        assert!(text.contains("session #3"));
        assert!(text.ends_with("↓ New"));
    }

    #[test]
    fn awaiting_shows_spinner() {
        let text = line_text(&bar(Phase::Awaiting).line());
        assert!(text.contains(&format!("{} Waiting for assistants", spinner(0))));
    }

    #[test]
    fn renders_into_one_row() {
        let mut terminal = Terminal::new(TestBackend::new(80, 1)).unwrap();
        terminal
            .draw(|f| bar(Phase::Finished).render(f, f.area()))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Roundtable"));
        assert!(text.contains("Finished"));
    }
}
