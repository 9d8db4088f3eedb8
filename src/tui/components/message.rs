use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::api::Turn;
use crate::tui::component::Component;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Bubbles never grow wider than this share of the row (percent).
const MAX_WIDTH_PERCENT: u16 = 80;
/// Narrowest bubble worth drawing; leaves room for a short header.
const MIN_BUBBLE_WIDTH: u16 = 16;

/// A single conversation turn drawn as a bordered bubble.
///
/// User turns sit on the right in green; everyone else sits on the left.
/// The header `"{sender} ({role})"` goes in the border title and is left out
/// for an anonymous user turn.
///
/// `MessageBubble` is transient: the thread creates one per turn per frame.
/// It is handed the whole row and positions itself inside it, so
/// [`height`](Self::height) and rendering agree on the bubble width.
#[derive(Clone, Copy)]
pub struct MessageBubble<'a> {
    pub turn: &'a Turn,
}

impl<'a> MessageBubble<'a> {
    pub fn new(turn: &'a Turn) -> Self {
        Self { turn }
    }

    pub fn style(&self) -> Style {
        match self.turn.role.as_str() {
            "user" => Style::default().fg(Color::Green),
            "system" => Style::default().fg(Color::Yellow),
            _ => Style::default().fg(Color::Blue),
        }
    }

    /// Width of the bubble within a row of `row_width` columns: wide enough
    /// for the longest line and the header, capped at 80% of the row.
    pub fn bubble_width(&self, row_width: u16) -> u16 {
        let longest_line = self
            .turn
            .content
            .trim()
            .lines()
            .map(UnicodeWidthStr::width)
            .max()
            .unwrap_or(0);
        let header = self
            .turn
            .header()
            .map(|h| h.width() + 2)
            .unwrap_or(0);
        let wanted = u16::try_from(longest_line.max(header) + HORIZONTAL_OVERHEAD as usize)
            .unwrap_or(u16::MAX);

        let cap = (row_width as u32 * MAX_WIDTH_PERCENT as u32 / 100) as u16;
        wanted.clamp(MIN_BUBBLE_WIDTH.min(row_width), cap.max(MIN_BUBBLE_WIDTH).min(row_width))
    }

    /// Where the bubble lands inside `row`.
    pub fn bubble_rect(&self, row: Rect) -> Rect {
        let width = self.bubble_width(row.width);
        let x = if self.turn.is_user() {
            row.x + row.width.saturating_sub(width)
        } else {
            row.x
        };
        Rect::new(x, row.y, width, row.height)
    }

    fn paragraph(&self) -> Paragraph<'a> {
        let style = self.style();
        let border_style = if self.turn.role == "system" {
            style.add_modifier(Modifier::DIM)
        } else {
            style
        };

        let mut block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));
        if let Some(header) = self.turn.header() {
            block = block.title(Span::styled(
                header,
                border_style.add_modifier(Modifier::BOLD),
            ));
        }
        if self.turn.is_user() {
            block = block.title_alignment(Alignment::Right);
        }

        Paragraph::new(self.turn.content.trim())
            .block(block)
            .style(style)
            .wrap(Wrap { trim: false })
    }

    /// Rendered height including borders for a row of `row_width` columns.
    pub fn height(&self, row_width: u16) -> u16 {
        let inner = self.bubble_width(row_width).saturating_sub(HORIZONTAL_OVERHEAD);
        if inner == 0 {
            // Terminal too narrow for borders + padding; keep a visible row.
            return 1;
        }
        u16::try_from(self.paragraph().line_count(inner)).unwrap_or(u16::MAX)
    }
}

impl Widget for MessageBubble<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rect = self.bubble_rect(area);
        self.paragraph().render(rect, buf);
    }
}

impl Component for MessageBubble<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::assistant_turn;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn anonymous_user(content: &str) -> Turn {
        Turn {
            role: "user".into(),
            name: None,
            content: content.into(),
        }
    }

    fn render_rows(turn: &Turn, width: u16) -> Vec<String> {
        let bubble = MessageBubble::new(turn);
        let height = bubble.height(width);
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| f.render_widget(bubble, f.area()))
            .unwrap();
        let buffer = terminal.backend().buffer();
        (0..height)
            .map(|y| (0..width).map(|x| buffer[(x, y)].symbol()).collect())
            .collect()
    }

    #[test]
    fn single_line_height_includes_borders() {
        let turn = assistant_turn("Helpful Assistant", "Hello");
        assert_eq!(MessageBubble::new(&turn).height(80), 3);
    }

    #[test]
    fn content_is_trimmed() {
        let turn = assistant_turn("Helpful Assistant", "\n\n   Trim me   \n\n");
        assert_eq!(MessageBubble::new(&turn).height(80), 3);
    }

    #[test]
    fn long_content_wraps() {
        let turn = assistant_turn("Domain Expert", &"word ".repeat(40));
        assert!(MessageBubble::new(&turn).height(40) > 3);
    }

    #[test]
    fn bubble_never_exceeds_row() {
        let turn = assistant_turn("Domain Expert", &"x".repeat(200));
        let bubble = MessageBubble::new(&turn);
        assert_eq!(bubble.bubble_width(50), 40);
        assert!(bubble.bubble_width(10) <= 10);
    }

    #[test]
    fn very_long_single_line_is_measured_without_overflow() {
        let turn = assistant_turn("Code Generator", &"x".repeat(70_000));
        let bubble = MessageBubble::new(&turn);
        assert_eq!(bubble.bubble_width(100), 80);
        let height = bubble.height(100);
        assert!(height > 3);
        assert!(height <= u16::MAX);
    }

    #[test]
    fn user_bubble_is_right_aligned_and_green() {
        let turn = Turn::user("Hi");
        let bubble = MessageBubble::new(&turn);
        let rect = bubble.bubble_rect(Rect::new(0, 0, 60, 3));
        assert_eq!(rect.x + rect.width, 60);
        assert_eq!(bubble.style().fg, Some(Color::Green));
    }

    #[test]
    fn assistant_bubble_is_left_aligned() {
        let turn = assistant_turn("Summarizer", "Short");
        let rect = MessageBubble::new(&turn).bubble_rect(Rect::new(0, 0, 60, 3));
        assert_eq!(rect.x, 0);
    }

    #[test]
    fn header_shows_name_and_role() {
        let turn = assistant_turn("Sarcastic Assistant", "Oh, great.");
        let rows = render_rows(&turn, 60);
        assert!(rows[0].contains("Sarcastic Assistant (assistant)"));
        assert!(rows[1].contains("Oh, great."));
    }

    #[test]
    fn unnamed_assistant_falls_back_to_assistant() {
        let turn = Turn {
            role: "assistant".into(),
            name: None,
            content: "Hi".into(),
        };
        let rows = render_rows(&turn, 60);
        assert!(rows[0].contains("Assistant (assistant)"));
    }

    #[test]
    fn anonymous_user_has_no_header() {
        let turn = anonymous_user("Just me");
        let rows = render_rows(&turn, 60);
        assert!(!rows[0].contains("(user)"));
        assert!(rows[1].contains("Just me"));
    }

    #[test]
    fn named_user_shows_header() {
        let turn = Turn::user("Hello Assistant");
        let rows = render_rows(&turn, 60);
        assert!(rows[0].contains("User (user)"));
    }
}
