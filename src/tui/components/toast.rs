//! Toast overlay: live notices stacked in the top-right corner, newest at
//! the bottom.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Clear, Paragraph};

use crate::core::notice::{Level, Notice, Notices};
use crate::tui::component::Component;

const MAX_WIDTH: u16 = 44;

fn level_style(level: Level) -> (Color, &'static str) {
    match level {
        Level::Info => (Color::Cyan, "ℹ"),
        Level::Success => (Color::Green, "✔"),
        Level::Warning => (Color::Yellow, "!"),
        Level::Error => (Color::Red, "✖"),
    }
}

/// Message wrapped to the toast's inner width.
fn wrapped(notice: &Notice, inner_width: u16) -> Vec<Line<'static>> {
    let (_, icon) = level_style(notice.level);
    let text = format!("{icon} {}", notice.message);
    textwrap::wrap(&text, inner_width.max(1) as usize)
        .into_iter()
        .map(|l| Line::from(l.into_owned()))
        .collect()
}

pub struct Toasts<'a> {
    pub notices: &'a Notices,
}

impl Component for Toasts<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = MAX_WIDTH.min(area.width);
        if width < 6 {
            return;
        }
        let inner_width = width - 2;
        let x = area.x + area.width - width;
        let mut y = area.y + 1;
        let bottom = area.y + area.height;

        for notice in self.notices.iter() {
            let lines = wrapped(notice, inner_width);
            let height = lines.len() as u16 + 2;
            if y + height > bottom {
                break;
            }
            let rect = Rect::new(x, y, width, height);
            let (color, _) = level_style(notice.level);
            frame.render_widget(Clear, rect);
            frame.render_widget(
                Paragraph::new(lines).style(Style::default().fg(color)).block(
                    Block::bordered()
                        .border_type(BorderType::Rounded)
                        .border_style(Style::default().fg(color)),
                ),
                rect,
            );
            y += height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn long_messages_wrap() {
        let mut notices = Notices::default();
        notices.error("network error: connection refused while talking to the server");
        let notice = notices.last().unwrap();
        let lines = wrapped(notice, 20);
        assert!(lines.len() > 1);
    }

    #[test]
    fn renders_in_top_right_with_level_color() {
        let mut notices = Notices::default();
        notices.success("Feedback sent");
        let mut terminal = Terminal::new(TestBackend::new(80, 10)).unwrap();
        terminal
            .draw(|f| Toasts { notices: &notices }.render(f, f.area()))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let row: String = (0..80u16).map(|x| buffer[(x, 2u16)].symbol()).collect();
        assert!(row.contains("Feedback sent"));
        assert!(row.starts_with(&" ".repeat(30)));
        assert_eq!(buffer[(79u16, 1u16)].fg, Color::Green);
    }

    #[test]
    fn nothing_rendered_without_notices() {
        let notices = Notices::default();
        let mut terminal = Terminal::new(TestBackend::new(40, 5)).unwrap();
        terminal
            .draw(|f| Toasts { notices: &notices }.render(f, f.area()))
            .unwrap();
        assert!(
            terminal
                .backend()
                .buffer()
                .content()
                .iter()
                .all(|c| c.symbol() == " ")
        );
    }
}
