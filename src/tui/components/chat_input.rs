//! # ChatInput Component
//!
//! Multi-line message box below the thread.
//!
//! ## Responsibilities
//!
//! - Capture text input (characters, paste, newlines)
//! - Handle editing (backspace, delete, cursor movement)
//! - Submit the trimmed text on Enter
//! - Show a send glyph, or a spinner while the assistants are working
//!
//! ## State Management
//!
//! The buffer and cursor are internal state. `loading`, `focused` and
//! `spinner_frame` are props refreshed by the event loop each frame.
//!
//! Text is hard-wrapped at the inner width by display columns, so the cursor
//! position on screen can be derived directly from the wrapped rows.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::tui::component::{Component, EventHandler};
use crate::tui::components::primitives::{Button, spinner};
use crate::tui::event::TuiEvent;

/// Border (2) + padding (2) consumed horizontally
const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders
const VERTICAL_OVERHEAD: u16 = 2;
/// Rows shown before the box starts scrolling internally
const MAX_VISIBLE_LINES: u16 = 6;

pub const PLACEHOLDER: &str = "Type your message...";
const SEND_GLYPH: &str = "Send ➤";

/// High-level events emitted by the chat input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// Trimmed, non-empty text to send
    Send(String),
}

/// One wrapped row: byte range into the buffer (newline excluded).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Row {
    start: usize,
    end: usize,
}

pub struct ChatInput {
    /// Text buffer (Internal State)
    pub buffer: String,
    /// Cursor as a byte offset into `buffer`, always on a char boundary
    pub cursor: usize,
    /// A request is outstanding (Prop)
    pub loading: bool,
    /// Keyboard focus is on the input (Prop)
    pub focused: bool,
    /// Animation frame for the spinner (Prop)
    pub spinner_frame: usize,
    scroll_offset: u16,
    last_width: u16,
}

impl Default for ChatInput {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatInput {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            loading: false,
            focused: true,
            spinner_frame: 0,
            scroll_offset: 0,
            last_width: 80,
        }
    }

    pub fn can_send(&self) -> bool {
        !self.loading && !self.buffer.trim().is_empty()
    }

    /// Box height for the current buffer, clamped to the visible maximum.
    pub fn height(&self, width: u16) -> u16 {
        let rows = self.rows(inner_width(width)).len() as u16;
        rows.clamp(1, MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    fn rows(&self, width: u16) -> Vec<Row> {
        wrap_rows(&self.buffer, width)
    }

    /// (row, column) of the cursor in wrapped coordinates.
    fn cursor_cell(&self, width: u16) -> (u16, u16) {
        let rows = self.rows(width);
        let row_index = rows
            .iter()
            .rposition(|r| r.start <= self.cursor)
            .unwrap_or(0);
        let row = rows[row_index];
        let col = display_width(&self.buffer[row.start..self.cursor.min(row.end).max(row.start)]);
        (row_index as u16, col)
    }

    fn insert_str(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
    }

    fn prev_boundary(&self) -> usize {
        self.buffer[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.buffer[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
            .unwrap_or(self.buffer.len())
    }

    /// Move to the same display column on the row above or below.
    fn move_vertically(&mut self, down: bool) -> bool {
        let width = inner_width(self.last_width);
        let rows = self.rows(width);
        let (row, col) = self.cursor_cell(width);
        let target = if down {
            row as usize + 1
        } else if row == 0 {
            return false;
        } else {
            row as usize - 1
        };
        let Some(target_row) = rows.get(target) else {
            return false;
        };

        let mut pos = target_row.start;
        let mut used = 0u16;
        for (i, c) in self.buffer[target_row.start..target_row.end].char_indices() {
            let w = c.width().unwrap_or(0) as u16;
            if used + w > col {
                break;
            }
            used += w;
            pos = target_row.start + i + c.len_utf8();
        }
        self.cursor = pos;
        true
    }

    fn keep_cursor_visible(&mut self, width: u16) {
        let (row, _) = self.cursor_cell(width);
        if row < self.scroll_offset {
            self.scroll_offset = row;
        } else if row >= self.scroll_offset + MAX_VISIBLE_LINES {
            self.scroll_offset = row + 1 - MAX_VISIBLE_LINES;
        }
        let total = self.rows(width).len() as u16;
        self.scroll_offset = self.scroll_offset.min(total.saturating_sub(MAX_VISIBLE_LINES));
    }

    fn visible_lines(&self, width: u16) -> Vec<Line<'static>> {
        if self.buffer.is_empty() {
            let text = if self.loading { "Waiting for the assistants..." } else { PLACEHOLDER };
            return vec![Line::from(Span::styled(
                text,
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            ))];
        }
        let style = if self.loading {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
        } else {
            Style::default().fg(Color::Green)
        };
        self.rows(width)
            .into_iter()
            .skip(self.scroll_offset as usize)
            .take(MAX_VISIBLE_LINES as usize)
            .map(|r| Line::from(Span::styled(self.buffer[r.start..r.end].to_string(), style)))
            .collect()
    }
}

fn inner_width(width: u16) -> u16 {
    width.saturating_sub(HORIZONTAL_OVERHEAD)
}

fn display_width(s: &str) -> u16 {
    s.chars().map(|c| c.width().unwrap_or(0) as u16).sum()
}

/// Split `text` into rows no wider than `width` columns, breaking at
/// newlines and wherever a row fills up. Always returns at least one row.
fn wrap_rows(text: &str, width: u16) -> Vec<Row> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut start = 0;
    let mut used = 0u16;
    for (i, c) in text.char_indices() {
        if c == '\n' {
            rows.push(Row { start, end: i });
            start = i + 1;
            used = 0;
            continue;
        }
        let w = c.width().unwrap_or(0) as u16;
        if used + w > width && i > start {
            rows.push(Row { start, end: i });
            start = i;
            used = 0;
        }
        used += w;
    }
    rows.push(Row {
        start,
        end: text.len(),
    });
    rows
}

impl Component for ChatInput {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.last_width = area.width;
        let width = inner_width(area.width);
        self.keep_cursor_visible(width);

        let border = if self.focused && !self.loading {
            Color::Cyan
        } else {
            Color::DarkGray
        };
        let action = if self.loading {
            Line::from(Span::styled(
                format!(" {} ", spinner(self.spinner_frame)),
                Style::default().fg(Color::Cyan),
            ))
        } else {
            Button::new(SEND_GLYPH).enabled(self.can_send()).line()
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border))
            .title(" Message ")
            .title(action.right_aligned())
            .title_bottom(
                Line::from(" Enter send · Shift+Enter newline ")
                    .style(Style::default().fg(Color::DarkGray)),
            )
            .padding(Padding::horizontal(1));

        frame.render_widget(Paragraph::new(self.visible_lines(width)).block(block), area);

        if self.focused && !self.loading && width > 0 {
            let (row, col) = self.cursor_cell(width);
            let x = area.x + 2 + col.min(width.saturating_sub(1));
            let y = area.y + 1 + row.saturating_sub(self.scroll_offset);
            frame.set_cursor_position((x, y));
        }
    }
}

impl EventHandler for ChatInput {
    type Event = ChatEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.loading {
            return None;
        }
        match event {
            TuiEvent::Submit => {
                let text = self.buffer.trim();
                if text.is_empty() {
                    return None;
                }
                let text = text.to_string();
                self.buffer.clear();
                self.cursor = 0;
                self.scroll_offset = 0;
                Some(ChatEvent::Send(text))
            }
            TuiEvent::Newline => {
                self.insert_str("\n");
                None
            }
            TuiEvent::InputChar(c) => {
                let mut tmp = [0u8; 4];
                self.insert_str(c.encode_utf8(&mut tmp));
                None
            }
            TuiEvent::Paste(text) => {
                let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
                self.insert_str(&normalized);
                None
            }
            TuiEvent::Backspace => {
                if self.cursor > 0 {
                    let prev = self.prev_boundary();
                    self.buffer.drain(prev..self.cursor);
                    self.cursor = prev;
                }
                None
            }
            TuiEvent::Delete => {
                if self.cursor < self.buffer.len() {
                    let next = self.next_boundary();
                    self.buffer.drain(self.cursor..next);
                }
                None
            }
            TuiEvent::CursorLeft => {
                self.cursor = self.prev_boundary();
                None
            }
            TuiEvent::CursorRight => {
                self.cursor = self.next_boundary();
                None
            }
            TuiEvent::CursorHome => {
                self.cursor = self.buffer[..self.cursor].rfind('\n').map_or(0, |i| i + 1);
                None
            }
            TuiEvent::CursorEnd => {
                self.cursor = self.buffer[self.cursor..]
                    .find('\n')
                    .map_or(self.buffer.len(), |i| self.cursor + i);
                None
            }
            TuiEvent::CursorUp => {
                self.move_vertically(false);
                None
            }
            TuiEvent::CursorDown => {
                self.move_vertically(true);
                None
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn typed(text: &str) -> ChatInput {
        let mut input = ChatInput::new();
        input.handle_event(&TuiEvent::Paste(text.to_string()));
        input
    }

    #[test]
    fn submit_sends_trimmed_text_and_clears() {
        let mut input = typed("  hello  ");
        assert_eq!(
            input.handle_event(&TuiEvent::Submit),
            Some(ChatEvent::Send("hello".into()))
        );
        assert!(input.buffer.is_empty());
        assert_eq!(input.cursor, 0);
    }

    #[test]
    fn whitespace_only_does_not_submit() {
        let mut input = typed("   \n  ");
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        assert_eq!(input.buffer, "   \n  ");
        assert!(!input.can_send());
    }

    #[test]
    fn newline_inserts_without_submitting() {
        let mut input = typed("line one");
        assert_eq!(input.handle_event(&TuiEvent::Newline), None);
        input.handle_event(&TuiEvent::InputChar('x'));
        assert_eq!(input.buffer, "line one\nx");
        assert_eq!(
            input.handle_event(&TuiEvent::Submit),
            Some(ChatEvent::Send("line one\nx".into()))
        );
    }

    #[test]
    fn loading_ignores_edits_and_submit() {
        let mut input = typed("draft");
        input.loading = true;
        assert!(!input.can_send());
        assert_eq!(input.handle_event(&TuiEvent::InputChar('!')), None);
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        assert_eq!(input.buffer, "draft");
    }

    #[test]
    fn editing_respects_char_boundaries() {
        let mut input = typed("héllo");
        input.handle_event(&TuiEvent::CursorHome);
        input.handle_event(&TuiEvent::CursorRight);
        input.handle_event(&TuiEvent::Delete);
        assert_eq!(input.buffer, "hllo");
        input.handle_event(&TuiEvent::CursorEnd);
        input.handle_event(&TuiEvent::Backspace);
        assert_eq!(input.buffer, "hll");
    }

    #[test]
    fn home_and_end_are_line_local() {
        let mut input = typed("ab\ncd");
        input.handle_event(&TuiEvent::CursorHome);
        assert_eq!(input.cursor, 3);
        input.handle_event(&TuiEvent::CursorLeft);
        input.handle_event(&TuiEvent::CursorHome);
        assert_eq!(input.cursor, 0);
        input.handle_event(&TuiEvent::CursorEnd);
        assert_eq!(input.cursor, 2);
    }

    #[test]
    fn vertical_movement_keeps_column() {
        let mut input = typed("abcd\nxy");
        input.handle_event(&TuiEvent::CursorUp);
        assert_eq!(input.cursor, 2);
        input.handle_event(&TuiEvent::CursorDown);
        assert_eq!(input.cursor, 7);
        assert!(!input.move_vertically(true));
    }

    #[test]
    fn paste_normalizes_line_endings() {
        let input = typed("a\r\nb\rc");
        assert_eq!(input.buffer, "a\nb\nc");
    }

    #[test]
    fn wrap_rows_breaks_at_width_and_newlines() {
        let rows = wrap_rows("abcdef\ngh", 4);
        let texts: Vec<&str> = rows.iter().map(|r| &"abcdef\ngh"[r.start..r.end]).collect();
        assert_eq!(texts, vec!["abcd", "ef", "gh"]);
        assert_eq!(wrap_rows("", 10).len(), 1);
    }

    #[test]
    fn height_grows_then_caps() {
        assert_eq!(ChatInput::new().height(40), 3);
        let tall = typed(&"x\n".repeat(20));
        assert_eq!(tall.height(40), MAX_VISIBLE_LINES + VERTICAL_OVERHEAD);
    }

    #[test]
    fn render_shows_placeholder_and_spinner() {
        let mut terminal = Terminal::new(TestBackend::new(50, 3)).unwrap();
        let mut input = ChatInput::new();
        terminal.draw(|f| input.render(f, f.area())).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains(PLACEHOLDER));
        assert!(text.contains("Send"));

        input.loading = true;
        terminal.draw(|f| input.render(f, f.area())).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains(spinner(0)));
        assert!(!text.contains("Send"));
    }
}
