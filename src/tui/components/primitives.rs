//! # Primitives
//!
//! Small stateless widgets shared by the larger components: buttons,
//! checkboxes, single-line fields, labels and bordered cards.
//!
//! Every primitive takes `enabled` and `focused` props. Disabled widgets
//! render dimmed; focus is shown with a reversed or highlighted style so the
//! keyboard position is always visible.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding};

const BUTTON_COLOR: Color = Color::Blue;

/// A one-line bracketed button: `[ Label ]`.
#[derive(Debug, Clone)]
pub struct Button<'a> {
    pub label: &'a str,
    pub enabled: bool,
    pub focused: bool,
}

impl<'a> Button<'a> {
    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            enabled: true,
            focused: false,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn style(&self) -> Style {
        let base = Style::default().fg(BUTTON_COLOR);
        match (self.enabled, self.focused) {
            (false, _) => Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
            (true, true) => base.add_modifier(Modifier::BOLD | Modifier::REVERSED),
            (true, false) => base.add_modifier(Modifier::BOLD),
        }
    }

    pub fn line(&self) -> Line<'static> {
        Line::from(Span::styled(format!("[ {} ]", self.label), self.style()))
    }
}

/// `[x] Label` / `[ ] Label`.
#[derive(Debug, Clone)]
pub struct Checkbox<'a> {
    pub label: &'a str,
    pub checked: bool,
    pub enabled: bool,
    pub focused: bool,
}

impl Checkbox<'_> {
    pub fn line(&self) -> Line<'static> {
        let mark = if self.checked { "[x] " } else { "[ ] " };
        let mut style = if self.checked {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
        };
        if !self.enabled {
            style = Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM);
        }
        if self.focused {
            style = style.add_modifier(Modifier::REVERSED);
        }
        Line::from(vec![
            Span::styled(mark, style),
            Span::styled(self.label.to_string(), style),
        ])
    }
}

/// A single-line value field with an optional placeholder.
///
/// `invalid` paints the value red; used for input that was typed but not
/// accepted.
#[derive(Debug, Clone)]
pub struct TextField<'a> {
    pub value: &'a str,
    pub placeholder: &'a str,
    pub invalid: bool,
    pub enabled: bool,
    pub focused: bool,
}

impl TextField<'_> {
    pub fn line(&self) -> Line<'static> {
        let (text, mut style) = if self.value.is_empty() {
            (
                self.placeholder.to_string(),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            )
        } else if self.invalid {
            (self.value.to_string(), Style::default().fg(Color::Red))
        } else {
            (self.value.to_string(), Style::default().fg(Color::White))
        };
        if !self.enabled {
            style = style.fg(Color::DarkGray).add_modifier(Modifier::DIM);
        }
        if self.focused {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        Line::from(vec![
            Span::styled("› ", Style::default().fg(Color::DarkGray)),
            Span::styled(text, style),
        ])
    }
}

/// Section label, bold and dimmed when disabled.
pub fn label(text: &str, enabled: bool) -> Line<'static> {
    let style = if enabled {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD)
    };
    Line::from(Span::styled(text.to_string(), style))
}

/// Rounded bordered container with a title.
pub fn card(title: &str) -> Block<'static> {
    Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" {title} "),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .padding(Padding::horizontal(1))
}

/// Same as [`card`] with a highlighted border for the focused pane.
pub fn focus_card(title: &str, focused: bool) -> Block<'static> {
    let block = card(title);
    if focused {
        block.border_style(Style::default().fg(Color::Cyan))
    } else {
        block
    }
}

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Braille spinner glyph for an animation frame counter.
pub fn spinner(frame: usize) -> &'static str {
    SPINNER_FRAMES[frame % SPINNER_FRAMES.len()]
}

/// Rect of the given percentage size centered in `outer`, for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::line_text;

    #[test]
    fn button_renders_bracketed_label() {
        assert_eq!(line_text(&Button::new("Send").line()), "[ Send ]");
    }

    #[test]
    fn disabled_button_is_dimmed() {
        let style = Button::new("Go").enabled(false).style();
        assert!(style.add_modifier.contains(Modifier::DIM));
        assert_eq!(style.fg, Some(Color::DarkGray));
    }

    #[test]
    fn focused_button_is_reversed() {
        let style = Button::new("Go").focused(true).style();
        assert!(style.add_modifier.contains(Modifier::REVERSED));
        assert_eq!(style.fg, Some(BUTTON_COLOR));
    }
    #[test]
    fn checkbox_marks() {
        let checked = Checkbox {
            label: "Summarizer",
            checked: true,
            enabled: true,
            focused: false,
        };
        assert_eq!(line_text(&checked.line()), "[x] Summarizer");
        let unchecked = Checkbox {
            checked: false,
            ..checked
        };
        assert_eq!(line_text(&unchecked.line()), "[ ] Summarizer");
    }

    #[test]
    fn text_field_placeholder_and_invalid() {
        let empty = TextField {
            value: "",
            placeholder: "Select a lead",
            invalid: false,
            enabled: true,
            focused: false,
        };
        assert!(line_text(&empty.line()).contains("Select a lead"));

        let bad = TextField {
            value: "abc",
            invalid: true,
            ..empty
        };
        let line = bad.line();
        assert_eq!(line.spans[1].style.fg, Some(Color::Red));
    }
}
