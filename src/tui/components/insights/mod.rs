//! # Insight Widgets
//!
//! Read-only renderers for the auxiliary artifacts a conversation response
//! carries: plan, memory, collaboration, metrics and status.
//!
//! Every widget is a pure function `Option<&T> -> Vec<Line<'static>>` that
//! falls back to a placeholder line when there is nothing to show. The lines
//! are displayed by [`InsightPane`], a scrollable card.
//!
//! ```text
//! insights/
//! ├── mod.rs            (shared formatting + InsightPane)
//! ├── plan.rs           (steps and recursive subtasks)
//! ├── memory.rs         (six memory lists, rounds left)
//! ├── collaboration.rs  (per-agent contributions)
//! ├── metrics.rs        (complexity scores)
//! └── status.rs         (round progress bar)
//! ```

pub mod collaboration;
pub mod memory;
pub mod metrics;
pub mod plan;
pub mod status;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::tui::component::Component;
use crate::tui::components::primitives::focus_card;

/// Scores are shown with two decimals.
pub fn format_score(value: f64) -> String {
    format!("{value:.2}")
}

/// Percentages are shown with one decimal and a `%` sign.
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

pub(crate) fn placeholder(text: &str) -> Vec<Line<'static>> {
    vec![Line::from(Span::styled(
        text.to_string(),
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    ))]
}

pub(crate) fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))
}

/// `Label: value` with the value in bold.
pub(crate) fn field(label: &str, value: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("{label}: ")),
        Span::styled(value.into(), Style::default().add_modifier(Modifier::BOLD)),
    ])
}

/// Bulleted list indented by `indent` spaces, or `empty` when there are no
/// items. An empty `empty` text renders nothing for an empty list.
pub(crate) fn bullets(items: &[String], empty: &str, indent: usize) -> Vec<Line<'static>> {
    let pad = " ".repeat(indent);
    if items.is_empty() {
        if empty.is_empty() {
            return Vec::new();
        }
        return vec![Line::from(Span::styled(
            format!("{pad}{empty}"),
            Style::default().fg(Color::DarkGray),
        ))];
    }
    items
        .iter()
        .map(|item| Line::from(format!("{pad}• {item}")))
        .collect()
}

/// Scrollable card hosting one or more widgets' lines.
pub struct InsightPane<'a> {
    pub title: &'a str,
    pub lines: Vec<Line<'static>>,
    pub scroll: &'a mut u16,
    pub focused: bool,
}

impl Component for InsightPane<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = focus_card(self.title, self.focused);
        let inner = block.inner(area);
        let paragraph = Paragraph::new(std::mem::take(&mut self.lines)).wrap(Wrap { trim: false });
        let total = u16::try_from(paragraph.line_count(inner.width)).unwrap_or(u16::MAX);
        *self.scroll = (*self.scroll).min(total.saturating_sub(inner.height));
        frame.render_widget(paragraph.scroll((*self.scroll, 0)).block(block), area);
    }
}
