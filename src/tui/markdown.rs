//! Markdown → ratatui `Text` for the lead's final output.
//!
//! Built on `pulldown_cmark` events. Fenced code blocks are buffered and
//! highlighted with `syntect` once the fence closes; tables are laid out as
//! aligned, pipe-separated rows. Everything else (headings, emphasis, lists,
//! quotes, links, rules) maps onto span styles.

use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;
use unicode_width::UnicodeWidthStr;

static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEMES: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const CODE_THEME: &str = "base16-ocean.dark";
const RULE_WIDTH: usize = 32;

fn frame_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Render markdown into owned, styled text. `base` is the body color.
pub fn render(source: &str, base: Color) -> Text<'static> {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let mut renderer = Renderer::new(base);
    for event in Parser::new_ext(source, options) {
        renderer.event(event);
    }
    renderer.finish()
}

struct CodeBlock {
    lang: String,
    body: String,
}

#[derive(Default)]
struct Table {
    rows: Vec<Vec<String>>,
    row: Vec<String>,
    cell: String,
    header_rows: usize,
}

struct Renderer {
    base: Color,
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    styles: Vec<Style>,
    /// `None` for bullets, `Some(next)` for numbered lists.
    lists: Vec<Option<u64>>,
    quote_depth: usize,
    code: Option<CodeBlock>,
    table: Option<Table>,
    link: Option<String>,
    pending_gap: bool,
}

impl Renderer {
    fn new(base: Color) -> Self {
        Self {
            base,
            lines: Vec::new(),
            current: Vec::new(),
            styles: Vec::new(),
            lists: Vec::new(),
            quote_depth: 0,
            code: None,
            table: None,
            link: None,
            pending_gap: false,
        }
    }

    fn finish(mut self) -> Text<'static> {
        self.flush();
        Text::from(self.lines)
    }

    fn style(&self) -> Style {
        self.styles
            .last()
            .copied()
            .unwrap_or_else(|| Style::default().fg(self.base))
    }

    fn push_style(&mut self, overlay: Style) {
        let next = self.style().patch(overlay);
        self.styles.push(next);
    }

    /// Emit the line under construction, prefixed with quote bars.
    fn flush(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let mut spans = self.quote_prefix();
        spans.append(&mut self.current);
        self.lines.push(Line::from(spans));
    }

    fn quote_prefix(&self) -> Vec<Span<'static>> {
        (0..self.quote_depth)
            .map(|_| Span::styled("▌ ", frame_style()))
            .collect()
    }

    /// Start a new block, separated from the previous one by a blank line.
    fn open_block(&mut self) {
        self.flush();
        if self.pending_gap && !self.lines.is_empty() {
            self.lines.push(Line::default());
        }
        self.pending_gap = false;
    }

    fn close_block(&mut self) {
        self.flush();
        self.pending_gap = true;
    }

    fn event(&mut self, event: Event<'_>) {
        if let Some(code) = self.code.as_mut() {
            match event {
                Event::Text(t) => code.body.push_str(&t),
                Event::End(TagEnd::CodeBlock) => self.end_code_block(),
                _ => {}
            }
            return;
        }
        if let Some(table) = self.table.as_mut() {
            match event {
                Event::Text(t) | Event::Code(t) => table.cell.push_str(&t),
                Event::End(TagEnd::TableCell) => {
                    let cell = std::mem::take(&mut table.cell);
                    table.row.push(cell.trim().to_string());
                }
                Event::End(TagEnd::TableHead) => {
                    let row = std::mem::take(&mut table.row);
                    table.rows.push(row);
                    table.header_rows = table.rows.len();
                }
                Event::End(TagEnd::TableRow) => {
                    let row = std::mem::take(&mut table.row);
                    table.rows.push(row);
                }
                Event::End(TagEnd::Table) => self.end_table(),
                _ => {}
            }
            return;
        }

        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(t) => {
                let style = self.style();
                self.current.push(Span::styled(t.replace('\t', "    "), style));
            }
            Event::Code(c) => self.current.push(Span::styled(
                c.to_string(),
                Style::default().fg(Color::Yellow).bg(Color::Black),
            )),
            Event::SoftBreak => {
                let style = self.style();
                self.current.push(Span::styled(" ", style));
            }
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.open_block();
                self.lines
                    .push(Line::from(Span::styled("─".repeat(RULE_WIDTH), frame_style())));
                self.pending_gap = true;
            }
            Event::TaskListMarker(done) => {
                let mark = if done { "☑ " } else { "☐ " };
                self.current.push(Span::styled(mark, frame_style()));
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                if self.lists.is_empty() {
                    self.open_block();
                }
            }
            Tag::Heading { level, .. } => {
                self.open_block();
                self.push_style(heading_style(level));
            }
            Tag::BlockQuote(_) => {
                self.open_block();
                self.quote_depth += 1;
                self.push_style(Style::default().add_modifier(Modifier::ITALIC));
            }
            Tag::CodeBlock(kind) => {
                self.open_block();
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().unwrap_or_default().to_string()
                    }
                    CodeBlockKind::Indented => String::new(),
                };
                self.code = Some(CodeBlock {
                    lang,
                    body: String::new(),
                });
            }
            Tag::List(start) => {
                if self.lists.is_empty() {
                    self.open_block();
                } else {
                    self.flush();
                }
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush();
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let m = format!("{indent}{n}. ");
                        *n += 1;
                        m
                    }
                    _ => format!("{indent}• "),
                };
                self.current.push(Span::styled(marker, Style::default().fg(Color::Cyan)));
            }
            Tag::Table(_) => {
                self.open_block();
                self.table = Some(Table::default());
            }
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::Link { dest_url, .. } => {
                self.link = Some(dest_url.to_string());
                self.push_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED));
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                if self.lists.is_empty() {
                    self.close_block();
                } else {
                    self.flush();
                }
            }
            TagEnd::Heading(_) => {
                self.styles.pop();
                self.close_block();
            }
            TagEnd::BlockQuote(_) => {
                self.flush();
                self.styles.pop();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.pending_gap = true;
            }
            TagEnd::List(_) => {
                self.flush();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.pending_gap = true;
                }
            }
            TagEnd::Item => self.flush(),
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.styles.pop();
            }
            TagEnd::Link => {
                self.styles.pop();
                if let Some(url) = self.link.take() {
                    self.current.push(Span::styled(format!(" <{url}>"), frame_style()));
                }
            }
            _ => {}
        }
    }

    fn end_code_block(&mut self) {
        let Some(code) = self.code.take() else {
            return;
        };
        let label = if code.lang.is_empty() {
            "code".to_string()
        } else {
            code.lang.clone()
        };
        self.lines.push(Line::from(vec![
            Span::styled("┌ ", frame_style()),
            Span::styled(label, frame_style().add_modifier(Modifier::BOLD)),
        ]));
        for line in highlight(&code.lang, &code.body) {
            let mut spans = vec![Span::styled("│ ", frame_style())];
            spans.extend(line.spans);
            self.lines.push(Line::from(spans));
        }
        self.lines.push(Line::from(Span::styled("└", frame_style())));
        self.pending_gap = true;
    }

    fn end_table(&mut self) {
        let Some(table) = self.table.take() else {
            return;
        };
        let columns = table.rows.iter().map(Vec::len).max().unwrap_or(0);
        let widths: Vec<usize> = (0..columns)
            .map(|c| {
                table
                    .rows
                    .iter()
                    .filter_map(|r| r.get(c))
                    .map(|cell| cell.width())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        for (i, row) in table.rows.iter().enumerate() {
            let is_header = i < table.header_rows;
            let cell_style = if is_header {
                Style::default().fg(self.base).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.base)
            };
            let mut spans = Vec::new();
            for (c, width) in widths.iter().enumerate() {
                let cell = row.get(c).map(String::as_str).unwrap_or("");
                let pad = width.saturating_sub(cell.width());
                spans.push(Span::styled(if c == 0 { "" } else { " │ " }, frame_style()));
                spans.push(Span::styled(format!("{cell}{}", " ".repeat(pad)), cell_style));
            }
            self.lines.push(Line::from(spans));
            if is_header && i + 1 == table.header_rows {
                let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
                self.lines
                    .push(Line::from(Span::styled(rule.join("─┼─"), frame_style())));
            }
        }
        self.pending_gap = true;
    }
}

fn heading_style(level: HeadingLevel) -> Style {
    match level {
        HeadingLevel::H1 => Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        HeadingLevel::H2 => Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        _ => Style::default().add_modifier(Modifier::BOLD),
    }
}

fn code_theme() -> Option<&'static Theme> {
    THEMES.themes.get(CODE_THEME)
}

/// Highlight `body` as `lang`; unknown languages come back as plain lines.
fn highlight(lang: &str, body: &str) -> Vec<Line<'static>> {
    let body = body.replace('\t', "    ");
    let syntax = (!lang.is_empty())
        .then(|| SYNTAXES.find_syntax_by_token(lang))
        .flatten();

    let (Some(syntax), Some(theme)) = (syntax, code_theme()) else {
        return body
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(Color::White))))
            .collect();
    };

    let mut highlighter = HighlightLines::new(syntax, theme);
    LinesWithEndings::from(&body)
        .map(|line| match highlighter.highlight_line(line, &SYNTAXES) {
            Ok(ranges) => Line::from(
                ranges
                    .into_iter()
                    .filter_map(|(style, fragment)| {
                        let text = fragment.trim_end_matches(['\n', '\r']);
                        (!text.is_empty()).then(|| {
                            let fg = style.foreground;
                            Span::styled(text.to_string(), Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b)))
                        })
                    })
                    .collect::<Vec<_>>(),
            ),
            Err(e) => {
                log::debug!("Highlighting failed for {}: {}", lang, e);
                Line::from(line.trim_end().to_string())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::line_text;

    fn plain(text: &Text<'_>) -> Vec<String> {
        text.lines.iter().map(line_text).collect()
    }

    #[test]
    fn paragraph_uses_base_color() {
        let text = render("Final answer", Color::Green);
        assert_eq!(plain(&text), vec!["Final answer"]);
        assert_eq!(text.lines[0].spans[0].style.fg, Some(Color::Green));
    }

    #[test]
    fn heading_text_is_bold() {
        let text = render("## Summary", Color::White);
        let span = &text.lines[0].spans[0];
        assert_eq!(span.content, "Summary");
        assert!(span.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn blocks_are_separated_by_blank_line() {
        let text = render("First\n\nSecond", Color::White);
        assert_eq!(plain(&text), vec!["First", "", "Second"]);
    }

    #[test]
    fn bullet_and_numbered_lists() {
        let text = render("- a\n- b\n\n1. x\n2. y", Color::White);
        let lines = plain(&text);
        assert!(lines.contains(&"• a".to_string()));
        assert!(lines.contains(&"• b".to_string()));
        assert!(lines.contains(&"1. x".to_string()));
        assert!(lines.contains(&"2. y".to_string()));
    }

    #[test]
    fn code_block_is_framed_with_language() {
        let text = render("```rust\nfn main() {}\n```", Color::White);
        let lines = plain(&text);
        assert_eq!(lines[0], "┌ rust");
        assert!(lines[1].starts_with("│ "));
        assert!(lines[1].contains("fn main() {}"));
        assert_eq!(lines.last().map(String::as_str), Some("└"));
    }

    #[test]
    fn unknown_language_still_renders() {
        let text = render("```nosuchlang\nline1\nline2\n```", Color::White);
        let lines = plain(&text);
        assert!(lines.iter().any(|l| l == "│ line1"));
        assert!(lines.iter().any(|l| l == "│ line2"));
    }

    #[test]
    fn tabs_become_spaces() {
        let text = render("```\n\tindented\n```", Color::White);
        assert!(plain(&text).iter().any(|l| l.contains("    indented")));
        assert!(!plain(&text).iter().any(|l| l.contains('\t')));
    }

    #[test]
    fn table_columns_align() {
        let text = render("| a | bb |\n|---|---|\n| ccc | d |", Color::White);
        let lines = plain(&text);
        assert_eq!(lines[0], "a   │ bb");
        assert!(lines[1].contains('┼'));
        assert_eq!(lines[2], "ccc │ d ");
    }

    #[test]
    fn inline_code_and_links() {
        let text = render("Run `cargo` at [docs](https://example.org)", Color::White);
        let line = &text.lines[0];
        assert!(line.spans.iter().any(|s| s.content == "cargo" && s.style.fg == Some(Color::Yellow)));
        assert!(line_text(line).contains("<https://example.org>"));
    }

    #[test]
    fn blockquote_is_prefixed() {
        let text = render("> quoted", Color::White);
        assert_eq!(plain(&text), vec!["▌ quoted"]);
    }
}
