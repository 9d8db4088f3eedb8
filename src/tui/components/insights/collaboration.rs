//! Per-agent collaboration records.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use super::{bullets, field, format_score, heading, placeholder};
use crate::api::AgentCollaboration;

pub const EMPTY: &str = "No agent collaboration data available.";

pub fn lines(agents: &[AgentCollaboration]) -> Vec<Line<'static>> {
    if agents.is_empty() {
        return placeholder(EMPTY);
    }
    let mut lines = vec![heading("Agent Collaboration")];
    for agent in agents {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            agent.agent_name.clone(),
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        )));
        lines.push(field("Priority Score", format_score(agent.priority_score)));
        for (title, items) in [
            ("Contributions", &agent.contributions),
            ("Votes Cast", &agent.votes_cast),
            ("Questions Asked", &agent.questions_asked),
        ] {
            if items.is_empty() {
                continue;
            }
            lines.push(Line::from(format!("{title}:")));
            lines.extend(bullets(items, "", 2));
        }
    }
    lines
}
