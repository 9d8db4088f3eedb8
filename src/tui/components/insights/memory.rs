//! Conversation memory: the running notes the assistants keep between
//! rounds.

use ratatui::text::Line;

use super::{bullets, field, heading, placeholder};
use crate::api::ConversationMemory;

pub const EMPTY: &str = "No conversation memory available.";

pub fn lines(memory: Option<&ConversationMemory>) -> Vec<Line<'static>> {
    let Some(memory) = memory else {
        return placeholder(EMPTY);
    };

    let sections: [(&str, &[String], &str); 6] = [
        ("Facts", memory.facts.as_slice(), "No facts recorded."),
        ("Arguments", memory.arguments.as_slice(), "No arguments recorded."),
        ("Decisions", memory.decisions.as_slice(), "No decisions recorded."),
        ("To-Do List", memory.to_do_list.as_slice(), "To-do list is empty."),
        ("Completed Tasks", memory.completed_tasks.as_slice(), "No tasks completed yet."),
        (
            "Recommended Actions",
            memory.recommended_actions.as_slice(),
            "No recommended actions.",
        ),
    ];

    let mut lines = Vec::new();
    for (title, items, empty) in sections {
        lines.push(heading(title));
        lines.extend(bullets(items, empty, 2));
        lines.push(Line::default());
    }
    if !memory.direct_replies.is_empty() {
        lines.push(heading("Direct Replies"));
        lines.extend(bullets(&memory.direct_replies, "", 2));
        lines.push(Line::default());
    }

    lines.push(field("Rounds Left", memory.rounds_left.to_string()));
    if let Some(kind) = memory.decided_output_type.as_deref().filter(|k| !k.is_empty()) {
        lines.push(field("Decided Output Type", kind));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::line_text;

    fn text(memory: Option<&ConversationMemory>) -> Vec<String> {
        lines(memory).iter().map(line_text).collect()
    }

    #[test]
    fn placeholder_when_absent() {
        assert_eq!(text(None), vec![EMPTY]);
    }

    #[test]
    fn empty_lists_show_their_own_text() {
        let rendered = text(Some(&ConversationMemory::default()));
        for empty in [
            "  No facts recorded.",
            "  No arguments recorded.",
            "  No decisions recorded.",
            "  To-do list is empty.",
            "  No tasks completed yet.",
            "  No recommended actions.",
        ] {
            assert!(rendered.contains(&empty.to_string()), "missing {empty}");
        }
        assert!(!rendered.contains(&"Direct Replies".to_string()));
        assert_eq!(rendered.last().map(String::as_str), Some("Rounds Left: 0"));
    }

    #[test]
    fn populated_memory() {
        let memory = ConversationMemory {
            facts: vec!["Water boils at 100C".into()],
            direct_replies: vec!["Yes".into()],
            rounds_left: 2,
            decided_output_type: Some("code".into()),
            ..Default::default()
        };
        let rendered = text(Some(&memory));
        assert!(rendered.contains(&"  • Water boils at 100C".to_string()));
        assert!(rendered.contains(&"  • Yes".to_string()));
        assert!(rendered.contains(&"Rounds Left: 2".to_string()));
        assert!(rendered.contains(&"Decided Output Type: code".to_string()));
    }
}
