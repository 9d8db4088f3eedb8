//! Execution plan: one block per step, subtasks nested below it with one
//! extra indent level per depth. There is no depth cap.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use super::{heading, placeholder};
use crate::api::{Plan, PlanStep, Subtask};

pub const EMPTY: &str = "No plan available.";

/// Step and subtask share a layout; only field names differ.
struct Node<'a> {
    number: i64,
    name: &'a str,
    description: &'a str,
    explanation: &'a str,
    output: &'a str,
    completed: bool,
    children: &'a [Subtask],
}

impl<'a> From<&'a PlanStep> for Node<'a> {
    fn from(step: &'a PlanStep) -> Self {
        Self {
            number: step.step_number,
            name: &step.step_name,
            description: &step.step_description,
            explanation: &step.step_explanation,
            output: &step.step_output,
            completed: step.completed,
            children: &step.subtasks,
        }
    }
}

impl<'a> From<&'a Subtask> for Node<'a> {
    fn from(subtask: &'a Subtask) -> Self {
        Self {
            number: subtask.subtask_number,
            name: &subtask.subtask_name,
            description: &subtask.subtask_description,
            explanation: &subtask.subtask_explanation,
            output: &subtask.subtask_output,
            completed: subtask.completed,
            children: &subtask.subtasks,
        }
    }
}

fn push_node(lines: &mut Vec<Line<'static>>, node: Node<'_>, depth: usize) {
    let pad = if depth == 0 {
        String::new()
    } else {
        format!("{}│ ", "  ".repeat(depth - 1))
    };
    let indented = |span: Span<'static>| {
        Line::from(vec![
            Span::styled(pad.clone(), Style::default().fg(Color::DarkGray)),
            span,
        ])
    };

    lines.push(indented(Span::styled(
        format!("{} (Step {})", node.name, node.number),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    if !node.description.is_empty() {
        lines.push(indented(Span::raw(node.description.to_string())));
    }
    if !node.explanation.is_empty() {
        lines.push(indented(Span::styled(
            format!("Explanation: {}", node.explanation),
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        )));
    }
    if !node.output.is_empty() {
        lines.push(indented(Span::styled(
            format!("Output: {}", node.output),
            Style::default().fg(Color::Green),
        )));
    }
    let (status, color) = if node.completed {
        ("Completed", Color::Green)
    } else {
        ("Pending", Color::Red)
    };
    lines.push(indented(Span::styled(
        format!("Status: {status}"),
        Style::default().fg(color),
    )));

    if !node.children.is_empty() {
        lines.push(indented(Span::styled(
            "Subtasks:",
            Style::default().add_modifier(Modifier::UNDERLINED),
        )));
        for child in node.children {
            push_node(lines, child.into(), depth + 1);
        }
    }
}

pub fn lines(plan: Option<&Plan>) -> Vec<Line<'static>> {
    let Some(plan) = plan.filter(|p| !p.steps.is_empty()) else {
        return placeholder(EMPTY);
    };
    let mut lines = vec![heading("Execution Plan")];
    for step in &plan.steps {
        lines.push(Line::default());
        push_node(&mut lines, step.into(), 0);
    }
    lines
}
