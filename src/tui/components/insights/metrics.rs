//! Complexity scores for the current conversation.

use ratatui::text::Line;

use super::{field, format_percent, format_score, heading, placeholder};
use crate::api::ComplexityMetrics;

pub const EMPTY: &str = "No complexity metrics available.";

pub fn lines(metrics: Option<&ComplexityMetrics>) -> Vec<Line<'static>> {
    let Some(m) = metrics else {
        return placeholder(EMPTY);
    };
    vec![
        heading("Complexity Metrics"),
        field("Overall Score", format_score(m.overall_score)),
        field("Reasoning Depth", format_score(m.reasoning_depth)),
        field("Solution Complexity", format_score(m.solution_complexity)),
        field(
            "Collaboration Intensity",
            format_score(m.collaboration_intensity),
        ),
        field("Confidence Level", format_percent(m.confidence_level * 100.0)),
    ]
}
