//! Processing status with a text progress bar.

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use super::{field, format_percent, heading, placeholder};
use crate::api::ProcessingStatus;

pub const EMPTY: &str = "No processing status available.";
const BAR_WIDTH: usize = 20;

/// `████████░░░░` filled in proportion to `percent`, clamped to 0..=100.
pub fn progress_bar(percent: f64, width: usize) -> String {
    let ratio = (percent / 100.0).clamp(0.0, 1.0);
    let filled = (ratio * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn lines(status: Option<&ProcessingStatus>) -> Vec<Line<'static>> {
    let Some(s) = status else {
        return placeholder(EMPTY);
    };
    let mut lines = vec![
        heading("Processing Status"),
        field(
            "Current Round",
            format!("{} / {}", s.current_round, s.total_rounds),
        ),
        field("Current Step", s.current_step.clone()),
        field("Progress", format_percent(s.progress_percentage)),
        Line::from(Span::styled(
            progress_bar(s.progress_percentage, BAR_WIDTH),
            Style::default().fg(Color::Blue),
        )),
    ];
    if let Some(seconds) = s.estimated_time_remaining {
        lines.push(field(
            "Estimated Time Remaining",
            format!("{seconds} seconds"),
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::line_text;

    #[test]
    fn bar_fills_proportionally_and_clamps() {
        assert_eq!(progress_bar(50.0, 10), "█████░░░░░");
        assert_eq!(progress_bar(0.0, 4), "░░░░");
        assert_eq!(progress_bar(140.0, 4), "████");
        assert_eq!(progress_bar(-5.0, 4), "░░░░");
    }

    #[test]
    fn placeholder_when_absent() {
        assert_eq!(line_text(&lines(None)[0]), EMPTY);
    }

    #[test]
    fn status_fields() {
        let status = ProcessingStatus {
            current_round: 1,
            total_rounds: 3,
            current_step: "Drafting".into(),
            progress_percentage: 33.333,
            estimated_time_remaining: Some(42),
        };
        let rendered: Vec<String> = lines(Some(&status)).iter().map(line_text).collect();
        assert!(rendered.contains(&"Current Round: 1 / 3".to_string()));
        assert!(rendered.contains(&"Current Step: Drafting".to_string()));
        assert!(rendered.contains(&"Progress: 33.3%".to_string()));
        assert!(rendered.contains(&"Estimated Time Remaining: 42 seconds".to_string()));
    }

    #[test]
    fn time_remaining_omitted_when_unknown() {
        let rendered: Vec<String> = lines(Some(&ProcessingStatus::default()))
            .iter()
            .map(line_text)
            .collect();
        assert!(!rendered.iter().any(|l| l.starts_with("Estimated")));
    }
}
