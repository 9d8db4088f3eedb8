//! Frame layout. Pulls props out of `App`, hands them to the components and
//! draws the overlays last.
//!
//! ```text
//! ┌ title bar ─────────────────────────────────────────────┐
//! │ config panel │ tabs                                     │
//! │              │ thread / plan / memory / agents / metrics│
//! │              │ chat input                               │
//! └────────────────────────────────────────────────────────┘
//! ```

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Tabs;

use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::insights::{collaboration, memory, metrics, plan, status};
use crate::tui::components::{
    ConfigPanel, FeedbackForm, InsightPane, Thread, ThreadProps, TitleBar, Toasts,
};
use crate::tui::{Focus, TuiState, View};

/// Width of the config panel column.
pub const PANEL_WIDTH: u16 = 34;

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};

    let [title_area, body] = Layout::vertical([Length(1), Min(0)]).areas(frame.area());
    let [panel_area, right] = Layout::horizontal([Length(PANEL_WIDTH), Min(0)]).areas(body);
    let input_height = tui.chat_input.height(right.width);
    let [tabs_area, main_area, input_area] =
        Layout::vertical([Length(1), Min(0), Length(input_height)]).areas(right);

    TitleBar {
        phase: app.phase,
        lead: &app.roster.lead,
        rounds: app.roster.rounds,
        session: app.session.0,
        started_at: app.started_at,
        has_unseen_content: tui.thread.has_unseen_content(),
        spinner_frame,
    }
    .render(frame, title_area);

    ConfigPanel::new(&mut tui.config_panel, tui.focus == Focus::Panel).render(frame, panel_area);

    draw_tabs(frame, tabs_area, tui.view);
    draw_main(frame, main_area, app, tui, spinner_frame);

    tui.chat_input.loading = app.is_loading();
    tui.chat_input.focused = tui.focus == Focus::Chat && tui.feedback.is_none();
    tui.chat_input.spinner_frame = spinner_frame;
    tui.chat_input.render(frame, input_area);

    if let Some(form) = &tui.feedback {
        FeedbackForm {
            state: form,
            pending: app.feedback_pending,
        }
        .render(frame, frame.area());
    }
    Toasts {
        notices: &app.notices,
    }
    .render(frame, frame.area());
}

fn draw_tabs(frame: &mut Frame, area: Rect, view: View) {
    let titles = View::ALL.iter().map(|v| Line::from(format!(" {} ", v.title())));
    let selected = View::ALL.iter().position(|v| *v == view).unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        )
        .divider("│");
    frame.render_widget(tabs, area);
}

fn draw_main(frame: &mut Frame, area: Rect, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    let focused = tui.focus == Focus::Chat;
    let lines = match tui.view {
        View::Thread => {
            let props = ThreadProps {
                history: &app.history,
                questions: &app.questions,
                final_output: app.final_output.as_deref(),
                last_error: app.last_error.as_deref(),
                is_loading: app.is_loading(),
            };
            Thread::new(&mut tui.thread, props, spinner_frame).render(frame, area);
            return;
        }
        View::Plan => plan::lines(app.insights.plan.as_ref()),
        View::Memory => memory::lines(app.insights.memory.as_ref()),
        View::Agents => collaboration::lines(&app.insights.collaboration),
        View::Metrics => {
            let mut lines = metrics::lines(app.insights.metrics.as_ref());
            lines.push(Line::default());
            lines.extend(status::lines(app.insights.status.as_ref()));
            lines
        }
    };
    InsightPane {
        title: tui.view.title(),
        lines,
        scroll: &mut tui.insight_scroll,
        focused,
    }
    .render(frame, area);
}
