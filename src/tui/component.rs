use ratatui::Frame;
use ratatui::layout::Rect;

use super::event::TuiEvent;

/// A reusable UI component.
///
/// Components receive data via props (struct fields), may borrow persistent
/// state (`&'a mut FooState`), and render into a `Rect` of the frame.
///
/// `render` takes `&mut self` so components can update presentation state
/// (scroll offsets, cached viewport sizes) during the render pass, the same
/// way Ratatui's `StatefulWidget` does.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that handles terminal events.
pub trait EventHandler {
    /// The type of high-level event this component emits.
    type Event;

    /// Handle a low-level `TuiEvent` and optionally return a high-level event.
    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
