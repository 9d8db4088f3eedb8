use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq)]
pub enum TuiEvent {
    // Global
    ForceQuit,    // Ctrl+C / Ctrl+Q
    FocusNext,    // Tab
    FocusPrev,    // Shift+Tab
    NextView,     // Ctrl+T
    PrevView,     // Ctrl+Shift+T
    OpenFeedback, // Ctrl+F
    Escape,
    Resize,

    // Editing (routed to the focused component)
    Submit,
    Newline, // Shift+Enter / Ctrl+J
    InputChar(char),
    Paste(String), // Bracketed paste - preserves newlines
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
    CursorHome,
    CursorEnd,

    // Scrolling (always routed to the main view)
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
    ScrollToBottom, // Ctrl+End - also re-enables stick-to-bottom
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(std::time::Duration::ZERO)
}

/// Poll for an event, blocking up to `timeout`. Terminal read errors are
/// logged and treated as "no event".
pub fn poll_event_timeout(timeout: std::time::Duration) -> Option<TuiEvent> {
    match event::poll(timeout) {
        Ok(true) => {}
        Ok(false) => return None,
        Err(e) => {
            log::warn!("Event poll failed: {}", e);
            return None;
        }
    }
    match event::read() {
        Ok(ev) => translate(ev),
        Err(e) => {
            log::warn!("Event read failed: {}", e);
            None
        }
    }
}

fn translate(ev: Event) -> Option<TuiEvent> {
    match ev {
        Event::Key(key_event) => map_key(key_event),
        Event::Mouse(mouse_event) => match mouse_event.kind {
            MouseEventKind::ScrollUp => Some(TuiEvent::ScrollUp),
            MouseEventKind::ScrollDown => Some(TuiEvent::ScrollDown),
            _ => None,
        },
        Event::Paste(data) => Some(TuiEvent::Paste(data)),
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}

/// Map a key press to a `TuiEvent`. Release events (reported when the
/// keyboard enhancement protocol is active) are dropped.
pub fn map_key(key_event: KeyEvent) -> Option<TuiEvent> {
    if !matches!(key_event.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
        return None;
    }
    log::debug!(
        "Key event: {:?} with modifiers {:?}",
        key_event.code,
        key_event.modifiers
    );

    let mods = key_event.modifiers;
    let ctrl = mods.contains(KeyModifiers::CONTROL);
    let shift = mods.contains(KeyModifiers::SHIFT);
    let alt = mods.contains(KeyModifiers::ALT);

    match key_event.code {
        KeyCode::Char('c') | KeyCode::Char('q') if ctrl => Some(TuiEvent::ForceQuit),
        KeyCode::Char('t') | KeyCode::Char('T') if ctrl && shift => Some(TuiEvent::PrevView),
        KeyCode::Char('t') if ctrl => Some(TuiEvent::NextView),
        KeyCode::Char('f') if ctrl => Some(TuiEvent::OpenFeedback),
        // Ctrl+J is ASCII LF; Ctrl+Enter sends this in most terminals
        KeyCode::Char('j') if ctrl => Some(TuiEvent::Newline),
        KeyCode::Char(_) if ctrl || alt => None,
        KeyCode::Char(c) => Some(TuiEvent::InputChar(c)),

        KeyCode::Enter if shift || alt => Some(TuiEvent::Newline),
        KeyCode::Enter => Some(TuiEvent::Submit),
        KeyCode::Tab => Some(TuiEvent::FocusNext),
        KeyCode::BackTab => Some(TuiEvent::FocusPrev),
        KeyCode::Esc => Some(TuiEvent::Escape),
        KeyCode::Backspace => Some(TuiEvent::Backspace),
        KeyCode::Delete => Some(TuiEvent::Delete),

        KeyCode::Up if ctrl => Some(TuiEvent::ScrollUp),
        KeyCode::Down if ctrl => Some(TuiEvent::ScrollDown),
        KeyCode::End if ctrl => Some(TuiEvent::ScrollToBottom),
        KeyCode::Up => Some(TuiEvent::CursorUp),
        KeyCode::Down => Some(TuiEvent::CursorDown),
        KeyCode::Left => Some(TuiEvent::CursorLeft),
        KeyCode::Right => Some(TuiEvent::CursorRight),
        KeyCode::Home => Some(TuiEvent::CursorHome),
        KeyCode::End => Some(TuiEvent::CursorEnd),
        KeyCode::PageUp => Some(TuiEvent::ScrollPageUp),
        KeyCode::PageDown => Some(TuiEvent::ScrollPageDown),
        _ => None,
    }
}
