//! # TUI Components
//!
//! All widgets of the Roundtable screen.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Built fresh each frame from `App` data:
//! - `TitleBar`: phase, lead, rounds and session number
//! - `MessageBubble`: one conversation turn
//! - `Toasts`: transient notices in the top-right corner
//! - `insights::*`: plan, memory, collaboration, metrics and status views
//!
//! ### Stateful Components (Event-Driven)
//!
//! Persistent state lives in `TuiState`; each handles `TuiEvent`s and emits
//! a component-level event the event loop turns into a core `Action`:
//! - `ConfigPanelState` → `ConfigEvent`
//! - `ChatInput` → `ChatEvent`
//! - `FeedbackFormState` → `FeedbackEvent`
//! - `ThreadState` handles scrolling only
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs            (this file)
//! ├── primitives.rs     (button, checkbox, field, card, spinner)
//! ├── title_bar.rs      (top status bar)
//! ├── config_panel.rs   (personalities, lead, rounds, start)
//! ├── message.rs        (single turn bubble)
//! ├── thread.rs         (scrollable conversation + questions + final output)
//! ├── chat_input.rs     (multi-line message box)
//! ├── feedback_form.rs  (rating overlay)
//! ├── toast.rs          (notice overlay)
//! └── insights/         (auxiliary artifact views)
//! ```

pub mod chat_input;
pub mod config_panel;
pub mod feedback_form;
pub mod insights;
pub mod message;
pub mod primitives;
pub mod thread;
mod title_bar;
mod toast;

pub use chat_input::{ChatEvent, ChatInput};
pub use config_panel::{ConfigEvent, ConfigPanel, ConfigPanelState};
pub use feedback_form::{FeedbackEvent, FeedbackForm, FeedbackFormState};
pub use insights::InsightPane;
pub use message::MessageBubble;
pub use thread::{Thread, ThreadProps, ThreadState};
pub use title_bar::TitleBar;
pub use toast::Toasts;
