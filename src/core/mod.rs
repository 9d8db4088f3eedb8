//! # Core Application Logic
//!
//! Roundtable's business logic. It knows nothing about any specific UI
//! technology. The reducer performs no I/O: network calls are described as
//! `Effect`s and executed by the adapter. Only `config` touches the disk.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • Roster rules         │
//!                    │                         │
//!                    │  No UI. Pure reducer.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                  ┌─────────────┴─────────────┐
//!                  ▼                           ▼
//!           ┌────────────┐              ┌────────────┐
//!           │    TUI     │   Effect →   │    API     │
//!           │  Adapter   │ ───────────▶ │  GraphQL   │
//!           │ (ratatui)  │ ◀─────────── │  client    │
//!           └────────────┘   ← Action   └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all conversation state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`roster`]: Personality selection, lead and rounds rules
//! - [`notice`]: Transient notifications
//! - [`config`]: Layered configuration (file → env → CLI)

pub mod action;
pub mod config;
pub mod notice;
pub mod roster;
pub mod state;

pub use action::{Action, Effect, update};
pub use state::App;
