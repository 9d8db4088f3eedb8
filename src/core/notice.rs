//! # Notices
//!
//! Transient notifications ("toasts"). Raised by the reducer, shown by the
//! TUI for a few seconds, then pruned.

use std::time::{Duration, Instant};

/// How long a notice stays on screen.
pub const NOTICE_TTL: Duration = Duration::from_secs(5);
/// Older notices are dropped beyond this many.
const MAX_NOTICES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: Level,
    pub message: String,
    pub raised_at: Instant,
}

#[derive(Debug, Default)]
pub struct Notices {
    items: Vec<Notice>,
}

impl Notices {
    pub fn push(&mut self, level: Level, message: impl Into<String>) {
        let message = message.into();
        match level {
            Level::Error => log::error!("notice: {}", message),
            Level::Warning => log::warn!("notice: {}", message),
            _ => log::info!("notice: {}", message),
        }
        self.items.push(Notice {
            level,
            message,
            raised_at: Instant::now(),
        });
        if self.items.len() > MAX_NOTICES {
            let excess = self.items.len() - MAX_NOTICES;
            self.items.drain(..excess);
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Level::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Level::Success, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Level::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Level::Error, message);
    }

    /// Drop notices older than the TTL. Returns true if anything was removed.
    pub fn prune(&mut self, now: Instant) -> bool {
        let before = self.items.len();
        self.items
            .retain(|n| now.saturating_duration_since(n.raised_at) < NOTICE_TTL);
        self.items.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.items.iter()
    }

    pub fn last(&self) -> Option<&Notice> {
        self.items.last()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}
