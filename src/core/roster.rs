//! # Roster
//!
//! Which personalities take part, who leads, and for how many rounds.
//!
//! The rules here back the config panel: every edit is computed as a full
//! next value so the panel can hand complete state to the reducer.
//!
//! Invariants:
//! - `lead` is empty or an element of `selected`
//! - `selected` preserves insertion order and holds no duplicates
//! - `rounds >= 1`

use thiserror::Error;

pub const DEFAULT_PERSONALITIES: &[&str] = &[
    "Helpful Assistant",
    "Sarcastic Assistant",
    "Domain Expert",
    "Creative Writer",
    "Code Generator",
    "Summarizer",
];
pub const DEFAULT_ROUNDS: u32 = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("no personalities selected")]
    NoneSelected,
    #[error("no lead personality set")]
    NoLead,
    #[error("lead '{0}' is not among the selected personalities")]
    LeadNotSelected(String),
    #[error("rounds must be at least 1")]
    NoRounds,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    pub available: Vec<String>,
    pub selected: Vec<String>,
    pub lead: String,
    pub rounds: u32,
}

impl Default for Roster {
    fn default() -> Self {
        let available: Vec<String> = DEFAULT_PERSONALITIES.iter().map(|s| s.to_string()).collect();
        Self {
            selected: vec![available[0].clone()],
            lead: available[0].clone(),
            available,
            rounds: DEFAULT_ROUNDS,
        }
    }
}

/// Result of toggling one personality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toggled {
    pub selected: Vec<String>,
    /// `Some` only when the lead had to move (the lead itself was toggled off).
    pub lead: Option<String>,
}

/// Outcome of parsing the rounds field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundsInput {
    Accept(u32),
    Reject,
}

/// Parse the rounds field. Empty means 1; anything that isn't a whole
/// number >= 1 is rejected and must not be propagated.
pub fn parse_rounds(raw: &str) -> RoundsInput {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return RoundsInput::Accept(1);
    }
    match trimmed.parse::<i64>() {
        Ok(n) if n >= 1 => u32::try_from(n).map_or(RoundsInput::Reject, RoundsInput::Accept),
        _ => RoundsInput::Reject,
    }
}

impl Roster {
    /// Build a roster from configured values, repairing anything that would
    /// break the invariants.
    pub fn sanitized(available: Vec<String>, selected: Vec<String>, lead: String, rounds: u32) -> Self {
        let mut available_unique: Vec<String> = Vec::with_capacity(available.len());
        for name in available {
            if !available_unique.contains(&name) {
                available_unique.push(name);
            }
        }

        let mut chosen: Vec<String> = Vec::new();
        for name in selected {
            if available_unique.contains(&name) && !chosen.contains(&name) {
                chosen.push(name);
            }
        }

        let lead = if chosen.contains(&lead) {
            lead
        } else {
            chosen.first().cloned().unwrap_or_default()
        };

        Self {
            available: available_unique,
            selected: chosen,
            lead,
            rounds: rounds.max(1),
        }
    }

    pub fn is_selected(&self, personality: &str) -> bool {
        self.selected.iter().any(|p| p == personality)
    }

    /// Compute the selection after toggling `personality`, reassigning the
    /// lead if it was the one removed.
    pub fn toggle(&self, personality: &str) -> Toggled {
        if self.is_selected(personality) {
            let selected: Vec<String> = self
                .selected
                .iter()
                .filter(|p| p.as_str() != personality)
                .cloned()
                .collect();
            let lead = (self.lead == personality)
                .then(|| selected.first().cloned().unwrap_or_default());
            Toggled { selected, lead }
        } else {
            let mut selected = self.selected.clone();
            selected.push(personality.to_string());
            Toggled {
                selected,
                lead: None,
            }
        }
    }

    /// The selected personality after (`step = 1`) or before (`step = -1`)
    /// the current lead, wrapping around. An unset lead starts at the first.
    pub fn cycle_lead(&self, step: isize) -> Option<String> {
        if self.selected.is_empty() {
            return None;
        }
        let len = self.selected.len() as isize;
        let next = match self.selected.iter().position(|p| *p == self.lead) {
            Some(i) => (i as isize + step).rem_euclid(len),
            None => 0,
        };
        self.selected.get(next as usize).cloned()
    }

    pub fn validate(&self) -> Result<(), RosterError> {
        if self.selected.is_empty() {
            return Err(RosterError::NoneSelected);
        }
        if self.lead.is_empty() {
            return Err(RosterError::NoLead);
        }
        if !self.is_selected(&self.lead) {
            return Err(RosterError::LeadNotSelected(self.lead.clone()));
        }
        if self.rounds == 0 {
            return Err(RosterError::NoRounds);
        }
        Ok(())
    }

    /// Whether the start action is enabled.
    pub fn can_start(&self, busy: bool) -> bool {
        !busy && self.validate().is_ok()
    }

    /// Turn count at which a conversation with a final output counts as finished.
    pub fn expected_turns(&self) -> usize {
        self.rounds as usize * self.selected.len() * 2
    }

    /// Synthetic system message that opens every session.
    pub fn announcement(&self) -> String {
        format!(
            "Conversation started with {} leading {} for {} rounds. Send your first message.",
            self.lead,
            self.selected.join(", "),
            self.rounds
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(selected: &[&str], lead: &str, rounds: u32) -> Roster {
        Roster {
            available: vec!["Alice".into(), "Bob".into(), "Carol".into()],
            selected: selected.iter().map(|s| s.to_string()).collect(),
            lead: lead.to_string(),
            rounds,
        }
    }

    #[test]
    fn test_default_roster() {
        let r = Roster::default();
        assert_eq!(r.available.len(), 6);
        assert_eq!(r.selected, vec!["Helpful Assistant".to_string()]);
        assert_eq!(r.lead, "Helpful Assistant");
        assert_eq!(r.rounds, 3);
        assert!(r.can_start(false));
    }

    #[test]
    fn test_deselecting_lead_moves_to_first_remaining() {
        let r = roster(&["Alice", "Bob"], "Alice", 2);
        let toggled = r.toggle("Alice");
        assert_eq!(toggled.selected, vec!["Bob".to_string()]);
        assert_eq!(toggled.lead.as_deref(), Some("Bob"));
    }

    #[test]
    fn test_deselecting_last_lead_clears_it() {
        let r = roster(&["Alice"], "Alice", 2);
        let toggled = r.toggle("Alice");
        assert!(toggled.selected.is_empty());
        assert_eq!(toggled.lead.as_deref(), Some(""));
    }

    #[test]
    fn test_deselecting_non_lead_keeps_lead() {
        let r = roster(&["Alice", "Bob"], "Alice", 2);
        let toggled = r.toggle("Bob");
        assert_eq!(toggled.selected, vec!["Alice".to_string()]);
        assert_eq!(toggled.lead, None);
    }

    #[test]
    fn test_selecting_appends_in_order() {
        let r = roster(&["Bob"], "Bob", 2);
        let toggled = r.toggle("Alice");
        assert_eq!(toggled.selected, vec!["Bob".to_string(), "Alice".to_string()]);
        assert_eq!(toggled.lead, None);
    }

    #[test]
    fn test_parse_rounds() {
        assert_eq!(parse_rounds("3"), RoundsInput::Accept(3));
        assert_eq!(parse_rounds(""), RoundsInput::Accept(1));
        assert_eq!(parse_rounds("  "), RoundsInput::Accept(1));
        assert_eq!(parse_rounds("0"), RoundsInput::Reject);
        assert_eq!(parse_rounds("-5"), RoundsInput::Reject);
        assert_eq!(parse_rounds("abc"), RoundsInput::Reject);
        assert_eq!(parse_rounds("99999999999"), RoundsInput::Reject);
        assert_eq!(parse_rounds("3abc"), RoundsInput::Reject);
        assert_eq!(parse_rounds("1.5"), RoundsInput::Reject);
    }

    #[test]
    fn test_start_disabled_matrix() {
        assert!(!roster(&[], "", 3).can_start(false));
        assert!(!roster(&["Alice"], "", 3).can_start(false));
        assert!(!roster(&["Alice"], "Alice", 0).can_start(false));
        assert!(!roster(&["Alice"], "Alice", 3).can_start(true));
        assert!(roster(&["Alice"], "Alice", 3).can_start(false));
        assert!(roster(&["Alice", "Bob"], "Bob", 1).can_start(false));
    }

    #[test]
    fn test_validate_reports_reason() {
        assert_eq!(roster(&[], "", 3).validate(), Err(RosterError::NoneSelected));
        assert_eq!(roster(&["Alice"], "", 3).validate(), Err(RosterError::NoLead));
        assert_eq!(
            roster(&["Alice"], "Bob", 3).validate(),
            Err(RosterError::LeadNotSelected("Bob".into()))
        );
        assert_eq!(roster(&["Alice"], "Alice", 0).validate(), Err(RosterError::NoRounds));
    }

    #[test]
    fn test_cycle_lead_wraps() {
        let r = roster(&["Alice", "Bob", "Carol"], "Carol", 1);
        assert_eq!(r.cycle_lead(1).as_deref(), Some("Alice"));
        assert_eq!(r.cycle_lead(-1).as_deref(), Some("Bob"));
        let unset = roster(&["Alice", "Bob"], "", 1);
        assert_eq!(unset.cycle_lead(1).as_deref(), Some("Alice"));
        assert_eq!(roster(&[], "", 1).cycle_lead(1), None);
    }

    #[test]
    fn test_expected_turns() {
        assert_eq!(roster(&["Alice", "Bob"], "Alice", 3).expected_turns(), 12);
        assert_eq!(roster(&["Alice"], "Alice", 1).expected_turns(), 2);
    }

    #[test]
    fn test_announcement() {
        let r = roster(&["Alice", "Bob"], "Bob", 2);
        assert_eq!(
            r.announcement(),
            "Conversation started with Bob leading Alice, Bob for 2 rounds. Send your first message."
        );
    }

    #[test]
    fn test_sanitized_repairs_invariants() {
        let r = Roster::sanitized(
            vec!["Alice".into(), "Bob".into(), "Alice".into()],
            vec!["Zed".into(), "Bob".into(), "Bob".into()],
            "Alice".into(),
            0,
        );
        assert_eq!(r.available, vec!["Alice".to_string(), "Bob".to_string()]);
        assert_eq!(r.selected, vec!["Bob".to_string()]);
        assert_eq!(r.lead, "Bob");
        assert_eq!(r.rounds, 1);
    }
}
