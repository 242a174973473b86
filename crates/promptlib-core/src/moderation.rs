//! Prompt moderation status.
//!
//! A prompt starts out `pending`. An external moderator moves it to
//! `approved` or `rejected`. Any edit by the author sends it back to
//! `pending`, whatever state it was in.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Moderation status of a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PromptStatus {
    /// Awaiting moderation.
    #[default]
    Pending,
    /// Visible in public listings.
    Approved,
    /// Hidden from public listings.
    Rejected,
}

impl PromptStatus {
    /// Status assigned to a newly created prompt.
    pub fn initial() -> Self {
        PromptStatus::Pending
    }

    /// Status a prompt takes after its author edits it.
    pub fn after_edit(self) -> Self {
        match self {
            PromptStatus::Pending | PromptStatus::Approved | PromptStatus::Rejected => {
                PromptStatus::Pending
            }
        }
    }

    /// Whether a moderator may move a prompt from `self` to `target`.
    ///
    /// Only edits can return a prompt to `pending`.
    pub fn can_moderate_to(self, target: PromptStatus) -> bool {
        match (self, target) {
            (_, PromptStatus::Pending) => false,
            (PromptStatus::Pending, _) => true,
            (PromptStatus::Approved, PromptStatus::Rejected) => true,
            (PromptStatus::Rejected, PromptStatus::Approved) => true,
            (PromptStatus::Approved, PromptStatus::Approved) => false,
            (PromptStatus::Rejected, PromptStatus::Rejected) => false,
        }
    }

    /// Whether prompts in this status appear in public listings.
    pub fn is_publicly_listable(self) -> bool {
        matches!(self, PromptStatus::Approved)
    }

    /// Returns all statuses.
    pub fn all() -> &'static [PromptStatus] {
        &[
            PromptStatus::Pending,
            PromptStatus::Approved,
            PromptStatus::Rejected,
        ]
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptStatus::Pending => "pending",
            PromptStatus::Approved => "approved",
            PromptStatus::Rejected => "rejected",
        }
    }

    /// Parse from database string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PromptStatus::Pending),
            "approved" => Some(PromptStatus::Approved),
            "rejected" => Some(PromptStatus::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for PromptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_prompts_are_pending() {
        assert_eq!(PromptStatus::initial(), PromptStatus::Pending);
        assert_eq!(PromptStatus::default(), PromptStatus::Pending);
    }

    #[test]
    fn any_edit_returns_to_pending() {
        for status in PromptStatus::all() {
            assert_eq!(status.after_edit(), PromptStatus::Pending);
        }
    }

    #[test]
    fn moderation_transitions() {
        use PromptStatus::*;

        assert!(Pending.can_moderate_to(Approved));
        assert!(Pending.can_moderate_to(Rejected));
        assert!(Approved.can_moderate_to(Rejected));
        assert!(Rejected.can_moderate_to(Approved));

        assert!(!Pending.can_moderate_to(Pending));
        assert!(!Approved.can_moderate_to(Pending));
        assert!(!Rejected.can_moderate_to(Pending));
        assert!(!Approved.can_moderate_to(Approved));
    }

    #[test]
    fn only_approved_is_listable() {
        assert!(PromptStatus::Approved.is_publicly_listable());
        assert!(!PromptStatus::Pending.is_publicly_listable());
        assert!(!PromptStatus::Rejected.is_publicly_listable());
    }

    #[test]
    fn parse_round_trip() {
        for status in PromptStatus::all() {
            assert_eq!(PromptStatus::parse(status.as_str()), Some(*status));
        }
        assert_eq!(PromptStatus::parse("archived"), None);
    }
}
