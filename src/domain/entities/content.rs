//! Narrative content entries authored by operators

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{MoveType, Team, Tier};

/// One authored story for a move.
///
/// `team` and `tier` are `None` when the entry was authored outside the
/// corresponding scope: bribes have neither, and untiered entries apply to
/// every tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntry {
    pub move_type: MoveType,
    pub team: Option<Team>,
    pub tier: Option<Tier>,
    pub critical: bool,
    /// Raw text as authored, whitespace-trimmed
    pub text: String,
}

impl ContentEntry {
    pub fn new(move_type: MoveType, text: impl Into<String>) -> Self {
        Self {
            move_type,
            team: None,
            tier: None,
            critical: false,
            text: text.into(),
        }
    }

    pub fn for_team(mut self, team: Team) -> Self {
        self.team = Some(team);
        self
    }

    pub fn in_tier(mut self, tier: Tier) -> Self {
        self.tier = Some(tier);
        self
    }

    pub fn critical(mut self, critical: bool) -> Self {
        self.critical = critical;
        self
    }
}
