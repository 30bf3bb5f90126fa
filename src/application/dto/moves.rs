use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{ActionId, MoveType, PlayerId, PlayerIdentity, Team, Tier};

/// A move submitted by a player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub player_id: PlayerId,
    pub team: Team,
    pub move_type: MoveType,
    /// Free-form description of the work done; validated, never stored
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub identity: PlayerIdentity,
}

impl MoveRequest {
    pub fn new(player_id: PlayerId, team: Team, move_type: MoveType) -> Self {
        Self {
            player_id,
            team,
            move_type,
            description: String::new(),
            identity: PlayerIdentity::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_identity(mut self, identity: PlayerIdentity) -> Self {
        self.identity = identity;
        self
    }
}

/// What happened when a move was resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveResult {
    pub action_id: ActionId,
    pub move_type: MoveType,
    pub team: Team,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_critical: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub damage: Option<f64>,
    /// Tier the content was selected from; absent for misses and bribes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<Tier>,
    /// Reduction this defender adds to their team's defence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defense_contribution: Option<f64>,
    pub narrative: String,
}
