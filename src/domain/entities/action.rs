//! Action entity - One logged move in the war ledger
//!
//! Actions are append-only: created once per submitted move (failed moves and
//! bribes included), never mutated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{ActionId, MoveType, PlayerId, Team};

/// An action that has not been written to the ledger yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAction {
    pub player_id: PlayerId,
    pub team: Team,
    pub move_type: MoveType,
    pub succeeded: bool,
    /// Only attacks roll for criticals
    pub was_critical: Option<bool>,
    /// Only successful attacks deal damage
    pub damage: Option<f64>,
    /// Ledger stamps the current time when absent
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewAction {
    pub fn new(player_id: PlayerId, team: Team, move_type: MoveType) -> Self {
        Self {
            player_id,
            team,
            move_type,
            succeeded: false,
            was_critical: move_type.is_attack().then_some(false),
            damage: None,
            timestamp: None,
        }
    }

    pub fn succeeded(mut self) -> Self {
        self.succeeded = true;
        self
    }

    pub fn with_critical(mut self, was_critical: bool) -> Self {
        self.was_critical = Some(was_critical);
        self
    }

    pub fn with_damage(mut self, damage: f64) -> Self {
        self.damage = Some(damage);
        self
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Materialise the record once the ledger has assigned identity and time.
    pub fn into_action(self, id: ActionId, default_timestamp: DateTime<Utc>) -> Action {
        Action {
            id,
            player_id: self.player_id,
            team: self.team,
            move_type: self.move_type,
            succeeded: self.succeeded,
            was_critical: self.was_critical,
            damage: self.damage,
            timestamp: self.timestamp.unwrap_or(default_timestamp),
        }
    }
}

/// A recorded action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub id: ActionId,
    pub player_id: PlayerId,
    pub team: Team,
    pub move_type: MoveType,
    pub succeeded: bool,
    pub was_critical: Option<bool>,
    pub damage: Option<f64>,
    pub timestamp: DateTime<Utc>,
}
