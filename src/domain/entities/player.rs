use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::PlayerId;

/// A player who has joined the war
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    /// Upgrade level controlling how much a successful defend protects the team
    pub defend_level: u8,
    pub joined_at: DateTime<Utc>,
}

impl Player {
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            defend_level: 1,
            joined_at: Utc::now(),
        }
    }

    pub fn with_defend_level(mut self, defend_level: u8) -> Self {
        self.defend_level = defend_level;
        self
    }
}
