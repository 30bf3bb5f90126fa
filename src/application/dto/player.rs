use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::Player;
use crate::domain::value_objects::PlayerId;

/// Request to register a player
#[derive(Debug, Deserialize)]
pub struct RegisterPlayerRequestDto {
    pub id: PlayerId,
    #[serde(default)]
    pub defend_level: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerResponseDto {
    pub id: PlayerId,
    pub defend_level: u8,
    pub joined_at: DateTime<Utc>,
}

impl From<Player> for PlayerResponseDto {
    fn from(player: Player) -> Self {
        Self {
            id: player.id,
            defend_level: player.defend_level,
            joined_at: player.joined_at,
        }
    }
}
