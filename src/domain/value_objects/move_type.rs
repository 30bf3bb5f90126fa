//! Game moves a logged action can be played as

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveType {
    NormalAttack,
    HeavyAttack,
    Defend,
    Bribe,
}

impl MoveType {
    pub const ALL: [MoveType; 4] = [
        MoveType::NormalAttack,
        MoveType::HeavyAttack,
        MoveType::Defend,
        MoveType::Bribe,
    ];

    pub fn attack(is_heavy: bool) -> Self {
        if is_heavy {
            MoveType::HeavyAttack
        } else {
            MoveType::NormalAttack
        }
    }

    pub fn is_attack(&self) -> bool {
        matches!(self, MoveType::NormalAttack | MoveType::HeavyAttack)
    }

    /// Bribes are the only moves scoped to neither a team nor a tier.
    pub fn is_team_scoped(&self) -> bool {
        !matches!(self, MoveType::Bribe)
    }

    /// Persisted name, also the element name in content files.
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveType::NormalAttack => "normal_attack",
            MoveType::HeavyAttack => "heavy_attack",
            MoveType::Defend => "defend",
            MoveType::Bribe => "bribe",
        }
    }
}

impl fmt::Display for MoveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown move type: {0}")]
pub struct UnknownMoveType(pub String);

impl FromStr for MoveType {
    type Err = UnknownMoveType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MoveType::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownMoveType(s.to_string()))
    }
}
