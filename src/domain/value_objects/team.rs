//! The two opposing sides of a war

use std::fmt;
use std::ops::Not;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A team in the war. Every player fights for exactly one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Knight,
    Viking,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::Knight, Team::Viking];

    /// The team on the other side of the battlefield.
    pub fn opponent(self) -> Self {
        match self {
            Team::Knight => Team::Viking,
            Team::Viking => Team::Knight,
        }
    }

    /// Name as authored in content files and stored in the ledger.
    pub fn as_str(&self) -> &'static str {
        match self {
            Team::Knight => "Knight",
            Team::Viking => "Viking",
        }
    }
}

impl Not for Team {
    type Output = Team;

    fn not(self) -> Self::Output {
        self.opponent()
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown team: {0}")]
pub struct UnknownTeam(pub String);

impl FromStr for Team {
    type Err = UnknownTeam;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().trim_end_matches('s') {
            "knight" => Ok(Team::Knight),
            "viking" => Ok(Team::Viking),
            _ => Err(UnknownTeam(s.to_string())),
        }
    }
}
