use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Team;

/// Running totals for one team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamScore {
    pub team: Team,
    pub damage_dealt: f64,
    pub successful_attacks: u32,
    pub critical_hits: u32,
    pub successful_defends: u32,
    pub bribes: u32,
    pub failed_moves: u32,
}

impl TeamScore {
    pub fn new(team: Team) -> Self {
        Self {
            team,
            damage_dealt: 0.0,
            successful_attacks: 0,
            critical_hits: 0,
            successful_defends: 0,
            bribes: 0,
            failed_moves: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub teams: Vec<TeamScore>,
    /// Team with the most damage dealt, absent on a tie
    pub leader: Option<Team>,
}
