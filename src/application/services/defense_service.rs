//! Defense aggregation - how much of an attack still lands on a team

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::application::ports::outbound::{
    ActionFilter, LedgerError, LedgerPort, PlayerDirectoryError, PlayerDirectoryPort,
};
use crate::domain::value_objects::{MoveType, PlayerId, Team, WarSettings};

#[derive(Debug, thiserror::Error)]
pub enum DefenseError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Players(#[from] PlayerDirectoryError),
}

/// Active defences of one team at a point in time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamDefense {
    pub team: Team,
    pub defenders: Vec<PlayerId>,
    /// Summed reduction after clamping to the team ceiling
    pub reduction: f64,
    /// Fraction of incoming damage that still lands
    pub pass_through: f64,
}

pub struct DefenseAggregator {
    ledger: Arc<dyn LedgerPort>,
    players: Arc<dyn PlayerDirectoryPort>,
    settings: Arc<WarSettings>,
}

impl DefenseAggregator {
    pub fn new(
        ledger: Arc<dyn LedgerPort>,
        players: Arc<dyn PlayerDirectoryPort>,
        settings: Arc<WarSettings>,
    ) -> Self {
        Self {
            ledger,
            players,
            settings,
        }
    }

    /// Pass-through multiplier in `[0, 1]` for damage dealt to `team` at `at`.
    pub async fn defensive_multiplier(&self, team: Team, at: DateTime<Utc>) -> Result<f64, DefenseError> {
        Ok(self.active_defense(team, at).await?.pass_through)
    }

    #[instrument(skip(self))]
    pub async fn active_defense(&self, team: Team, at: DateTime<Utc>) -> Result<TeamDefense, DefenseError> {
        let window_start = at - Duration::minutes(self.settings.defend_duration_minutes);
        let defends = self
            .ledger
            .query(
                ActionFilter::new()
                    .team(team)
                    .move_type(MoveType::Defend)
                    .succeeded_only()
                    .between(window_start, at),
            )
            .await?;

        let defender_ids: Vec<PlayerId> = defends
            .iter()
            .map(|action| action.player_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let defenders = if defender_ids.is_empty() {
            Vec::new()
        } else {
            self.players.get_many(&defender_ids).await?
        };

        if defenders.len() < defender_ids.len() {
            warn!(
                team = %team,
                expected = defender_ids.len(),
                found = defenders.len(),
                "Some defenders are missing from the player directory"
            );
        }

        let total: f64 = defenders
            .iter()
            .map(|defender| self.settings.defend_multiplier(defender.defend_level))
            .sum();
        let reduction = total.clamp(0.0, self.settings.maximum_team_defence.clamp(0.0, 1.0));
        let pass_through = 1.0 - reduction;

        debug!(team = %team, defenders = defender_ids.len(), reduction, pass_through, "Aggregated team defense");

        Ok(TeamDefense {
            team,
            defenders: defender_ids,
            reduction,
            pass_through,
        })
    }
}
