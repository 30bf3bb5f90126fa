//! Scoreboard - team totals derived from the ledger

use std::sync::Arc;

use tracing::instrument;

use crate::application::dto::{Scoreboard, TeamScore};
use crate::application::ports::outbound::{ActionFilter, LedgerError, LedgerPort};
use crate::domain::entities::Action;
use crate::domain::value_objects::{MoveType, Team};

pub struct ScoreboardService {
    ledger: Arc<dyn LedgerPort>,
}

impl ScoreboardService {
    pub fn new(ledger: Arc<dyn LedgerPort>) -> Self {
        Self { ledger }
    }

    #[instrument(skip(self))]
    pub async fn scoreboard(&self) -> Result<Scoreboard, LedgerError> {
        let actions = self.ledger.query(ActionFilter::new()).await?;
        Ok(tally(&actions))
    }
}

fn tally(actions: &[Action]) -> Scoreboard {
    let mut teams: Vec<TeamScore> = Team::ALL.iter().map(|&team| TeamScore::new(team)).collect();

    for action in actions {
        let Some(score) = teams.iter_mut().find(|s| s.team == action.team) else {
            continue;
        };
        match (action.move_type, action.succeeded) {
            (MoveType::Bribe, _) => score.bribes += 1,
            (_, false) => score.failed_moves += 1,
            (MoveType::Defend, true) => score.successful_defends += 1,
            (MoveType::NormalAttack | MoveType::HeavyAttack, true) => {
                score.successful_attacks += 1;
                score.damage_dealt += action.damage.unwrap_or(0.0);
                if action.was_critical == Some(true) {
                    score.critical_hits += 1;
                }
            }
        }
    }

    let leader = match (teams.first(), teams.last()) {
        (Some(a), Some(b)) if a.damage_dealt > b.damage_dealt => Some(a.team),
        (Some(a), Some(b)) if b.damage_dealt > a.damage_dealt => Some(b.team),
        _ => None,
    };

    Scoreboard { teams, leader }
}
