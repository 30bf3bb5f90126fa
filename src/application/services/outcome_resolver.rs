//! Outcome resolver - decides whether a move lands

use std::sync::Arc;

use dashmap::DashMap;
use tracing::trace;

use crate::application::ports::outbound::RandomPort;
use crate::domain::services::SuccessCurve;
use crate::domain::value_objects::MoveType;

/// Rolls moves against their success curve.
///
/// Probabilities are memoised per resolver instance; build a fresh resolver
/// when the curve inputs should no longer be shared.
pub struct OutcomeResolver {
    random: Arc<dyn RandomPort>,
    probabilities: DashMap<(SuccessCurve, u32), f64>,
}

impl OutcomeResolver {
    pub fn new(random: Arc<dyn RandomPort>) -> Self {
        Self {
            random,
            probabilities: DashMap::new(),
        }
    }

    pub fn success_probability(&self, move_type: MoveType, action_count: u32) -> f64 {
        let curve = SuccessCurve::for_move(move_type);
        *self
            .probabilities
            .entry((curve, action_count))
            .or_insert_with(|| curve.probability(action_count))
    }

    /// `action_count` is the move's ordinal among the player's moves today.
    pub fn is_successful(&self, move_type: MoveType, action_count: u32) -> bool {
        if move_type == MoveType::Bribe {
            return true;
        }

        let probability = self.success_probability(move_type, action_count);
        let sample = self.random.sample();
        trace!(%move_type, action_count, probability, sample, "Rolled move outcome");
        sample < probability
    }
}
