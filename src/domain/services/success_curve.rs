//! Success probability curves
//!
//! Each curve maps the player's action number for the current day to the
//! probability that the move lands. Later moves in a day are less likely to
//! succeed.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::MoveType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SuccessCurve {
    /// Certain for the first five moves, then a parabola, then a bell-shaped decay.
    Sustained,
    /// `1/x`. Placeholder curve for heavy attacks and defends.
    Reciprocal,
    Certain,
}

impl SuccessCurve {
    pub fn for_move(move_type: MoveType) -> Self {
        match move_type {
            MoveType::NormalAttack => SuccessCurve::Sustained,
            MoveType::HeavyAttack | MoveType::Defend => SuccessCurve::Reciprocal,
            MoveType::Bribe => SuccessCurve::Certain,
        }
    }

    pub fn probability(&self, action_count: u32) -> f64 {
        match self {
            SuccessCurve::Sustained => sustained(action_count),
            SuccessCurve::Reciprocal => 1.0 / f64::from(action_count.max(1)),
            SuccessCurve::Certain => 1.0,
        }
    }
}

fn sustained(action_count: u32) -> f64 {
    let x = f64::from(action_count);
    match action_count {
        0..=5 => 1.0,
        6..=10 => -0.016 * x.powi(2) + 0.16 * x + 0.6,
        _ => gaussian(x) / gaussian(9.0),
    }
}

fn gaussian(x: f64) -> f64 {
    (-(x - 9.0).powi(2) / 2.0).exp() / (2.0 * PI).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_first_five_normal_attacks_are_certain() {
        for count in 0..=5 {
            assert_eq!(SuccessCurve::Sustained.probability(count), 1.0);
        }
    }

    #[test]
    fn test_parabola_section() {
        // -0.016 * 36 + 0.96 + 0.6
        assert!((SuccessCurve::Sustained.probability(6) - 0.984).abs() < EPSILON);
        assert!((SuccessCurve::Sustained.probability(10) - 0.6).abs() < EPSILON);
    }

    #[test]
    fn test_decay_section() {
        let eleven = SuccessCurve::Sustained.probability(11);
        assert!((eleven - (-2.0f64).exp()).abs() < EPSILON);
        assert!(SuccessCurve::Sustained.probability(20) < eleven);
        assert!(SuccessCurve::Sustained.probability(500) >= 0.0);
    }

    #[test]
    fn test_reciprocal() {
        assert_eq!(SuccessCurve::Reciprocal.probability(0), 1.0);
        assert_eq!(SuccessCurve::Reciprocal.probability(1), 1.0);
        assert_eq!(SuccessCurve::Reciprocal.probability(4), 0.25);
    }

    #[test]
    fn test_curve_per_move() {
        assert_eq!(SuccessCurve::for_move(MoveType::NormalAttack), SuccessCurve::Sustained);
        assert_eq!(SuccessCurve::for_move(MoveType::HeavyAttack), SuccessCurve::Reciprocal);
        assert_eq!(SuccessCurve::for_move(MoveType::Defend), SuccessCurve::Reciprocal);
        assert_eq!(SuccessCurve::for_move(MoveType::Bribe), SuccessCurve::Certain);
    }
}
