//! Maps average daily activity to an engagement tier

use crate::domain::value_objects::{Tier, WarSettings};

/// Pure three-bucket classifier. Boundary values belong to the lower tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierClassifier {
    tier_two_threshold: f64,
    tier_three_threshold: f64,
}

impl Default for TierClassifier {
    fn default() -> Self {
        Self::new(3.0, 7.0)
    }
}

impl TierClassifier {
    pub fn new(tier_two_threshold: f64, tier_three_threshold: f64) -> Self {
        Self {
            tier_two_threshold,
            tier_three_threshold,
        }
    }

    pub fn from_settings(settings: &WarSettings) -> Self {
        Self::new(settings.tier_two_threshold, settings.tier_three_threshold)
    }

    pub fn classify(&self, average_daily_actions: f64) -> Tier {
        if average_daily_actions <= self.tier_two_threshold {
            Tier::ONE
        } else if average_daily_actions <= self.tier_three_threshold {
            Tier::TWO
        } else {
            Tier::THREE
        }
    }
}
