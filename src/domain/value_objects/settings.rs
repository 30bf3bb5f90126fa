//! War tuning value object
//!
//! Damage constants, defence tables and tier policy are passed explicitly into
//! each component so tests can run with their own numbers in parallel.

use serde::{Deserialize, Serialize};

/// All tunable constants of the war
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WarSettings {
    // Damage
    pub base_damage_normal_attack: f64,
    pub base_damage_heavy_attack: f64,
    pub critical_damage_multiplier: f64,
    pub critical_chance: f64,

    // Defence
    pub defend_duration_minutes: i64,
    /// Reduction contributed by one defender, indexed by `defend_level - 1`
    pub defend_level_multipliers: Vec<f64>,
    pub maximum_team_defence: f64,

    // Tiers
    pub averaging_period_days: u32,
    pub consider_only_successful_actions: bool,
    pub count_bribes_toward_tier: bool,
    pub max_idle_days_omitted: u32,
    pub tier_two_threshold: f64,
    pub tier_three_threshold: f64,

    // Validation
    pub description_limit: usize,
}

impl Default for WarSettings {
    fn default() -> Self {
        Self {
            base_damage_normal_attack: 10.0,
            base_damage_heavy_attack: 40.0,
            critical_damage_multiplier: 2.0,
            critical_chance: 0.2,
            defend_duration_minutes: 30,
            defend_level_multipliers: vec![0.05, 0.10, 0.15, 0.20, 0.25],
            maximum_team_defence: 0.75,
            averaging_period_days: 7,
            consider_only_successful_actions: false,
            count_bribes_toward_tier: false,
            max_idle_days_omitted: 2,
            tier_two_threshold: 3.0,
            tier_three_threshold: 7.0,
            description_limit: 30,
        }
    }
}

impl WarSettings {
    /// Load from environment variables, using defaults for missing values
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_damage_normal_attack: env_or("POMWARS_BASE_DAMAGE_NORMAL", defaults.base_damage_normal_attack),
            base_damage_heavy_attack: env_or("POMWARS_BASE_DAMAGE_HEAVY", defaults.base_damage_heavy_attack),
            critical_damage_multiplier: env_or("POMWARS_CRITICAL_MULTIPLIER", defaults.critical_damage_multiplier),
            critical_chance: env_or("POMWARS_CRITICAL_CHANCE", defaults.critical_chance),
            defend_duration_minutes: env_or("POMWARS_DEFEND_DURATION_MINUTES", defaults.defend_duration_minutes),
            defend_level_multipliers: std::env::var("POMWARS_DEFEND_LEVEL_MULTIPLIERS")
                .ok()
                .and_then(|v| parse_multipliers(&v))
                .unwrap_or(defaults.defend_level_multipliers),
            maximum_team_defence: env_or("POMWARS_MAXIMUM_TEAM_DEFENCE", defaults.maximum_team_defence),
            averaging_period_days: env_or("POMWARS_AVERAGING_PERIOD_DAYS", defaults.averaging_period_days),
            consider_only_successful_actions: env_or("POMWARS_ONLY_SUCCESSFUL_ACTIONS", defaults.consider_only_successful_actions),
            count_bribes_toward_tier: env_or("POMWARS_COUNT_BRIBES", defaults.count_bribes_toward_tier),
            max_idle_days_omitted: env_or("POMWARS_MAX_IDLE_DAYS_OMITTED", defaults.max_idle_days_omitted),
            tier_two_threshold: env_or("POMWARS_TIER_TWO_THRESHOLD", defaults.tier_two_threshold),
            tier_three_threshold: env_or("POMWARS_TIER_THREE_THRESHOLD", defaults.tier_three_threshold),
            description_limit: env_or("POMWARS_DESCRIPTION_LIMIT", defaults.description_limit),
        }
    }

    /// Reduction a single defender of `level` contributes to their team.
    ///
    /// Levels past the end of the table use its last entry; level 0 gives nothing.
    pub fn defend_multiplier(&self, level: u8) -> f64 {
        if level == 0 {
            return 0.0;
        }
        let idx = usize::from(level - 1).min(self.defend_level_multipliers.len().saturating_sub(1));
        self.defend_level_multipliers.get(idx).copied().unwrap_or(0.0)
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn parse_multipliers(value: &str) -> Option<Vec<f64>> {
    let parsed = value
        .split(',')
        .map(|part| part.trim().parse::<f64>().ok())
        .collect::<Option<Vec<_>>>()?;
    (!parsed.is_empty()).then_some(parsed)
}
