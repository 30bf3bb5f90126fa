//! Tier service - averages a player's recent activity and classifies it
//!
//! What counts as activity is policy, not arithmetic: bribes can be excluded,
//! failed moves can be excluded, and a few idle days can be dropped from the
//! denominator so players on different schedules compare fairly.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::ports::outbound::{ActionFilter, ClockPort, LedgerError, LedgerPort};
use crate::domain::services::TierClassifier;
use crate::domain::value_objects::{MoveType, PlayerId, Tier, WarSettings};

/// A player's activity rate and the tier it maps to
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerTier {
    pub player_id: PlayerId,
    pub average_daily_actions: f64,
    pub tier: Tier,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct AveragingPolicy {
    window_days: u32,
    only_successful: bool,
    count_bribes: bool,
    max_idle_days_omitted: u32,
}

pub struct TierService {
    ledger: Arc<dyn LedgerPort>,
    clock: Arc<dyn ClockPort>,
    classifier: TierClassifier,
    policy: AveragingPolicy,
}

impl TierService {
    pub fn new(ledger: Arc<dyn LedgerPort>, clock: Arc<dyn ClockPort>, settings: &WarSettings) -> Self {
        Self {
            ledger,
            clock,
            classifier: TierClassifier::from_settings(settings),
            policy: AveragingPolicy {
                window_days: settings.averaging_period_days,
                only_successful: settings.consider_only_successful_actions,
                count_bribes: settings.count_bribes_toward_tier,
                max_idle_days_omitted: settings.max_idle_days_omitted,
            },
        }
    }

    pub fn classifier(&self) -> &TierClassifier {
        &self.classifier
    }

    /// Average daily moves over the configured trailing window.
    pub async fn average_daily_actions(&self, player_id: PlayerId) -> Result<f64, LedgerError> {
        self.average_over(player_id, self.policy.window_days).await
    }

    /// Average daily moves over the `window_days` UTC days ending today.
    #[instrument(skip(self))]
    pub async fn average_over(&self, player_id: PlayerId, window_days: u32) -> Result<f64, LedgerError> {
        let window_days = window_days.max(1);
        let now = self.clock.now();
        let today = now.date_naive();
        let first_day = today - Duration::days(i64::from(window_days - 1));

        let mut filter = ActionFilter::new()
            .player(player_id)
            .between(start_of_day(first_day), now);
        if !self.policy.count_bribes {
            filter = filter.move_types([MoveType::NormalAttack, MoveType::HeavyAttack, MoveType::Defend]);
        }
        if self.policy.only_successful {
            filter = filter.succeeded_only();
        }

        let actions = self.ledger.query(filter).await?;

        let mut per_day: HashMap<NaiveDate, u32> = HashMap::new();
        for action in &actions {
            *per_day.entry(action.timestamp.date_naive()).or_default() += 1;
        }

        let active_days = u32::try_from(per_day.len()).unwrap_or(window_days).min(window_days);
        let idle_days = window_days - active_days;
        let omitted = idle_days.min(self.policy.max_idle_days_omitted);
        let denominator = (window_days - omitted).max(1);

        let average = actions.len() as f64 / f64::from(denominator);
        debug!(
            player_id = %player_id,
            actions = actions.len(),
            window_days,
            omitted,
            average,
            "Computed average daily actions"
        );
        Ok(average)
    }

    pub async fn tier_for(&self, player_id: PlayerId) -> Result<PlayerTier, LedgerError> {
        let average_daily_actions = self.average_daily_actions(player_id).await?;
        Ok(PlayerTier {
            player_id,
            average_daily_actions,
            tier: self.classifier.classify(average_daily_actions),
        })
    }
}

pub(crate) fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::outbound::{MockClockPort, MockLedgerPort};
    use crate::domain::entities::{Action, NewAction};
    use crate::domain::value_objects::{ActionId, Team};

    fn noon(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, day, 12, 0, 0).unwrap()
    }

    fn action(day: u32, move_type: MoveType) -> Action {
        NewAction::new(PlayerId::new(1), Team::Knight, move_type)
            .at(noon(day))
            .into_action(ActionId::new(), noon(day))
    }

    fn clock_at(now: DateTime<Utc>) -> Arc<MockClockPort> {
        let mut clock = MockClockPort::new();
        clock.expect_now().returning(move || now);
        Arc::new(clock)
    }

    fn service(actions: Vec<Action>, settings: WarSettings) -> TierService {
        let mut ledger = MockLedgerPort::new();
        ledger
            .expect_query()
            .returning(move |filter| Ok(actions.iter().filter(|a| filter.matches(a)).cloned().collect()));
        TierService::new(Arc::new(ledger), clock_at(noon(10)), &settings)
    }

    #[tokio::test]
    async fn test_average_over_full_window() {
        let settings = WarSettings {
            averaging_period_days: 4,
            max_idle_days_omitted: 0,
            ..WarSettings::default()
        };
        // Day 6 falls outside the 4-day window ending on the 10th
        let actions = vec![
            action(6, MoveType::NormalAttack),
            action(7, MoveType::NormalAttack),
            action(8, MoveType::Defend),
            action(10, MoveType::HeavyAttack),
            action(10, MoveType::NormalAttack),
        ];

        let average = service(actions, settings)
            .average_daily_actions(PlayerId::new(1))
            .await
            .unwrap();
        assert_eq!(average, 1.0);
    }

    #[tokio::test]
    async fn test_idle_days_are_omitted_up_to_limit() {
        let settings = WarSettings {
            averaging_period_days: 4,
            max_idle_days_omitted: 2,
            ..WarSettings::default()
        };
        // Only one active day: three idle days, two of which are dropped
        let actions = vec![action(10, MoveType::NormalAttack), action(10, MoveType::NormalAttack)];

        let average = service(actions, settings)
            .average_daily_actions(PlayerId::new(1))
            .await
            .unwrap();
        assert_eq!(average, 1.0);
    }

    #[tokio::test]
    async fn test_bribes_excluded_by_default() {
        let settings = WarSettings {
            averaging_period_days: 1,
            ..WarSettings::default()
        };
        let actions = vec![
            action(10, MoveType::Bribe),
            action(10, MoveType::Bribe),
            action(10, MoveType::Defend),
        ];

        let tier = service(actions.clone(), settings.clone())
            .tier_for(PlayerId::new(1))
            .await
            .unwrap();
        assert_eq!(tier.average_daily_actions, 1.0);
        assert_eq!(tier.tier, Tier::ONE);

        let counting = WarSettings {
            count_bribes_toward_tier: true,
            ..settings
        };
        let average = service(actions, counting)
            .average_daily_actions(PlayerId::new(1))
            .await
            .unwrap();
        assert_eq!(average, 3.0);
    }

    #[tokio::test]
    async fn test_only_successful_policy() {
        let settings = WarSettings {
            averaging_period_days: 1,
            consider_only_successful_actions: true,
            ..WarSettings::default()
        };
        let mut succeeded = action(10, MoveType::NormalAttack);
        succeeded.succeeded = true;
        let actions = vec![succeeded, action(10, MoveType::NormalAttack)];

        let average = service(actions, settings)
            .average_daily_actions(PlayerId::new(1))
            .await
            .unwrap();
        assert_eq!(average, 1.0);
    }

    #[tokio::test]
    async fn test_heavy_user_reaches_tier_three() {
        let settings = WarSettings {
            averaging_period_days: 1,
            ..WarSettings::default()
        };
        let actions = (0..8).map(|_| action(10, MoveType::NormalAttack)).collect();

        let tier = service(actions, settings).tier_for(PlayerId::new(1)).await.unwrap();
        assert_eq!(tier.tier, Tier::THREE);
    }
}
