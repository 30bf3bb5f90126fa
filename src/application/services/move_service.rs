//! Move service - resolves a submitted move end to end
//!
//! A move is validated, rolled, given a story, damage is applied against the
//! opposing team's live defences, and the outcome is written to the ledger.
//! Nothing is persisted for a move that fails validation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use crate::application::dto::{MoveRequest, MoveResult};
use crate::application::ports::outbound::{
    ActionFilter, ClockPort, LedgerError, LedgerPort, PlayerDirectoryError, PlayerDirectoryPort,
    RandomPort,
};
use crate::application::services::content::{ContentError, ContentStore};
use crate::application::services::defense_service::{DefenseAggregator, DefenseError};
use crate::application::services::outcome_resolver::OutcomeResolver;
use crate::application::services::tier_service::{start_of_day, TierService};
use crate::domain::entities::{Action, NewAction, Player};
use crate::domain::services::narrative::{normalize_newlines, substitute, template_values, MISS_EMOTES};
use crate::domain::services::DamageCalculator;
use crate::domain::value_objects::{MoveType, PlayerId, Tier, WarSettings};

#[derive(Debug, thiserror::Error)]
pub enum MoveError {
    #[error("Unknown player: {0}")]
    UnknownPlayer(PlayerId),

    #[error("Description is {length} characters long, the limit is {limit}")]
    DescriptionTooLong { limit: usize, length: usize },

    #[error(transparent)]
    NoMatchingContent(ContentError),

    #[error(transparent)]
    ContentValidation(ContentError),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl From<ContentError> for MoveError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::NoMatchingContent { .. } => Self::NoMatchingContent(err),
            ContentError::Validation { .. } => Self::ContentValidation(err),
        }
    }
}

impl From<LedgerError> for MoveError {
    fn from(err: LedgerError) -> Self {
        Self::Persistence(err.to_string())
    }
}

impl From<PlayerDirectoryError> for MoveError {
    fn from(err: PlayerDirectoryError) -> Self {
        Self::Persistence(err.to_string())
    }
}

impl From<DefenseError> for MoveError {
    fn from(err: DefenseError) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Outbound adapters a move needs
#[derive(Clone)]
pub struct WarPorts {
    pub ledger: Arc<dyn LedgerPort>,
    pub players: Arc<dyn PlayerDirectoryPort>,
    pub clock: Arc<dyn ClockPort>,
    pub random: Arc<dyn RandomPort>,
}

pub struct MoveService {
    ledger: Arc<dyn LedgerPort>,
    players: Arc<dyn PlayerDirectoryPort>,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomPort>,
    content: Arc<ContentStore>,
    settings: Arc<WarSettings>,
    resolver: OutcomeResolver,
    tiers: TierService,
    defense: DefenseAggregator,
    damage: DamageCalculator,
    bot_name: String,
}

impl MoveService {
    pub fn new(ports: WarPorts, content: Arc<ContentStore>, settings: Arc<WarSettings>) -> Self {
        Self {
            resolver: OutcomeResolver::new(ports.random.clone()),
            tiers: TierService::new(ports.ledger.clone(), ports.clock.clone(), &settings),
            defense: DefenseAggregator::new(ports.ledger.clone(), ports.players.clone(), settings.clone()),
            damage: DamageCalculator::new(&settings),
            ledger: ports.ledger,
            players: ports.players,
            clock: ports.clock,
            random: ports.random,
            content,
            settings,
            bot_name: "Pombot".to_string(),
        }
    }

    /// Name substituted for `$BOTNAME` in bribe stories
    pub fn with_bot_name(mut self, bot_name: impl Into<String>) -> Self {
        self.bot_name = bot_name.into();
        self
    }

    pub fn tiers(&self) -> &TierService {
        &self.tiers
    }

    pub fn defense(&self) -> &DefenseAggregator {
        &self.defense
    }

    #[instrument(skip(self, request), fields(player_id = %request.player_id, team = %request.team, move_type = %request.move_type))]
    pub async fn resolve_move(&self, request: MoveRequest) -> Result<MoveResult, MoveError> {
        let player = self.validate(&request).await?;
        let now = self.clock.now();

        if request.move_type == MoveType::Bribe {
            return self.resolve_bribe(&request, now).await;
        }

        let action_count = self.todays_action_count(request.player_id, now).await?;
        if !self.resolver.is_successful(request.move_type, action_count) {
            return self.record_miss(&request, now).await;
        }

        let is_critical = request.move_type.is_attack() && self.damage.is_critical_roll(self.random.sample());
        let tier = self.tiers.tier_for(request.player_id).await?.tier;
        let narrative = self
            .select_story(&request, tier, is_critical, now)
            .await?;

        match request.move_type {
            MoveType::Defend => self.record_defend(&request, &player, tier, narrative, now).await,
            _ => self.record_attack(&request, tier, is_critical, narrative, now).await,
        }
    }

    async fn validate(&self, request: &MoveRequest) -> Result<Player, MoveError> {
        let length = request.description.chars().count();
        if length > self.settings.description_limit {
            return Err(MoveError::DescriptionTooLong {
                limit: self.settings.description_limit,
                length,
            });
        }

        self.players
            .get(request.player_id)
            .await?
            .ok_or(MoveError::UnknownPlayer(request.player_id))
    }

    /// Ordinal of the move being resolved among the player's moves today.
    /// Bribes are not moves for this purpose.
    async fn todays_action_count(&self, player_id: PlayerId, now: DateTime<Utc>) -> Result<u32, LedgerError> {
        let today = self
            .ledger
            .query(
                ActionFilter::new()
                    .player(player_id)
                    .move_types([MoveType::NormalAttack, MoveType::HeavyAttack, MoveType::Defend])
                    .between(start_of_day(now.date_naive()), now),
            )
            .await?;
        Ok(u32::try_from(today.len()).unwrap_or(u32::MAX).saturating_add(1))
    }

    /// Pick and normalise a story. When nothing matches the move still
    /// counts, so a failed action is written before the error is returned.
    async fn select_story(
        &self,
        request: &MoveRequest,
        tier: Tier,
        is_critical: bool,
        now: DateTime<Utc>,
    ) -> Result<String, MoveError> {
        match self
            .content
            .get_random(request.move_type, request.team, tier, is_critical, self.random.as_ref())
        {
            Ok(entry) => Ok(normalize_newlines(&entry.text)),
            Err(err) => {
                warn!(error = %err, "No content for successful move, recording it as failed");
                self.append(NewAction::new(request.player_id, request.team, request.move_type).at(now))
                    .await?;
                Err(err.into())
            }
        }
    }

    async fn record_miss(&self, request: &MoveRequest, now: DateTime<Utc>) -> Result<MoveResult, MoveError> {
        let action = self
            .append(NewAction::new(request.player_id, request.team, request.move_type).at(now))
            .await?;

        let emote = MISS_EMOTES[self.random.pick(MISS_EMOTES.len()).min(MISS_EMOTES.len() - 1)];
        let who = if request.identity.display_name.is_empty() {
            request.player_id.to_string()
        } else {
            request.identity.display_name.clone()
        };
        let narrative = match request.move_type {
            MoveType::Defend => format!("{who}'s defence failed! {emote}"),
            _ => format!("{who}'s attack missed! {emote}"),
        };

        Ok(MoveResult {
            action_id: action.id,
            move_type: action.move_type,
            team: action.team,
            succeeded: false,
            is_critical: action.was_critical,
            damage: None,
            tier: None,
            defense_contribution: None,
            narrative,
        })
    }

    async fn record_attack(
        &self,
        request: &MoveRequest,
        tier: Tier,
        is_critical: bool,
        narrative: String,
        now: DateTime<Utc>,
    ) -> Result<MoveResult, MoveError> {
        let pass_through = self
            .defense
            .defensive_multiplier(request.team.opponent(), now)
            .await?;
        let damage = self.damage.compute(request.move_type, is_critical, pass_through);

        let action = self
            .append(
                NewAction::new(request.player_id, request.team, request.move_type)
                    .succeeded()
                    .with_critical(is_critical)
                    .with_damage(damage)
                    .at(now),
            )
            .await?;

        info!(damage, is_critical, %tier, "Attack landed");
        Ok(MoveResult {
            action_id: action.id,
            move_type: action.move_type,
            team: action.team,
            succeeded: true,
            is_critical: Some(is_critical),
            damage: Some(damage),
            tier: Some(tier),
            defense_contribution: None,
            narrative,
        })
    }

    async fn record_defend(
        &self,
        request: &MoveRequest,
        player: &Player,
        tier: Tier,
        narrative: String,
        now: DateTime<Utc>,
    ) -> Result<MoveResult, MoveError> {
        let action = self
            .append(
                NewAction::new(request.player_id, request.team, MoveType::Defend)
                    .succeeded()
                    .at(now),
            )
            .await?;

        let contribution = self.settings.defend_multiplier(player.defend_level);
        info!(defend_level = player.defend_level, contribution, "Defend succeeded");
        Ok(MoveResult {
            action_id: action.id,
            move_type: action.move_type,
            team: action.team,
            succeeded: true,
            is_critical: None,
            damage: None,
            tier: Some(tier),
            defense_contribution: Some(contribution),
            narrative,
        })
    }

    async fn resolve_bribe(&self, request: &MoveRequest, now: DateTime<Utc>) -> Result<MoveResult, MoveError> {
        let narrative = self.select_story(request, Tier::ONE, false, now).await?;
        let narrative = substitute(&narrative, &template_values(&request.identity, &self.bot_name));

        let action = self
            .append(
                NewAction::new(request.player_id, request.team, MoveType::Bribe)
                    .succeeded()
                    .at(now),
            )
            .await?;

        Ok(MoveResult {
            action_id: action.id,
            move_type: action.move_type,
            team: action.team,
            succeeded: true,
            is_critical: None,
            damage: None,
            tier: None,
            defense_contribution: None,
            narrative,
        })
    }

    async fn append(&self, action: NewAction) -> Result<Action, LedgerError> {
        let action = self.ledger.append(action).await?;
        debug!(action_id = %action.id, succeeded = action.succeeded, "Action recorded");
        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::application::ports::outbound::{MockClockPort, MockLedgerPort, MockPlayerDirectoryPort};
    use crate::application::services::content::ContentSource;
    use crate::domain::value_objects::{PlayerIdentity, Team};
    use crate::infrastructure::persistence::{InMemoryLedger, InMemoryPlayerDirectory};

    const CONTENT: &str = r#"
        <actions>
            <team name="Knight">
                <normal_attack>The knights
charge.</normal_attack>
                <normal_attack is_critical="true">A knightly critical.</normal_attack>
                <heavy_attack>The knights bring the trebuchet.</heavy_attack>
                <heavy_attack critical="1">The trebuchet lands true.</heavy_attack>
                <defend>The knights raise their shields.</defend>
            </team>
            <team name="Viking">
                <normal_attack>The vikings charge.</normal_attack>
                <heavy_attack>The vikings swing axes.</heavy_attack>
            </team>
            <bribe>${DISPLAY_NAME} slips $BOTNAME a coin.</bribe>
        </actions>
    "#;

    /// Replays scripted samples, then repeats the last one
    struct ScriptedRandom {
        samples: Mutex<VecDeque<f64>>,
        last: f64,
    }

    impl ScriptedRandom {
        fn new(samples: &[f64]) -> Self {
            Self {
                samples: Mutex::new(samples.iter().copied().collect()),
                last: samples.last().copied().unwrap_or(0.5),
            }
        }
    }

    impl RandomPort for ScriptedRandom {
        fn sample(&self) -> f64 {
            self.samples.lock().unwrap().pop_front().unwrap_or(self.last)
        }

        fn pick(&self, _len: usize) -> usize {
            0
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    struct Harness {
        ledger: Arc<InMemoryLedger>,
        service: MoveService,
    }

    fn service(
        ledger: Arc<dyn LedgerPort>,
        players: Arc<dyn PlayerDirectoryPort>,
        samples: &[f64],
        content: &str,
    ) -> MoveService {
        let mut clock = MockClockPort::new();
        clock.expect_now().returning(now);

        let ports = WarPorts {
            ledger,
            players,
            clock: Arc::new(clock),
            random: Arc::new(ScriptedRandom::new(samples)),
        };
        let content = ContentStore::load(&[ContentSource::new("test.xml", content)]).unwrap();
        MoveService::new(ports, Arc::new(content), Arc::new(WarSettings::default())).with_bot_name("Pombot")
    }

    fn harness(samples: &[f64], players: Vec<Player>, content: &str) -> Harness {
        let ledger = Arc::new(InMemoryLedger::new());
        let directory = Arc::new(InMemoryPlayerDirectory::with_players(players));
        let service = service(ledger.clone(), directory, samples, content);

        Harness { ledger, service }
    }

    fn knight() -> Player {
        Player::new(PlayerId::new(1))
    }

    fn attack(heavy: bool) -> MoveRequest {
        MoveRequest::new(PlayerId::new(1), Team::Knight, MoveType::attack(heavy))
    }

    async fn seed(ledger: &InMemoryLedger, player: u64, team: Team, move_type: MoveType, at: DateTime<Utc>) {
        ledger
            .append(NewAction::new(PlayerId::new(player), team, move_type).succeeded().at(at))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_early_normal_attack_always_lands_with_team_content() {
        // Outcome roll would fail any curve below 1.0; critical roll misses
        let h = harness(&[0.99, 0.99], vec![knight()], CONTENT);
        seed(&h.ledger, 1, Team::Knight, MoveType::NormalAttack, now() - Duration::hours(2)).await;
        seed(&h.ledger, 1, Team::Knight, MoveType::NormalAttack, now() - Duration::hours(1)).await;

        let result = h.service.resolve_move(attack(false)).await.unwrap();

        assert!(result.succeeded);
        assert_eq!(result.is_critical, Some(false));
        assert_eq!(result.damage, Some(10.0));
        assert_eq!(result.narrative, "The knights charge.");

        let recorded = h.ledger.all().await;
        assert_eq!(recorded.len(), 3);
        let last = recorded.last().unwrap();
        assert!(last.succeeded);
        assert_eq!(last.team, Team::Knight);
        assert_eq!(last.damage, Some(10.0));
        assert_eq!(last.timestamp, now());
    }

    #[tokio::test]
    async fn test_critical_heavy_attack_against_defended_team() {
        let h = harness(&[0.0, 0.0], vec![knight(), Player::new(PlayerId::new(2)).with_defend_level(2)], CONTENT);
        seed(&h.ledger, 2, Team::Viking, MoveType::Defend, now() - Duration::minutes(10)).await;

        let result = h.service.resolve_move(attack(true)).await.unwrap();

        assert_eq!(result.is_critical, Some(true));
        assert_eq!(result.narrative, "The trebuchet lands true.");
        // 40 base, doubled, with 10% held back by the level-2 defender
        assert_eq!(result.damage, Some(80.0 * (1.0 - 0.10)));
    }

    #[tokio::test]
    async fn test_missed_attack_is_recorded_as_failure() {
        // Second heavy attack of the day needs a sample below 0.5
        let h = harness(&[0.7], vec![knight()], CONTENT);
        seed(&h.ledger, 1, Team::Knight, MoveType::HeavyAttack, now() - Duration::hours(1)).await;

        let request = attack(true).with_identity(PlayerIdentity::new("pom"));
        let result = h.service.resolve_move(request).await.unwrap();

        assert!(!result.succeeded);
        assert_eq!(result.damage, None);
        assert!(result.narrative.starts_with("pom's attack missed! "));
        assert!(MISS_EMOTES.iter().any(|emote| result.narrative.ends_with(emote)));

        let last = h.ledger.all().await.pop().unwrap();
        assert!(!last.succeeded);
        assert_eq!(last.was_critical, Some(false));
        assert_eq!(last.damage, None);
    }

    #[tokio::test]
    async fn test_defend_reports_contribution() {
        let h = harness(&[0.0], vec![knight().with_defend_level(3)], CONTENT);

        let request = MoveRequest::new(PlayerId::new(1), Team::Knight, MoveType::Defend);
        let result = h.service.resolve_move(request).await.unwrap();

        assert!(result.succeeded);
        assert_eq!(result.is_critical, None);
        assert_eq!(result.damage, None);
        assert_eq!(result.defense_contribution, Some(0.15));
        assert_eq!(result.narrative, "The knights raise their shields.");

        let pass_through = h
            .service
            .defense()
            .defensive_multiplier(Team::Knight, now())
            .await
            .unwrap();
        assert_eq!(pass_through, 1.0 - 0.15);
    }

    #[tokio::test]
    async fn test_bribe_twice_records_two_identical_stories() {
        let h = harness(&[0.99], vec![knight()], CONTENT);
        let identity = PlayerIdentity::new("pom").with_display_name("Pom Lover");
        let request = MoveRequest::new(PlayerId::new(1), Team::Knight, MoveType::Bribe).with_identity(identity);

        let first = h.service.resolve_move(request.clone()).await.unwrap();
        let second = h.service.resolve_move(request).await.unwrap();

        assert_eq!(first.narrative, "Pom Lover slips Pombot a coin.");
        assert_eq!(first.narrative, second.narrative);
        assert_ne!(first.action_id, second.action_id);
        assert!(first.succeeded && second.succeeded);
        assert_eq!(first.damage, None);

        let recorded = h.ledger.all().await;
        assert_eq!(recorded.len(), 2);
        assert!(recorded.iter().all(|a| a.move_type == MoveType::Bribe && a.was_critical.is_none()));
    }

    #[tokio::test]
    async fn test_unknown_player_persists_nothing() {
        let h = harness(&[0.0], Vec::new(), CONTENT);

        let err = h.service.resolve_move(attack(false)).await.unwrap_err();

        assert!(matches!(err, MoveError::UnknownPlayer(id) if id == PlayerId::new(1)));
        assert_eq!(h.ledger.len().await, 0);
    }

    #[tokio::test]
    async fn test_description_too_long_persists_nothing() {
        let h = harness(&[0.0], vec![knight()], CONTENT);

        let request = attack(false).with_description("é".repeat(31));
        let err = h.service.resolve_move(request).await.unwrap_err();
        assert!(matches!(err, MoveError::DescriptionTooLong { limit: 30, length: 31 }));
        assert_eq!(h.ledger.len().await, 0);

        let at_limit = attack(false).with_description("é".repeat(30));
        assert!(h.service.resolve_move(at_limit).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_content_records_failed_action() {
        let content = r#"<actions><team name="Knight"><normal_attack>only normal</normal_attack></team></actions>"#;
        let h = harness(&[0.0], vec![knight()], content);

        let request = MoveRequest::new(PlayerId::new(1), Team::Knight, MoveType::Defend);
        let err = h.service.resolve_move(request).await.unwrap_err();

        assert!(matches!(err, MoveError::NoMatchingContent(_)));
        let recorded = h.ledger.all().await;
        assert_eq!(recorded.len(), 1);
        assert!(!recorded[0].succeeded);
        assert_eq!(recorded[0].damage, None);
    }

    #[tokio::test]
    async fn test_bribes_do_not_count_toward_daily_moves() {
        // Three bribes then a second heavy attack: ordinal stays 1, so it lands
        let h = harness(&[0.99, 0.99], vec![knight()], CONTENT);
        for _ in 0..3 {
            seed(&h.ledger, 1, Team::Knight, MoveType::Bribe, now() - Duration::minutes(5)).await;
        }

        let result = h.service.resolve_move(attack(true)).await.unwrap();
        assert!(result.succeeded);
    }

    #[tokio::test]
    async fn test_ledger_failure_surfaces_without_retry() {
        let mut ledger = MockLedgerPort::new();
        ledger
            .expect_append()
            .times(1)
            .returning(|_| Err(LedgerError::Database("disk full".to_string())));
        let directory = Arc::new(InMemoryPlayerDirectory::with_players(vec![knight()]));
        let service = service(Arc::new(ledger), directory, &[0.0], CONTENT);

        let request = MoveRequest::new(PlayerId::new(1), Team::Knight, MoveType::Bribe);
        let err = service.resolve_move(request).await.unwrap_err();

        assert!(matches!(err, MoveError::Persistence(ref message) if message.contains("disk full")));
    }

    #[tokio::test]
    async fn test_player_directory_failure_surfaces_as_persistence() {
        let mut ledger = MockLedgerPort::new();
        ledger.expect_append().never();
        ledger.expect_query().never();
        let mut directory = MockPlayerDirectoryPort::new();
        directory
            .expect_get()
            .times(1)
            .returning(|_| Err(PlayerDirectoryError::Database("locked".to_string())));
        let service = service(Arc::new(ledger), Arc::new(directory), &[0.0], CONTENT);

        let err = service.resolve_move(attack(false)).await.unwrap_err();

        assert!(matches!(err, MoveError::Persistence(ref message) if message.contains("locked")));
    }
}
