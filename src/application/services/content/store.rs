use std::collections::HashMap;

use tracing::{debug, info};

use super::parser::parse_source;
use super::{ContentError, ContentSource};
use crate::application::ports::outbound::RandomPort;
use crate::domain::entities::ContentEntry;
use crate::domain::value_objects::{MoveType, Team, Tier};

type ContentKey = (MoveType, Option<Team>, Option<Tier>, bool);

/// Immutable index of validated narrative entries
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    index: HashMap<ContentKey, Vec<ContentEntry>>,
    len: usize,
}

impl ContentStore {
    /// Parse and validate every source. Any schema violation fails the whole load.
    pub fn load(sources: &[ContentSource]) -> Result<Self, ContentError> {
        let mut entries = Vec::new();
        for source in sources {
            let parsed = parse_source(source)?;
            debug!(source = %source.name, entries = parsed.len(), "Parsed content source");
            entries.extend(parsed);
        }

        let store = Self::from_entries(entries);
        info!(sources = sources.len(), entries = store.len(), "Content store loaded");
        Ok(store)
    }

    pub fn from_entries(entries: impl IntoIterator<Item = ContentEntry>) -> Self {
        let mut index: HashMap<ContentKey, Vec<ContentEntry>> = HashMap::new();
        let mut len = 0;
        for entry in entries {
            let key = (entry.move_type, entry.team, entry.tier, entry.critical);
            index.entry(key).or_default().push(entry);
            len += 1;
        }
        Self { index, len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Every entry eligible for the given filter.
    ///
    /// Bribes ignore team, tier and critical. Defends ignore critical. Entries
    /// authored without a tier match every tier.
    pub fn candidates(
        &self,
        move_type: MoveType,
        team: Team,
        tier: Tier,
        critical: bool,
    ) -> Vec<&ContentEntry> {
        let keys: Vec<ContentKey> = match move_type {
            MoveType::Bribe => vec![(MoveType::Bribe, None, None, false)],
            _ => {
                let critical = critical && move_type.is_attack();
                vec![
                    (move_type, Some(team), Some(tier), critical),
                    (move_type, Some(team), None, critical),
                ]
            }
        };

        keys.iter()
            .filter_map(|key| self.index.get(key))
            .flatten()
            .collect()
    }

    /// A uniformly random entry matching the filter.
    pub fn get_random(
        &self,
        move_type: MoveType,
        team: Team,
        tier: Tier,
        critical: bool,
        random: &dyn RandomPort,
    ) -> Result<&ContentEntry, ContentError> {
        let candidates = self.candidates(move_type, team, tier, critical);
        if candidates.is_empty() {
            let scoped = move_type.is_team_scoped();
            return Err(ContentError::NoMatchingContent {
                move_type,
                team: scoped.then_some(team),
                tier: scoped.then_some(tier),
                critical: critical && move_type.is_attack(),
            });
        }

        let pick = random.pick(candidates.len()).min(candidates.len() - 1);
        Ok(candidates[pick])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::outbound::MockRandomPort;

    const ACTIONS_XML: &str = r#"
        <actions>
            <team name="Knight">
                <normal_attack is_critical="true">knight critical normal attack</normal_attack>
                <heavy_attack is_critical="true">knight critical heavy attack</heavy_attack>
                <normal_attack>knight normal attack</normal_attack>
                <heavy_attack>knight heavy attack</heavy_attack>
                <defend>knight defend</defend>
            </team>
            <team name="Viking">
                <tier level="1">
                    <normal_attack>viking tier one attack</normal_attack>
                    <defend>viking tier one defend</defend>
                </tier>
                <tier level="3">
                    <normal_attack>viking tier three attack</normal_attack>
                    <normal_attack is_critical="true">viking tier three critical</normal_attack>
                </tier>
                <heavy_attack>viking heavy attack</heavy_attack>
            </team>
            <bribe>bribe</bribe>
        </actions>
    "#;

    fn store() -> ContentStore {
        ContentStore::load(&[ContentSource::new("actions.xml", ACTIONS_XML)]).unwrap()
    }

    fn first_pick() -> MockRandomPort {
        let mut random = MockRandomPort::new();
        random.expect_pick().returning(|_| 0);
        random
    }

    #[test]
    fn test_get_random_from_correct_node() {
        let store = store();
        let random = first_pick();

        for (move_type, team, critical, expected) in [
            (MoveType::NormalAttack, Team::Knight, false, "knight normal attack"),
            (MoveType::HeavyAttack, Team::Knight, false, "knight heavy attack"),
            (MoveType::NormalAttack, Team::Knight, true, "knight critical normal attack"),
            (MoveType::HeavyAttack, Team::Knight, true, "knight critical heavy attack"),
            (MoveType::Defend, Team::Knight, false, "knight defend"),
            (MoveType::Bribe, Team::Viking, true, "bribe"),
        ] {
            let entry = store
                .get_random(move_type, team, Tier::TWO, critical, &random)
                .unwrap();
            assert_eq!(entry.text, expected);
        }
    }

    #[test]
    fn test_tiered_and_untiered_entries() {
        let store = store();

        let tier_one: Vec<_> = store
            .candidates(MoveType::NormalAttack, Team::Viking, Tier::ONE, false)
            .into_iter()
            .map(|e| e.text.as_str())
            .collect();
        assert_eq!(tier_one, vec!["viking tier one attack"]);

        let tier_three: Vec<_> = store
            .candidates(MoveType::NormalAttack, Team::Viking, Tier::THREE, false)
            .into_iter()
            .map(|e| e.text.as_str())
            .collect();
        assert_eq!(tier_three, vec!["viking tier three attack"]);

        // Untiered heavy attack is available at every tier
        for tier in [Tier::ONE, Tier::TWO, Tier::THREE] {
            assert_eq!(
                store.candidates(MoveType::HeavyAttack, Team::Viking, tier, false).len(),
                1
            );
        }
    }

    #[test]
    fn test_no_matching_content() {
        let store = store();
        let random = first_pick();

        let err = store
            .get_random(MoveType::Defend, Team::Viking, Tier::TWO, false, &random)
            .unwrap_err();
        assert_eq!(
            err,
            ContentError::NoMatchingContent {
                move_type: MoveType::Defend,
                team: Some(Team::Viking),
                tier: Some(Tier::TWO),
                critical: false,
            }
        );

        let empty = ContentStore::default();
        assert!(matches!(
            empty.get_random(MoveType::Bribe, Team::Knight, Tier::ONE, false, &random),
            Err(ContentError::NoMatchingContent { team: None, tier: None, .. })
        ));
    }

    #[test]
    fn test_never_returns_entry_outside_filter() {
        let store = store();

        for move_type in MoveType::ALL {
            for team in Team::ALL {
                for tier in [Tier::ONE, Tier::TWO, Tier::THREE] {
                    for critical in [false, true] {
                        for entry in store.candidates(move_type, team, tier, critical) {
                            assert_eq!(entry.move_type, move_type);
                            if move_type.is_team_scoped() {
                                assert_eq!(entry.team, Some(team));
                                assert!(entry.tier.map_or(true, |t| t == tier));
                            }
                            if move_type.is_attack() {
                                assert_eq!(entry.critical, critical);
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_every_entry_is_retrievable_by_its_own_attributes() {
        let store = store();
        assert_eq!(store.len(), 11);

        for entries in store.index.values() {
            for entry in entries {
                let team = entry.team.unwrap_or(Team::Knight);
                let tier = entry.tier.unwrap_or(Tier::ONE);
                assert!(store
                    .candidates(entry.move_type, team, tier, entry.critical)
                    .contains(&entry));
            }
        }
    }

    #[test]
    fn test_uniform_pick_uses_random_index() {
        let store = ContentStore::from_entries([
            ContentEntry::new(MoveType::Bribe, "first"),
            ContentEntry::new(MoveType::Bribe, "second"),
        ]);
        let mut random = MockRandomPort::new();
        random.expect_pick().withf(|len| *len == 2).returning(|_| 1);

        let entry = store
            .get_random(MoveType::Bribe, Team::Knight, Tier::ONE, false, &random)
            .unwrap();
        assert_eq!(entry.text, "second");
    }

    #[test]
    fn test_load_fails_on_any_invalid_source() {
        let err = ContentStore::load(&[
            ContentSource::new("good.xml", ACTIONS_XML),
            ContentSource::new("bad.xml", "<actions><defend>x</defend></actions>"),
        ])
        .unwrap_err();

        assert!(matches!(err, ContentError::Validation { ref source_name, .. } if source_name == "bad.xml"));
    }
}
