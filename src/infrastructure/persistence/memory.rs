//! In-memory adapters for the ledger and player directory
//!
//! Used when no database is configured and by scenario tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::application::ports::outbound::{
    ActionFilter, LedgerError, LedgerPort, PlayerDirectoryError, PlayerDirectoryPort,
};
use crate::domain::entities::{Action, NewAction, Player};
use crate::domain::value_objects::{ActionId, PlayerId};

#[derive(Default)]
pub struct InMemoryLedger {
    actions: RwLock<Vec<Action>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.actions.read().await.len()
    }

    pub async fn all(&self) -> Vec<Action> {
        self.actions.read().await.clone()
    }
}

#[async_trait]
impl LedgerPort for InMemoryLedger {
    async fn append(&self, action: NewAction) -> Result<Action, LedgerError> {
        let action = action.into_action(ActionId::new(), Utc::now());
        self.actions.write().await.push(action.clone());
        Ok(action)
    }

    async fn query(&self, filter: ActionFilter) -> Result<Vec<Action>, LedgerError> {
        let mut matched: Vec<Action> = self
            .actions
            .read()
            .await
            .iter()
            .filter(|action| filter.matches(action))
            .cloned()
            .collect();
        matched.sort_by_key(|action| action.timestamp);
        Ok(matched)
    }

    async fn purge(&self) -> Result<u64, LedgerError> {
        let mut actions = self.actions.write().await;
        let removed = actions.len() as u64;
        actions.clear();
        Ok(removed)
    }
}

#[derive(Default)]
pub struct InMemoryPlayerDirectory {
    players: RwLock<HashMap<PlayerId, Player>>,
}

impl InMemoryPlayerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_players(players: impl IntoIterator<Item = Player>) -> Self {
        Self {
            players: RwLock::new(players.into_iter().map(|p| (p.id, p)).collect()),
        }
    }
}

#[async_trait]
impl PlayerDirectoryPort for InMemoryPlayerDirectory {
    async fn get(&self, id: PlayerId) -> Result<Option<Player>, PlayerDirectoryError> {
        Ok(self.players.read().await.get(&id).cloned())
    }

    async fn get_many(&self, ids: &[PlayerId]) -> Result<Vec<Player>, PlayerDirectoryError> {
        let players = self.players.read().await;
        let mut found: Vec<Player> = ids.iter().filter_map(|id| players.get(id).cloned()).collect();
        found.sort_by_key(|p| p.id);
        found.dedup_by_key(|p| p.id);
        Ok(found)
    }

    async fn save(&self, player: &Player) -> Result<(), PlayerDirectoryError> {
        self.players.write().await.insert(player.id, player.clone());
        Ok(())
    }
}
