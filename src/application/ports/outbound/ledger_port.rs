//! Ledger port - append-only store of logged actions

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{Action, NewAction};
use crate::domain::value_objects::{MoveType, PlayerId, Team};

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Corrupt ledger record: {0}")]
    Corrupt(String),
}

/// Inclusive time range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}

/// Conjunctive filter over ledger records. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionFilter {
    pub team: Option<Team>,
    /// Empty matches every move type
    pub move_types: Vec<MoveType>,
    pub succeeded_only: bool,
    pub time_range: Option<TimeRange>,
    pub player_id: Option<PlayerId>,
}

impl ActionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn team(mut self, team: Team) -> Self {
        self.team = Some(team);
        self
    }

    pub fn move_type(mut self, move_type: MoveType) -> Self {
        self.move_types.push(move_type);
        self
    }

    pub fn move_types(mut self, move_types: impl IntoIterator<Item = MoveType>) -> Self {
        self.move_types.extend(move_types);
        self
    }

    pub fn succeeded_only(mut self) -> Self {
        self.succeeded_only = true;
        self
    }

    pub fn between(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.time_range = Some(TimeRange::new(start, end));
        self
    }

    pub fn player(mut self, player_id: PlayerId) -> Self {
        self.player_id = Some(player_id);
        self
    }

    pub fn matches(&self, action: &Action) -> bool {
        self.team.map_or(true, |team| action.team == team)
            && (self.move_types.is_empty() || self.move_types.contains(&action.move_type))
            && (!self.succeeded_only || action.succeeded)
            && self.time_range.map_or(true, |range| range.contains(action.timestamp))
            && self.player_id.map_or(true, |id| action.player_id == id)
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerPort: Send + Sync {
    /// Record an action, assigning its id and, when absent, its timestamp.
    async fn append(&self, action: NewAction) -> Result<Action, LedgerError>;

    /// Matching actions ordered by timestamp, oldest first.
    async fn query(&self, filter: ActionFilter) -> Result<Vec<Action>, LedgerError>;

    /// Administrative purge of every record. Returns the number removed.
    async fn purge(&self) -> Result<u64, LedgerError>;
}
