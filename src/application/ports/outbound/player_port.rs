use async_trait::async_trait;

use crate::domain::entities::Player;
use crate::domain::value_objects::PlayerId;

#[derive(Debug, thiserror::Error)]
pub enum PlayerDirectoryError {
    #[error("Database error: {0}")]
    Database(String),
}

/// Players who have joined the war
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlayerDirectoryPort: Send + Sync {
    async fn get(&self, id: PlayerId) -> Result<Option<Player>, PlayerDirectoryError>;

    /// Players for the given ids; unknown ids are skipped, duplicates collapse.
    async fn get_many(&self, ids: &[PlayerId]) -> Result<Vec<Player>, PlayerDirectoryError>;

    /// Insert or replace a player
    async fn save(&self, player: &Player) -> Result<(), PlayerDirectoryError>;
}
