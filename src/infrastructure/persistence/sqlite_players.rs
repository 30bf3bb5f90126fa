use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::sqlite_ledger::{decode_player_id, encode_player_id};
use crate::application::ports::outbound::{PlayerDirectoryError, PlayerDirectoryPort};
use crate::domain::entities::Player;
use crate::domain::value_objects::PlayerId;

pub struct SqlitePlayerDirectory {
    pool: SqlitePool,
}

impl SqlitePlayerDirectory {
    pub async fn new(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS players (
                id INTEGER PRIMARY KEY,
                defend_level INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }
}

fn decode_player(row: &SqliteRow) -> Result<Player, PlayerDirectoryError> {
    let db = |e: sqlx::Error| PlayerDirectoryError::Database(e.to_string());

    let level: i64 = row.try_get("defend_level").map_err(db)?;
    let created_at: String = row.try_get("created_at").map_err(db)?;

    Ok(Player {
        id: decode_player_id(row.try_get("id").map_err(db)?),
        defend_level: u8::try_from(level)
            .map_err(|_| PlayerDirectoryError::Database(format!("Invalid defend level {level}")))?,
        joined_at: DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| PlayerDirectoryError::Database(e.to_string()))?
            .with_timezone(&Utc),
    })
}

#[async_trait]
impl PlayerDirectoryPort for SqlitePlayerDirectory {
    async fn get(&self, id: PlayerId) -> Result<Option<Player>, PlayerDirectoryError> {
        let row = sqlx::query("SELECT id, defend_level, created_at FROM players WHERE id = ?")
            .bind(encode_player_id(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PlayerDirectoryError::Database(e.to_string()))?;

        row.as_ref().map(decode_player).transpose()
    }

    async fn get_many(&self, ids: &[PlayerId]) -> Result<Vec<Player>, PlayerDirectoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let id_list = serde_json::to_string(&ids.iter().map(|id| encode_player_id(*id)).collect::<Vec<_>>())
            .map_err(|e| PlayerDirectoryError::Database(e.to_string()))?;

        let rows = sqlx::query(
            r#"
            SELECT id, defend_level, created_at
            FROM players
            WHERE id IN (SELECT value FROM json_each(?))
            ORDER BY id
            "#,
        )
        .bind(id_list)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PlayerDirectoryError::Database(e.to_string()))?;

        rows.iter().map(decode_player).collect()
    }

    async fn save(&self, player: &Player) -> Result<(), PlayerDirectoryError> {
        sqlx::query("INSERT OR REPLACE INTO players (id, defend_level, created_at) VALUES (?, ?, ?)")
            .bind(encode_player_id(player.id))
            .bind(i64::from(player.defend_level))
            .bind(player.joined_at.to_rfc3339_opts(SecondsFormat::Nanos, true))
            .execute(&self.pool)
            .await
            .map_err(|e| PlayerDirectoryError::Database(e.to_string()))?;

        Ok(())
    }
}
