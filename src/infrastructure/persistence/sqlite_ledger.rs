use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::application::ports::outbound::{ActionFilter, LedgerError, LedgerPort};
use crate::domain::entities::{Action, NewAction};
use crate::domain::value_objects::{ActionId, PlayerId};

/// Append-only action ledger in an `actions` table
pub struct SqliteLedger {
    pool: SqlitePool,
}

impl SqliteLedger {
    pub async fn new(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS actions (
                id TEXT PRIMARY KEY,
                player_id INTEGER NOT NULL,
                team TEXT NOT NULL,
                move_type TEXT NOT NULL,
                succeeded INTEGER NOT NULL,
                was_critical INTEGER,
                damage REAL,
                timestamp TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_actions_timestamp ON actions (timestamp)")
            .execute(&pool)
            .await?;

        Ok(Self { pool })
    }
}

/// Fixed-width RFC 3339 so text comparison orders like time
fn encode_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Chat platform ids fill the whole u64 range; SQLite stores them bit-for-bit as i64.
pub(super) fn encode_player_id(id: PlayerId) -> i64 {
    id.value() as i64
}

pub(super) fn decode_player_id(raw: i64) -> PlayerId {
    PlayerId::new(raw as u64)
}

fn corrupt(e: impl std::fmt::Display) -> LedgerError {
    LedgerError::Corrupt(e.to_string())
}

fn get_err(e: sqlx::Error) -> LedgerError {
    LedgerError::Database(e.to_string())
}

fn decode_action(row: &SqliteRow) -> Result<Action, LedgerError> {
    let id: String = row.try_get("id").map_err(get_err)?;
    let team: String = row.try_get("team").map_err(get_err)?;
    let move_type: String = row.try_get("move_type").map_err(get_err)?;
    let timestamp: String = row.try_get("timestamp").map_err(get_err)?;

    Ok(Action {
        id: ActionId::from_uuid(Uuid::parse_str(&id).map_err(corrupt)?),
        player_id: decode_player_id(row.try_get("player_id").map_err(get_err)?),
        team: team.parse().map_err(corrupt)?,
        move_type: move_type.parse().map_err(corrupt)?,
        succeeded: row.try_get("succeeded").map_err(get_err)?,
        was_critical: row.try_get("was_critical").map_err(get_err)?,
        damage: row.try_get("damage").map_err(get_err)?,
        timestamp: DateTime::parse_from_rfc3339(&timestamp)
            .map_err(corrupt)?
            .with_timezone(&Utc),
    })
}

#[async_trait]
impl LedgerPort for SqliteLedger {
    async fn append(&self, action: NewAction) -> Result<Action, LedgerError> {
        let action = action.into_action(ActionId::new(), Utc::now());

        sqlx::query(
            r#"
            INSERT INTO actions (id, player_id, team, move_type, succeeded, was_critical, damage, timestamp)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(action.id.to_string())
        .bind(encode_player_id(action.player_id))
        .bind(action.team.as_str())
        .bind(action.move_type.as_str())
        .bind(action.succeeded)
        .bind(action.was_critical)
        .bind(action.damage)
        .bind(encode_timestamp(action.timestamp))
        .execute(&self.pool)
        .await
        .map_err(|e| LedgerError::Database(e.to_string()))?;

        Ok(action)
    }

    async fn query(&self, filter: ActionFilter) -> Result<Vec<Action>, LedgerError> {
        // Move types travel as a comma-delimited list: ",defend,bribe,"
        let move_types = (!filter.move_types.is_empty()).then(|| {
            let names: Vec<&str> = filter.move_types.iter().map(|m| m.as_str()).collect();
            format!(",{},", names.join(","))
        });

        let rows = sqlx::query(
            r#"
            SELECT id, player_id, team, move_type, succeeded, was_critical, damage, timestamp
            FROM actions
            WHERE (?1 IS NULL OR team = ?1)
              AND (?2 IS NULL OR instr(?2, ',' || move_type || ',') > 0)
              AND (?3 = 0 OR succeeded = 1)
              AND (?4 IS NULL OR timestamp >= ?4)
              AND (?5 IS NULL OR timestamp <= ?5)
              AND (?6 IS NULL OR player_id = ?6)
            ORDER BY timestamp ASC
            "#,
        )
        .bind(filter.team.map(|t| t.as_str()))
        .bind(move_types)
        .bind(filter.succeeded_only)
        .bind(filter.time_range.map(|r| encode_timestamp(r.start)))
        .bind(filter.time_range.map(|r| encode_timestamp(r.end)))
        .bind(filter.player_id.map(encode_player_id))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| LedgerError::Database(e.to_string()))?;

        rows.iter().map(decode_action).collect()
    }

    async fn purge(&self) -> Result<u64, LedgerError> {
        let result = sqlx::query("DELETE FROM actions")
            .execute(&self.pool)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;
        Ok(result.rows_affected())
    }
}
