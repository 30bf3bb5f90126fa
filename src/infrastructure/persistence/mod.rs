//! Persistence adapters
//!
//! SQLite backs the ledger and player directory in production; the in-memory
//! adapters serve tests and throwaway runs.

mod memory;
mod sqlite_ledger;
mod sqlite_players;

pub use memory::{InMemoryLedger, InMemoryPlayerDirectory};
pub use sqlite_ledger::SqliteLedger;
pub use sqlite_players::SqlitePlayerDirectory;

use anyhow::{Context, Result};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// Open the database. In-memory databases are pinned to one connection so
/// every query sees the same data.
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .with_context(|| format!("Failed to open database {database_url}"))
}
