//! Shared application state

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::application::ports::outbound::{ClockPort, LedgerPort, PlayerDirectoryPort};
use crate::application::services::{ContentStore, MoveService, ScoreboardService, WarPorts};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::content_files::read_content_dir;
use crate::infrastructure::persistence::{self, SqliteLedger, SqlitePlayerDirectory};
use crate::infrastructure::system::{SystemClock, ThreadRandom};

/// Shared application state
pub struct AppState {
    pub ledger: Arc<dyn LedgerPort>,
    pub players: Arc<dyn PlayerDirectoryPort>,
    pub clock: Arc<dyn ClockPort>,
    pub move_service: MoveService,
    pub scoreboard_service: ScoreboardService,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self> {
        let sources = read_content_dir(&config.content_dir)?;
        let content = ContentStore::load(&sources).context("Content files failed validation")?;

        let pool = persistence::connect(&config.database_url()).await?;
        let ledger: Arc<dyn LedgerPort> = Arc::new(
            SqliteLedger::new(pool.clone())
                .await
                .context("Failed to initialise the actions table")?,
        );
        let players: Arc<dyn PlayerDirectoryPort> = Arc::new(
            SqlitePlayerDirectory::new(pool)
                .await
                .context("Failed to initialise the players table")?,
        );

        let ports = WarPorts {
            ledger,
            players,
            clock: Arc::new(SystemClock),
            random: Arc::new(ThreadRandom),
        };
        Ok(Self::from_parts(config, content, ports))
    }

    /// Wire services around already-built adapters.
    pub fn from_parts(config: AppConfig, content: ContentStore, ports: WarPorts) -> Self {
        let settings = Arc::new(config.war);
        let ledger = ports.ledger.clone();
        let players = ports.players.clone();
        let clock = ports.clock.clone();

        Self {
            move_service: MoveService::new(ports, Arc::new(content), settings)
                .with_bot_name(config.bot_name),
            scoreboard_service: ScoreboardService::new(ledger.clone()),
            ledger,
            players,
            clock,
        }
    }
}
