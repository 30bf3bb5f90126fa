//! Application configuration

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::domain::value_objects::WarSettings;

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite database file. `:memory:` keeps everything in process.
    pub database_path: String,
    /// Directory scanned recursively for `*.xml` content files
    pub content_dir: PathBuf,
    /// HTTP server port
    pub server_port: u16,
    /// Name the bot goes by in bribe stories
    pub bot_name: String,
    pub war: WarSettings,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_path: env::var("POMWARS_DATABASE_PATH").unwrap_or_else(|_| "pomwars.db".to_string()),
            content_dir: env::var("POMWARS_CONTENT_DIR")
                .unwrap_or_else(|_| "data/actions".to_string())
                .into(),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
            bot_name: env::var("POMWARS_BOT_NAME").unwrap_or_else(|_| "Pombot".to_string()),
            war: WarSettings::from_env(),
        })
    }

    pub fn database_url(&self) -> String {
        if self.database_path == ":memory:" {
            "sqlite::memory:".to_string()
        } else {
            format!("sqlite:{}?mode=rwc", self.database_path)
        }
    }
}
