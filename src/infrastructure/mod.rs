//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Persistence: SQLite and in-memory ledger/player adapters
//! - HTTP: REST API routes
//! - Content files: reading authored XML from disk
//! - System: wall clock and thread RNG
//! - Config: Application configuration
//! - State: Shared application state

pub mod config;
pub mod content_files;
pub mod http;
pub mod persistence;
pub mod state;
pub mod system;
