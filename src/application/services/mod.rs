//! Application services - Use case implementations
//!
//! Each service takes its outbound ports as `Arc<dyn Port>` and the war
//! tuning as an explicit `WarSettings` value.

pub mod content;
pub mod defense_service;
pub mod move_service;
pub mod outcome_resolver;
pub mod scoreboard_service;
pub mod tier_service;

pub use content::{ContentError, ContentSource, ContentStore};
pub use defense_service::{DefenseAggregator, DefenseError, TeamDefense};
pub use move_service::{MoveError, MoveService, WarPorts};
pub use outcome_resolver::OutcomeResolver;
pub use scoreboard_service::ScoreboardService;
pub use tier_service::{PlayerTier, TierService};
