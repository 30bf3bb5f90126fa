//! Domain layer - Core game rules with no external dependencies
//!
//! This layer contains:
//! - Entities: Action, Player, ContentEntry
//! - Value Objects: Team, MoveType, Tier, WarSettings, identifiers
//! - Domain Services: tiering, success curves, damage, narrative text

pub mod entities;
pub mod services;
pub mod value_objects;
