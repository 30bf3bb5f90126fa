//! Data Transfer Objects - For API boundaries
//!
//! DTOs live in the application layer so the HTTP adapter can
//! serialize/deserialize without reaching into service internals.

mod moves;
mod player;
mod scoreboard;

pub use moves::{MoveRequest, MoveResult};
pub use player::{PlayerResponseDto, RegisterPlayerRequestDto};
pub use scoreboard::{Scoreboard, TeamScore};
