//! Value objects - Immutable objects defined by their attributes

mod identity;
mod ids;
mod move_type;
mod settings;
mod team;
mod tier;

pub use identity::PlayerIdentity;
pub use ids::*;
pub use move_type::{MoveType, UnknownMoveType};
pub use settings::WarSettings;
pub use team::{Team, UnknownTeam};
pub use tier::Tier;
