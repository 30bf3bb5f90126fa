//! Domain entities - Objects with identity that persist over time

mod action;
mod content;
mod player;

pub use action::{Action, NewAction};
pub use content::ContentEntry;
pub use player::Player;
