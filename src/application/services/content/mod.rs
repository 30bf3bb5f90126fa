//! Narrative content - loading, validation and random selection
//!
//! Content is validated once when the store is built; the resulting
//! `ContentStore` is an immutable value that can be shared across tasks.

mod parser;
mod store;

pub use store::ContentStore;

use crate::domain::value_objects::{MoveType, Team, Tier};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ContentError {
    #[error("Invalid content in {source_name}: {message}")]
    Validation { source_name: String, message: String },

    #[error("No {move_type} content for team {team:?}, tier {tier:?}, critical {critical}")]
    NoMatchingContent {
        move_type: MoveType,
        team: Option<Team>,
        tier: Option<Tier>,
        critical: bool,
    },
}

/// One authored content document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSource {
    /// Shown in validation errors, usually the file path
    pub name: String,
    pub text: String,
}

impl ContentSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}
