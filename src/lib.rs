//! Pom Wars Engine - combat resolution for a team productivity game
//!
//! Players log units of focused work as moves for one of two teams. Each
//! move is rolled against a success curve, narrated from authored content,
//! weighed against the opposing team's live defences and written to an
//! append-only ledger.

pub mod application;
pub mod domain;
pub mod infrastructure;
