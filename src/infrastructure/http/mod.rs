//! HTTP REST API routes

mod move_routes;
mod player_routes;

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::infrastructure::state::AppState;

pub use move_routes::*;
pub use player_routes::*;

/// Create all API routes
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Moves
        .route("/api/moves", post(move_routes::submit_move))
        .route("/api/teams/{team}/defense", get(move_routes::get_team_defense))
        .route("/api/scoreboard", get(move_routes::get_scoreboard))
        .route("/api/actions", delete(move_routes::purge_actions))
        // Players
        .route("/api/players", post(player_routes::register_player))
        .route("/api/players/{id}", get(player_routes::get_player))
        .route("/api/players/{id}/tier", get(player_routes::get_player_tier))
}
