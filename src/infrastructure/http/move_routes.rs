//! Move, defence and scoreboard routes

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::application::dto::{MoveRequest, MoveResult, Scoreboard};
use crate::application::services::{MoveError, TeamDefense};
use crate::domain::value_objects::Team;
use crate::infrastructure::state::AppState;

fn move_error_status(err: &MoveError) -> StatusCode {
    match err {
        MoveError::UnknownPlayer(_) => StatusCode::NOT_FOUND,
        MoveError::DescriptionTooLong { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        MoveError::NoMatchingContent(_)
        | MoveError::ContentValidation(_)
        | MoveError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Resolve a move
pub async fn submit_move(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<MoveResult>, (StatusCode, String)> {
    state
        .move_service
        .resolve_move(req)
        .await
        .map(Json)
        .map_err(|e| (move_error_status(&e), e.to_string()))
}

/// Live defence of a team
pub async fn get_team_defense(
    State(state): State<Arc<AppState>>,
    Path(team): Path<String>,
) -> Result<Json<TeamDefense>, (StatusCode, String)> {
    let team = team
        .parse::<Team>()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    state
        .move_service
        .defense()
        .active_defense(team, state.clock.now())
        .await
        .map(Json)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

pub async fn get_scoreboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Scoreboard>, (StatusCode, String)> {
    state
        .scoreboard_service
        .scoreboard()
        .await
        .map(Json)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

#[derive(Debug, Serialize)]
pub struct PurgeResponse {
    pub removed: u64,
}

/// Delete every recorded action
pub async fn purge_actions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PurgeResponse>, (StatusCode, String)> {
    let removed = state
        .ledger
        .purge()
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    tracing::info!(removed, "Purged action ledger");
    Ok(Json(PurgeResponse { removed }))
}
