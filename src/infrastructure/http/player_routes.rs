//! Player registration and lookup routes

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::{PlayerResponseDto, RegisterPlayerRequestDto};
use crate::application::services::PlayerTier;
use crate::domain::entities::Player;
use crate::domain::value_objects::PlayerId;
use crate::infrastructure::state::AppState;

fn parse_player_id(id: &str) -> Result<PlayerId, (StatusCode, String)> {
    id.parse::<u64>()
        .map(PlayerId::new)
        .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid player ID".to_string()))
}

async fn require_player(state: &AppState, id: PlayerId) -> Result<Player, (StatusCode, String)> {
    state
        .players
        .get(id)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Player not found".to_string()))
}

/// Register a player, or update their defend level
pub async fn register_player(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterPlayerRequestDto>,
) -> Result<(StatusCode, Json<PlayerResponseDto>), (StatusCode, String)> {
    let existing = state
        .players
        .get(req.id)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let (status, mut player) = match existing {
        Some(player) => (StatusCode::OK, player),
        None => (StatusCode::CREATED, Player::new(req.id)),
    };
    if let Some(level) = req.defend_level {
        player = player.with_defend_level(level);
    }

    state
        .players
        .save(&player)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok((status, Json(PlayerResponseDto::from(player))))
}

pub async fn get_player(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PlayerResponseDto>, (StatusCode, String)> {
    let player = require_player(&state, parse_player_id(&id)?).await?;
    Ok(Json(PlayerResponseDto::from(player)))
}

/// Current activity tier of a player
pub async fn get_player_tier(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PlayerTier>, (StatusCode, String)> {
    let player = require_player(&state, parse_player_id(&id)?).await?;

    state
        .move_service
        .tiers()
        .tier_for(player.id)
        .await
        .map(Json)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}
