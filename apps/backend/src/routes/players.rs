//! Player registration and status endpoints

use axum::{extract::State, Extension, Json};

use crate::error::{ApiError, Result};
use crate::models::{PlayerRegisterRequest, PlayerRegisterResponse, PlayerStatusResponse};
use crate::routes::auth::AuthenticatedPlayer;
use crate::AppState;

/// POST /api/players/register
/// Creates a new player and returns the token
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<Option<PlayerRegisterRequest>>,
) -> Result<Json<PlayerRegisterResponse>> {
    let name = payload.and_then(|p| p.name);
    let player = state.db.create_player(name.as_deref()).await?;

    tracing::info!("Registered new player: {}", player.id);

    Ok(Json(PlayerRegisterResponse {
        player_id: player.id,
        token: player.token,
    }))
}

/// GET /api/players/me
pub async fn me(
    Extension(auth): Extension<AuthenticatedPlayer>,
    State(state): State<AppState>,
) -> Result<Json<PlayerStatusResponse>> {
    let player = state
        .db
        .get_player_by_token(&auth.token)
        .await?
        .ok_or_else(|| ApiError::NotFound("Player not found".to_string()))?;

    Ok(Json(PlayerStatusResponse {
        player_id: player.id,
        name: player.name,
        last_seen_at: player.last_seen_at,
    }))
}
