//! Game session endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use mindmatch_core::Intent;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{DeleteGameResponse, GameView, StartGameRequest};
use crate::routes::auth::AuthenticatedPlayer;
use crate::services::content::default_pairs;
use crate::services::effects::spawn_effects;
use crate::AppState;

/// POST /api/games
/// Deals a new board from the built-in deck or the pairs in the body
pub async fn start(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedPlayer>,
    Json(payload): Json<Option<StartGameRequest>>,
) -> Result<Json<GameView>> {
    let request = payload.unwrap_or_default();
    let variant = request.variant.unwrap_or(state.config.default_variant);

    let pairs = match request.pairs {
        Some(pairs) => pairs,
        None => default_pairs()?,
    };

    let view = state.sessions.start(auth.player_id, pairs, variant).await?;

    tracing::info!(
        session_id = %view.session_id,
        player_id = %auth.player_id,
        variant = variant.as_str(),
        slots = view.slots.len(),
        "Started game"
    );

    Ok(Json(view))
}

/// GET /api/games/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedPlayer>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<GameView>> {
    let view = state.sessions.view(session_id, auth.player_id).await?;
    Ok(Json(view))
}

/// POST /api/games/:id/intents
/// Applies one intent and schedules whatever effects it produced
pub async fn apply_intent(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedPlayer>,
    Path(session_id): Path<Uuid>,
    Json(intent): Json<Intent>,
) -> Result<Json<GameView>> {
    tracing::debug!(%session_id, ?intent, "Applying intent");

    let (view, effects) = state
        .sessions
        .apply(session_id, auth.player_id, intent)
        .await?;

    spawn_effects(&state, auth.player_id, &view, effects);

    Ok(Json(view))
}

/// DELETE /api/games/:id
/// Abandons a session; nothing is reported
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedPlayer>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<DeleteGameResponse>> {
    let deleted = state.sessions.remove(session_id, auth.player_id).await?;
    Ok(Json(DeleteGameResponse { deleted }))
}
