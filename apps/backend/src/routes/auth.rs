//! Authentication middleware

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use mindmatch_core::{decide, AccessDecision, IdentityLookup, RouteKind};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::services::identity::resolve_identity;
use crate::AppState;

/// Authenticated player info stored in request extensions
#[derive(Clone, Debug)]
pub struct AuthenticatedPlayer {
    pub player_id: Uuid,
    pub token: String,
}

/// Bearer token from the Authorization header, if well-formed
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Auth middleware for protected API routes. Fails closed: an identity
/// service that stays unavailable is treated as signed out.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    let token = bearer_token(request.headers()).map(str::to_string);

    let lookup = resolve_identity(state.db.as_ref(), token.as_deref(), &state.config.gate).await;
    let unavailable = matches!(lookup, IdentityLookup::Unavailable);

    let player = match decide(RouteKind::Protected, lookup) {
        AccessDecision::Allow(Some(player)) => player,
        _ if unavailable => {
            tracing::warn!("Identity service unavailable, denying request");
            return Err(ApiError::Unauthorized(
                "Identity service unavailable".to_string(),
            ));
        }
        _ if token.is_none() => {
            return Err(ApiError::Unauthorized(
                "Missing Authorization header".to_string(),
            ));
        }
        _ => return Err(ApiError::Unauthorized("Invalid player token".to_string())),
    };

    if let Err(e) = state.db.update_last_seen(player.id).await {
        tracing::warn!(player_id = %player.id, "Failed to update last_seen: {}", e);
    }

    request.extensions_mut().insert(AuthenticatedPlayer {
        player_id: player.id,
        token: player.token,
    });

    Ok(next.run(request).await)
}
