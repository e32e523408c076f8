//! Page access check for the presentation shell

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use mindmatch_core::{classify_route, decide, AccessDecision, IdentityLookup, RouteKind};

use crate::models::{GateQuery, GateResponse};
use crate::routes::auth::bearer_token;
use crate::services::identity::resolve_identity;
use crate::AppState;

/// GET /api/gate?path=/dashboard
/// Tells the shell whether to render a page or redirect
pub async fn check(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<GateQuery>,
) -> Json<GateResponse> {
    let route = classify_route(&query.path);

    // Public pages never touch the identity service
    let lookup = if route == RouteKind::Public {
        IdentityLookup::Absent
    } else {
        resolve_identity(state.db.as_ref(), bearer_token(&headers), &state.config.gate).await
    };

    let decision = decide(route, lookup);
    let location = state.config.gate.location(&decision).map(str::to_string);

    tracing::debug!(path = %query.path, ?route, redirect = ?location, "Gate decision");

    Json(GateResponse {
        decision: match decision {
            AccessDecision::Allow(_) => "allow",
            _ => "redirect",
        }
        .to_string(),
        location,
    })
}
