pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::Database;
use crate::services::sessions::{spawn_sweeper, SessionStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub sessions: Arc<SessionStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Self {
        Self {
            db: Arc::new(db),
            sessions: Arc::new(SessionStore::with_idle_ttl(config.session_idle_ttl)),
            config: Arc::new(config),
        }
    }
}

/// Build the full router: public routes plus the token-protected API.
pub fn router(state: AppState) -> Router {
    let protected_routes = Router::new()
        // Player routes
        .route("/api/players/me", get(routes::players::me))
        // Game routes
        .route("/api/games", post(routes::games::start))
        .route(
            "/api/games/:id",
            get(routes::games::get).delete(routes::games::delete),
        )
        .route("/api/games/:id/intents", post(routes::games::apply_intent))
        // Progress routes
        .route("/api/progress", get(routes::progress::list))
        .route("/api/progress/:activity", get(routes::progress::get_activity))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/players/register", post(routes::players::register))
        .route("/api/gate", get(routes::gate::check))
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url).await?;

    tracing::info!("Running migrations...");
    db.run_migrations().await?;

    let addr = config.addr();
    tracing::info!(
        default_variant = config.default_variant.as_str(),
        "Starting server on {}",
        addr
    );

    let state = AppState::new(db, config);
    spawn_sweeper(state.sessions.clone(), Duration::from_secs(60));

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
