//! Common test utilities and fixtures for integration tests.
//!
//! # Requirements
//! Integration tests require a PostgreSQL database (set DATABASE_URL env var).

pub mod fixtures;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use uuid::Uuid;

use mindmatch_backend::config::Config;
use mindmatch_backend::db::Database;
use mindmatch_backend::AppState;

/// Test context containing database connection and test router.
pub struct TestContext {
    pub db: Arc<Database>,
    app: Router,
}

impl TestContext {
    /// Create a new test context.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or database connection fails.
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Config::from_env().expect("DATABASE_URL must be set for integration tests");
        config.report.timeout = Duration::from_secs(2);
        config.report.backoff = Duration::from_millis(10);

        let db = Database::connect(&config.database_url)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations()
            .await
            .expect("Failed to run migrations");

        let state = AppState::new(db, config);
        let db = state.db.clone();
        let app = mindmatch_backend::router(state);

        Self { db, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Create a test player and return its ID and token.
    pub async fn create_test_player(&self, name: Option<&str>) -> (Uuid, String) {
        let player = self
            .db
            .create_player(name)
            .await
            .expect("Failed to create test player");
        (player.id, player.token)
    }

    /// Format authorization header value.
    pub fn auth_header_value(token: &str) -> String {
        format!("Bearer {}", token)
    }

    /// Clean up test data for a player.
    pub async fn cleanup_player(&self, player_id: Uuid) {
        let _ = sqlx::query("DELETE FROM user_progress WHERE player_id = $1")
            .bind(player_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM players WHERE id = $1")
            .bind(player_id)
            .execute(self.db.pool())
            .await;
    }
}
