//! PostgreSQL database operations

use sqlx::{postgres::PgPoolOptions, types::Json, PgPool};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a pool that only connects on first use
    pub fn connect_lazy(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_lazy(database_url)?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === Player Repository ===

    /// Create a new player with generated token
    pub async fn create_player(&self, name: Option<&str>) -> Result<Player> {
        let token = Uuid::new_v4().to_string();
        let player = sqlx::query_as::<_, Player>(
            r#"
            INSERT INTO players (token, name)
            VALUES ($1, $2)
            RETURNING id, token, name, created_at, last_seen_at
            "#,
        )
        .bind(&token)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(player)
    }

    /// Get player by token
    pub async fn get_player_by_token(&self, token: &str) -> Result<Option<Player>> {
        let player = sqlx::query_as::<_, Player>(
            r#"
            SELECT id, token, name, created_at, last_seen_at
            FROM players
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(player)
    }

    /// Update player last_seen_at timestamp
    pub async fn update_last_seen(&self, player_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE players
            SET last_seen_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(player_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // === Progress Repository ===

    /// Insert or overwrite the record for (player, activity)
    pub async fn upsert_progress(
        &self,
        player_id: Uuid,
        activity_name: &str,
        score: i32,
        details: &ProgressDetails,
    ) -> Result<DbProgress> {
        let record = sqlx::query_as::<_, DbProgress>(
            r#"
            INSERT INTO user_progress (player_id, activity_name, score, details)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (player_id, activity_name) DO UPDATE SET
                score = EXCLUDED.score,
                details = EXCLUDED.details,
                updated_at = NOW()
            RETURNING id, player_id, activity_name, score, details, created_at, updated_at
            "#,
        )
        .bind(player_id)
        .bind(activity_name)
        .bind(score)
        .bind(Json(details))
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    /// Saved results for a player, newest first
    pub async fn get_progress(&self, player_id: Uuid) -> Result<Vec<DbProgress>> {
        let records = sqlx::query_as::<_, DbProgress>(
            r#"
            SELECT id, player_id, activity_name, score, details, created_at, updated_at
            FROM user_progress
            WHERE player_id = $1
            ORDER BY updated_at DESC
            "#,
        )
        .bind(player_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Saved result for one activity
    pub async fn get_activity_progress(
        &self,
        player_id: Uuid,
        activity_name: &str,
    ) -> Result<Option<DbProgress>> {
        let record = sqlx::query_as::<_, DbProgress>(
            r#"
            SELECT id, player_id, activity_name, score, details, created_at, updated_at
            FROM user_progress
            WHERE player_id = $1 AND activity_name = $2
            "#,
        )
        .bind(player_id)
        .bind(activity_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}
