//! In-memory store of live game sessions.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use mindmatch_core::{Effect, GameSession, Intent, Phase, TermDefinitionPair, Variant};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::{GameView, SaveStatus};

/// Sessions untouched for this long are dropped.
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(30 * 60);

/// A session plus who owns it.
#[derive(Debug)]
pub struct SessionEntry {
    pub player_id: Uuid,
    pub game: GameSession,
    pub save_status: SaveStatus,
    touched: Instant,
}

/// Sessions are never shared between players; lookups for someone else's
/// session behave as if it doesn't exist. Each player has at most one live
/// session, and idle sessions are evicted after `idle_ttl`.
#[derive(Debug)]
pub struct SessionStore {
    inner: RwLock<HashMap<Uuid, SessionEntry>>,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_ttl(DEFAULT_IDLE_TTL)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            idle_ttl,
        }
    }

    /// Validate the pairs, deal a board and store the running session.
    ///
    /// Replaces any session the player already had and drops idle ones.
    pub async fn start(
        &self,
        player_id: Uuid,
        pairs: Vec<TermDefinitionPair>,
        variant: Variant,
    ) -> Result<GameView> {
        let game = deal(pairs, variant)?;
        let session_id = Uuid::new_v4();
        let view = GameView::new(session_id, &game, SaveStatus::Idle);

        let mut sessions = self.inner.write().await;
        let now = Instant::now();
        let before = sessions.len();
        sessions.retain(|_, e| e.player_id != player_id && !self.is_idle(e, now));
        if sessions.len() < before {
            tracing::debug!(
                %player_id,
                dropped = before - sessions.len(),
                "Dropped replaced or idle sessions"
            );
        }

        sessions.insert(
            session_id,
            SessionEntry {
                player_id,
                game,
                save_status: SaveStatus::Idle,
                touched: now,
            },
        );

        Ok(view)
    }

    pub async fn view(&self, session_id: Uuid, player_id: Uuid) -> Result<GameView> {
        let mut sessions = self.inner.write().await;
        let entry = owned_mut(sessions.get_mut(&session_id), player_id)?;
        entry.touched = Instant::now();
        Ok(GameView::new(session_id, &entry.game, entry.save_status))
    }

    /// Apply an intent and return the new view with any effects to run.
    pub async fn apply(
        &self,
        session_id: Uuid,
        player_id: Uuid,
        intent: Intent,
    ) -> Result<(GameView, Vec<Effect>)> {
        let mut sessions = self.inner.write().await;
        let entry = owned_mut(sessions.get_mut(&session_id), player_id)?;

        let effects = dispatch(&mut entry.game, intent)?;
        entry.touched = Instant::now();

        if effects.iter().any(|e| matches!(e, Effect::Completed(_))) {
            entry.save_status = SaveStatus::Pending;
        } else if entry.game.phase() != Phase::Results {
            entry.save_status = SaveStatus::Idle;
        }

        Ok((
            GameView::new(session_id, &entry.game, entry.save_status),
            effects,
        ))
    }

    /// Record the reporter's verdict for the board it was reporting. Ignored
    /// if the session is gone, has been dealt a new board since, or has left
    /// the results screen.
    pub async fn set_save_status(&self, session_id: Uuid, board: u64, status: SaveStatus) {
        let mut sessions = self.inner.write().await;
        if let Some(entry) = sessions.get_mut(&session_id) {
            if entry.game.board() == board && entry.save_status == SaveStatus::Pending {
                entry.save_status = status;
            }
        }
    }

    pub async fn remove(&self, session_id: Uuid, player_id: Uuid) -> Result<bool> {
        let mut sessions = self.inner.write().await;
        owned(sessions.get(&session_id), player_id)?;
        Ok(sessions.remove(&session_id).is_some())
    }

    /// Drop every session idle for longer than the TTL. Returns how many went.
    pub async fn evict_idle(&self) -> usize {
        let mut sessions = self.inner.write().await;
        let now = Instant::now();
        let before = sessions.len();
        sessions.retain(|_, e| !self.is_idle(e, now));
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    fn is_idle(&self, entry: &SessionEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.touched) >= self.idle_ttl
    }
}

/// Periodically evict idle sessions for the life of the process.
pub fn spawn_sweeper(store: Arc<SessionStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let evicted = store.evict_idle().await;
            if evicted > 0 {
                tracing::info!(evicted, "Evicted idle game sessions");
            }
        }
    })
}

fn owned(entry: Option<&SessionEntry>, player_id: Uuid) -> Result<&SessionEntry> {
    entry
        .filter(|e| e.player_id == player_id)
        .ok_or_else(|| ApiError::NotFound("Game session not found".to_string()))
}

fn owned_mut(entry: Option<&mut SessionEntry>, player_id: Uuid) -> Result<&mut SessionEntry> {
    entry
        .filter(|e| e.player_id == player_id)
        .ok_or_else(|| ApiError::NotFound("Game session not found".to_string()))
}

// The thread-local RNG never lives across an await point.
fn deal(pairs: Vec<TermDefinitionPair>, variant: Variant) -> Result<GameSession> {
    let mut rng = rand::rng();
    Ok(mindmatch_core::start_session(pairs, variant, &mut rng)?)
}

fn dispatch(game: &mut GameSession, intent: Intent) -> Result<Vec<Effect>> {
    let mut rng = rand::rng();
    Ok(game.dispatch(intent, &mut rng)?)
}
