//! Database models and API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

// Re-export shared types from mindmatch-core
pub use mindmatch_core::types::{
    GameOutcome, Phase, SlotEvaluation, SlotResult, TermDefinitionPair, Variant,
};
use mindmatch_core::GameSession;

// === Database Entity Types ===

/// Registered player
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Player {
    pub id: Uuid,
    pub token: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

/// Result metadata stored next to the score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressDetails {
    pub achievement: Option<String>,
    pub completed_at: DateTime<Utc>,
    pub game_type: String,
    pub max_score: i32,
    pub variant: Variant,
    pub accuracy: f64,
}

/// One row per (player, activity), overwritten on replay
#[derive(Debug, Clone, FromRow)]
pub struct DbProgress {
    pub id: Uuid,
    pub player_id: Uuid,
    pub activity_name: String,
    pub score: i32,
    pub details: Json<ProgressDetails>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbProgress {
    /// Convert to API progress type
    pub fn to_api_entry(&self) -> ProgressEntry {
        ProgressEntry {
            activity_name: self.activity_name.clone(),
            score: self.score,
            details: self.details.0.clone(),
            updated_at: self.updated_at,
        }
    }
}

// === Session Types ===

/// Best-effort persistence indicator shown next to the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveStatus {
    /// Game not finished yet
    Idle,
    Pending,
    Saved,
    Failed,
}

impl Default for SaveStatus {
    fn default() -> Self {
        Self::Idle
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotView {
    pub slot_id: usize,
    pub definition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_term: Option<String>,
    pub locked: bool,
    pub evaluation: SlotEvaluation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermView {
    pub pair_id: i64,
    pub term: String,
    pub is_used: bool,
}

/// Everything the presentation shell needs to render a session.
///
/// A deferred-evaluation board in play reports every slot as `empty` so the
/// view doesn't give answers away before submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameView {
    pub session_id: Uuid,
    pub variant: Variant,
    pub phase: Phase,
    /// Generation of the dealt board; changes on every start and replay.
    pub board: u64,
    pub slots: Vec<SlotView>,
    pub terms: Vec<TermView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<i64>,
    pub points: u32,
    pub attempts: u32,
    pub completed: u32,
    pub accuracy: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achievement: Option<String>,
    pub results: Vec<SlotResult>,
    pub all_slots_filled: bool,
    pub save_status: SaveStatus,
}

impl GameView {
    pub fn new(session_id: Uuid, game: &GameSession, save_status: SaveStatus) -> Self {
        let reveal = game.variant().is_instant() || game.phase() == Phase::Results;

        let slots = game
            .slots()
            .iter()
            .map(|slot| {
                let evaluation = if reveal {
                    game.evaluate_slot(slot.slot_id)
                        .unwrap_or(SlotEvaluation::Empty)
                } else {
                    SlotEvaluation::Empty
                };
                SlotView {
                    slot_id: slot.slot_id,
                    definition: slot.definition.clone(),
                    assigned_term: slot
                        .assigned
                        .and_then(|id| game.term_text(id))
                        .map(str::to_string),
                    locked: slot.locked,
                    evaluation,
                }
            })
            .collect();

        let terms = game
            .terms()
            .iter()
            .map(|t| TermView {
                pair_id: t.pair_id,
                term: t.term.clone(),
                is_used: game.is_term_used(t.pair_id),
            })
            .collect();

        let outcome = game.outcome();

        Self {
            session_id,
            variant: game.variant(),
            phase: game.phase(),
            board: game.board(),
            slots,
            terms,
            selection: game.selection(),
            points: game.points(),
            attempts: game.attempts(),
            completed: game.completed(),
            accuracy: game.accuracy(),
            score: outcome.as_ref().map(|o| o.score),
            achievement: outcome.and_then(|o| o.achievement),
            results: game.results().to_vec(),
            all_slots_filled: game.all_slots_filled(),
            save_status,
        }
    }
}

// === API Request/Response Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct PlayerRegisterRequest {
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlayerRegisterResponse {
    pub player_id: Uuid,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlayerStatusResponse {
    pub player_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub last_seen_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StartGameRequest {
    pub variant: Option<Variant>,
    /// Custom content; the built-in deck is used when absent.
    pub pairs: Option<Vec<TermDefinitionPair>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteGameResponse {
    pub deleted: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GateQuery {
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GateResponse {
    /// "allow" or "redirect"
    pub decision: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub activity_name: String,
    pub score: i32,
    pub details: ProgressDetails,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProgressListResponse {
    pub records: Vec<ProgressEntry>,
}
