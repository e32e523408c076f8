//! Runs the side effects the engine hands back: feedback timers and
//! fire-and-forget result reporting.

use mindmatch_core::{Effect, Intent};
use uuid::Uuid;

use crate::models::GameView;
use crate::services::content::ACTIVITY_NAME;
use crate::services::reporter::{report_with_policy, GameReport};
use crate::AppState;

/// Spawn a task per effect. Never blocks the request that produced them.
pub fn spawn_effects(state: &AppState, player_id: Uuid, view: &GameView, effects: Vec<Effect>) {
    let session_id = view.session_id;
    let board = view.board;

    for effect in effects {
        match effect {
            Effect::ClearAfter {
                slot_id,
                pair_id,
                board,
                delay,
            } => {
                let sessions = state.sessions.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let intent = Intent::ExpireFeedback {
                        slot_id,
                        pair_id,
                        board,
                    };
                    if let Err(e) = sessions.apply(session_id, player_id, intent).await {
                        tracing::debug!(%session_id, "Feedback timer dropped: {}", e);
                    }
                });
            }
            Effect::Completed(outcome) => {
                tracing::info!(
                    %session_id,
                    %player_id,
                    score = outcome.score,
                    achievement = outcome.achievement.as_deref().unwrap_or("-"),
                    "Game completed"
                );

                let report = GameReport {
                    player_id,
                    activity_name: ACTIVITY_NAME.to_string(),
                    outcome,
                    variant: view.variant,
                    accuracy: view.accuracy,
                };
                let db = state.db.clone();
                let sessions = state.sessions.clone();
                let policy = state.config.report.clone();
                tokio::spawn(async move {
                    let status = report_with_policy(db.as_ref(), &report, &policy).await;
                    sessions.set_save_status(session_id, board, status).await;
                });
            }
        }
    }
}
