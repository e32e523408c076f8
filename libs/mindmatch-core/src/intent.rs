//! Player intents and the single reducer that applies them.
//!
//! Timing and persistence are returned as [`Effect`]s for the host to run, so
//! the engine itself never sleeps or performs I/O.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::engine::GameSession;
use crate::error::{GameError, Result};
use crate::types::{GameOutcome, Phase};

/// Something the presentation shell asks the engine to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    Start,
    SelectTerm { pair_id: i64 },
    AssignTerm { pair_id: i64, slot_id: usize },
    AssignSelected { slot_id: usize },
    ClearSlot { slot_id: usize },
    ExpireFeedback {
        slot_id: usize,
        pair_id: i64,
        board: u64,
    },
    Submit,
    PlayAgain,
    BackToMenu,
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Dispatch `Intent::ExpireFeedback` for this slot after `delay`.
    ClearAfter {
        slot_id: usize,
        pair_id: i64,
        board: u64,
        delay: Duration,
    },
    /// The session just entered the results phase; hand this to the reporter.
    Completed(GameOutcome),
}

impl GameSession {
    /// Apply one intent. On error the session is unchanged.
    pub fn dispatch<R: Rng + ?Sized>(&mut self, intent: Intent, rng: &mut R) -> Result<Vec<Effect>> {
        match intent {
            Intent::Start => {
                if self.phase() == Phase::Results {
                    return Err(GameError::invalid_operation(
                        "game already finished, use play_again",
                    ));
                }
                self.start(rng);
                Ok(Vec::new())
            }
            Intent::PlayAgain => {
                if self.phase() != Phase::Results {
                    return Err(GameError::invalid_operation(
                        "play_again is only available on the results screen",
                    ));
                }
                self.start(rng);
                Ok(Vec::new())
            }
            Intent::BackToMenu => {
                self.back_to_menu();
                Ok(Vec::new())
            }
            Intent::SelectTerm { pair_id } => {
                self.select_term(pair_id)?;
                Ok(Vec::new())
            }
            Intent::AssignTerm { pair_id, slot_id } => self.assign_term_to_slot(pair_id, slot_id),
            Intent::AssignSelected { slot_id } => self.assign_selected(slot_id),
            Intent::ClearSlot { slot_id } => {
                self.clear_slot(slot_id)?;
                Ok(Vec::new())
            }
            Intent::ExpireFeedback {
                slot_id,
                pair_id,
                board,
            } => {
                self.expire_feedback(slot_id, pair_id, board);
                Ok(Vec::new())
            }
            Intent::Submit => {
                let outcome = self.submit()?;
                Ok(vec![Effect::Completed(outcome)])
            }
        }
    }
}
