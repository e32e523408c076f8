//! Matching engine: pure state transitions over a game session.
//!
//! Click-to-select and drag-and-drop both reduce to "assign term X to slot Y".
//! Every operation validates before it mutates, so a rejected call leaves the
//! session untouched.

use std::collections::HashSet;
use std::time::Duration;

use rand::Rng;
use serde::Serialize;

use crate::error::{GameError, Result};
use crate::intent::Effect;
use crate::scoring::{self, POINTS_PER_MATCH};
use crate::shuffle::shuffled;
use crate::types::{
    GameOutcome, Phase, Slot, SlotEvaluation, SlotResult, TermDefinitionPair, TermToken, Variant,
};

/// How long an incorrect instant-feedback assignment stays visible.
pub const FEEDBACK_DELAY: Duration = Duration::from_millis(1000);

/// One play-through of the matching game.
#[derive(Debug, Clone, Serialize)]
pub struct GameSession {
    pairs: Vec<TermDefinitionPair>,
    variant: Variant,
    phase: Phase,
    slots: Vec<Slot>,
    terms: Vec<TermToken>,
    selection: Option<i64>,
    /// Bumped on every deal and on leaving the board.
    board: u64,
    score: u8,
    points: u32,
    attempts: u32,
    completed: u32,
    results: Vec<SlotResult>,
}

/// Validate and start a session in one step.
pub fn start_session<R: Rng + ?Sized>(
    pairs: Vec<TermDefinitionPair>,
    variant: Variant,
    rng: &mut R,
) -> Result<GameSession> {
    let mut session = GameSession::new(pairs, variant)?;
    session.start(rng);
    Ok(session)
}

/// Reject empty pair sets and duplicate ids.
pub fn validate_pairs(pairs: &[TermDefinitionPair]) -> Result<()> {
    if pairs.is_empty() {
        return Err(GameError::InvalidInput("pair set is empty".to_string()));
    }

    let mut seen = HashSet::with_capacity(pairs.len());
    for pair in pairs {
        if !seen.insert(pair.id) {
            return Err(GameError::InvalidInput(format!(
                "duplicate pair id {}",
                pair.id
            )));
        }
    }

    Ok(())
}

impl GameSession {
    /// Create a session in the menu phase. The board is built by `start`.
    pub fn new(pairs: Vec<TermDefinitionPair>, variant: Variant) -> Result<Self> {
        validate_pairs(&pairs)?;

        Ok(Self {
            pairs,
            variant,
            phase: Phase::Menu,
            slots: Vec::new(),
            terms: Vec::new(),
            selection: None,
            board: 0,
            score: 0,
            points: 0,
            attempts: 0,
            completed: 0,
            results: Vec::new(),
        })
    }

    /// Deal a fresh board and enter the playing phase.
    ///
    /// Terms and definitions are shuffled independently, so a slot's position
    /// says nothing about any term's position. Calling this while playing
    /// resets the board.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.terms = shuffled(&self.pairs, rng)
            .into_iter()
            .map(|p| TermToken {
                pair_id: p.id,
                term: p.term,
            })
            .collect();

        self.slots = shuffled(&self.pairs, rng)
            .into_iter()
            .enumerate()
            .map(|(slot_id, p)| Slot {
                slot_id,
                definition: p.definition,
                correct_pair_id: p.id,
                assigned: None,
                locked: false,
            })
            .collect();

        self.selection = None;
        self.board += 1;
        self.score = 0;
        self.points = 0;
        self.attempts = 0;
        self.completed = 0;
        self.results.clear();
        self.phase = Phase::Playing;
    }

    /// Abandon the board and return to the menu. Nothing is scored.
    pub fn back_to_menu(&mut self) {
        self.slots.clear();
        self.terms.clear();
        self.selection = None;
        self.board += 1;
        self.score = 0;
        self.points = 0;
        self.attempts = 0;
        self.completed = 0;
        self.results.clear();
        self.phase = Phase::Menu;
    }

    // === Accessors ===

    pub fn pairs(&self) -> &[TermDefinitionPair] {
        &self.pairs
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn terms(&self) -> &[TermToken] {
        &self.terms
    }

    pub fn selection(&self) -> Option<i64> {
        self.selection
    }

    /// Generation of the current board. Timers and reports carry it so they
    /// can't touch a board dealt after them.
    pub fn board(&self) -> u64 {
        self.board
    }

    /// Running total of awarded points (instant-feedback variants).
    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn completed(&self) -> u32 {
        self.completed
    }

    /// Final score, only meaningful once results are in.
    pub fn score(&self) -> Option<u8> {
        (self.phase == Phase::Results).then_some(self.score)
    }

    pub fn accuracy(&self) -> f64 {
        scoring::accuracy(self.completed, self.attempts)
    }

    /// Per-slot review rows; empty until the results phase.
    pub fn results(&self) -> &[SlotResult] {
        &self.results
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.score().map(|score| GameOutcome {
            score,
            achievement: scoring::achievement_for(score).map(str::to_string),
        })
    }

    /// Whether a term token is spent under the session's variant.
    pub fn is_term_used(&self, pair_id: i64) -> bool {
        self.slots.iter().any(|s| {
            s.assigned == Some(pair_id) && (!self.variant.is_instant() || s.locked)
        })
    }

    pub fn term_text(&self, pair_id: i64) -> Option<&str> {
        self.pairs
            .iter()
            .find(|p| p.id == pair_id)
            .map(|p| p.term.as_str())
    }

    // === Operations ===

    /// Toggle the selected term.
    pub fn select_term(&mut self, pair_id: i64) -> Result<()> {
        self.ensure_playing()?;
        self.ensure_pair(pair_id)?;

        if self.variant.is_instant() && self.is_term_used(pair_id) {
            return Err(GameError::invalid_operation(format!(
                "term {} is already matched",
                pair_id
            )));
        }

        self.selection = if self.selection == Some(pair_id) {
            None
        } else {
            Some(pair_id)
        };
        Ok(())
    }

    /// Put a term into a slot. A term occupies at most one slot, so any other
    /// slot holding it is cleared first.
    ///
    /// Instant-feedback variants evaluate the assignment right away; see
    /// [`GameSession::instant_assign`].
    pub fn assign_term_to_slot(&mut self, pair_id: i64, slot_id: usize) -> Result<Vec<Effect>> {
        if self.variant.is_instant() {
            return self.instant_assign(pair_id, slot_id);
        }

        self.ensure_playing()?;
        self.ensure_pair(pair_id)?;
        let idx = self.slot_index(slot_id)?;

        self.place(pair_id, idx);
        self.selection = None;
        Ok(Vec::new())
    }

    /// Assign the currently selected term ("click term, then click slot").
    pub fn assign_selected(&mut self, slot_id: usize) -> Result<Vec<Effect>> {
        self.ensure_playing()?;
        let pair_id = self
            .selection
            .ok_or_else(|| GameError::invalid_operation("no term selected"))?;
        self.assign_term_to_slot(pair_id, slot_id)
    }

    /// Assign and evaluate immediately.
    ///
    /// A correct match locks the slot and awards points. A miss either locks
    /// too (`LockOnAnyAssignment`) or stays transient and is cleared by the
    /// returned `ClearAfter` effect (`LockOnCorrectOnly`).
    pub fn instant_assign(&mut self, pair_id: i64, slot_id: usize) -> Result<Vec<Effect>> {
        self.ensure_playing()?;
        self.ensure_pair(pair_id)?;
        let idx = self.slot_index(slot_id)?;

        if !self.variant.is_instant() {
            return Err(GameError::invalid_operation(
                "instant assignment needs an instant-feedback variant",
            ));
        }
        if self.slots[idx].locked {
            return Err(GameError::invalid_operation(format!(
                "slot {} is locked",
                slot_id
            )));
        }
        if self.is_term_used(pair_id) {
            return Err(GameError::invalid_operation(format!(
                "term {} is already matched",
                pair_id
            )));
        }

        self.place(pair_id, idx);
        self.selection = None;
        self.attempts += 1;

        let mut effects = Vec::new();
        let correct = self.slots[idx].correct_pair_id == pair_id;

        if correct {
            self.slots[idx].locked = true;
            self.points += POINTS_PER_MATCH;
            self.completed += 1;
        } else if self.variant == Variant::LockOnAnyAssignment {
            self.slots[idx].locked = true;
        } else {
            effects.push(Effect::ClearAfter {
                slot_id,
                pair_id,
                board: self.board,
                delay: FEEDBACK_DELAY,
            });
        }

        if self.slots.iter().all(|s| s.locked) {
            effects.push(Effect::Completed(self.finish()));
        }

        Ok(effects)
    }

    /// Empty a slot. Clearing an empty slot succeeds and changes nothing.
    pub fn clear_slot(&mut self, slot_id: usize) -> Result<()> {
        self.ensure_playing()?;
        let idx = self.slot_index(slot_id)?;

        if self.slots[idx].locked {
            return Err(GameError::invalid_operation(format!(
                "slot {} is locked",
                slot_id
            )));
        }

        self.slots[idx].assigned = None;
        Ok(())
    }

    /// Revert a transient wrong answer once its feedback has been shown.
    ///
    /// Stale timers are expected (the player may have moved on or been dealt
    /// a new board), so this never fails; it returns whether anything was
    /// cleared.
    pub fn expire_feedback(&mut self, slot_id: usize, pair_id: i64, board: u64) -> bool {
        if self.phase != Phase::Playing || board != self.board {
            return false;
        }
        match self.slots.get_mut(slot_id) {
            Some(slot) if !slot.locked && slot.assigned == Some(pair_id) => {
                slot.assigned = None;
                true
            }
            _ => false,
        }
    }

    pub fn evaluate_slot(&self, slot_id: usize) -> Result<SlotEvaluation> {
        let idx = self.slot_index(slot_id)?;
        Ok(Self::evaluate(&self.slots[idx]))
    }

    pub fn all_slots_filled(&self) -> bool {
        !self.slots.is_empty() && self.slots.iter().all(Slot::is_filled)
    }

    /// Score a deferred-evaluation board.
    pub fn submit(&mut self) -> Result<GameOutcome> {
        self.ensure_playing()?;

        if self.variant != Variant::DeferredEvaluation {
            return Err(GameError::invalid_operation(
                "submit is only available with deferred evaluation",
            ));
        }
        if !self.all_slots_filled() {
            return Err(GameError::IncompleteSubmission {
                filled: self.slots.iter().filter(|s| s.is_filled()).count(),
                total: self.slots.len(),
            });
        }

        Ok(self.finish())
    }

    // === Internals ===

    fn evaluate(slot: &Slot) -> SlotEvaluation {
        match slot.assigned {
            None => SlotEvaluation::Empty,
            Some(id) if id == slot.correct_pair_id => SlotEvaluation::Correct,
            Some(_) => SlotEvaluation::Incorrect,
        }
    }

    fn place(&mut self, pair_id: i64, idx: usize) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if i != idx && slot.assigned == Some(pair_id) {
                slot.assigned = None;
            }
        }
        self.slots[idx].assigned = Some(pair_id);
    }

    fn finish(&mut self) -> GameOutcome {
        let results: Vec<SlotResult> = self
            .slots
            .iter()
            .map(|slot| SlotResult {
                slot_id: slot.slot_id,
                is_correct: Self::evaluate(slot) == SlotEvaluation::Correct,
                user_answer: slot
                    .assigned
                    .and_then(|id| self.term_text(id))
                    .unwrap_or_default()
                    .to_string(),
                correct_answer: self
                    .term_text(slot.correct_pair_id)
                    .unwrap_or_default()
                    .to_string(),
            })
            .collect();

        let correct = results.iter().filter(|r| r.is_correct).count();
        self.score = match self.variant {
            Variant::LockOnCorrectOnly => {
                scoring::percent(self.completed as usize, self.attempts as usize)
            }
            Variant::DeferredEvaluation | Variant::LockOnAnyAssignment => {
                scoring::percent(correct, self.slots.len())
            }
        };
        self.results = results;
        self.selection = None;
        self.phase = Phase::Results;

        GameOutcome {
            score: self.score,
            achievement: scoring::achievement_for(self.score).map(str::to_string),
        }
    }

    fn ensure_playing(&self) -> Result<()> {
        if self.phase != Phase::Playing {
            return Err(GameError::invalid_operation(format!(
                "not allowed in {:?} phase",
                self.phase
            )));
        }
        Ok(())
    }

    fn ensure_pair(&self, pair_id: i64) -> Result<()> {
        if !self.pairs.iter().any(|p| p.id == pair_id) {
            return Err(GameError::invalid_operation(format!(
                "unknown pair {}",
                pair_id
            )));
        }
        Ok(())
    }

    fn slot_index(&self, slot_id: usize) -> Result<usize> {
        if slot_id >= self.slots.len() {
            return Err(GameError::invalid_operation(format!(
                "unknown slot {}",
                slot_id
            )));
        }
        Ok(slot_id)
    }
}
