//! Core types for the matching game.

use serde::{Deserialize, Serialize};

/// One term/definition unit of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermDefinitionPair {
    pub id: i64,
    pub term: String,
    pub definition: String,
}

impl TermDefinitionPair {
    pub fn new(id: i64, term: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            id,
            term: term.into(),
            definition: definition.into(),
        }
    }
}

/// A definition placeholder awaiting a term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Position in the shuffled definition ordering.
    pub slot_id: usize,
    pub definition: String,
    pub correct_pair_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned: Option<i64>,
    /// Locked slots can no longer be cleared or reassigned.
    pub locked: bool,
}

impl Slot {
    pub fn is_filled(&self) -> bool {
        self.assigned.is_some()
    }
}

/// Clickable/draggable representation of a pair's term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermToken {
    pub pair_id: i64,
    pub term: String,
}

/// Coarse game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Menu,
    Playing,
    Results,
}

impl Default for Phase {
    fn default() -> Self {
        Self::Menu
    }
}

/// Policy applied to assignments, chosen when the session is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Free assignment; correctness is computed on explicit submission.
    DeferredEvaluation,
    /// Instant feedback; only correct assignments stick.
    LockOnCorrectOnly,
    /// Instant feedback; every assignment is final.
    LockOnAnyAssignment,
}

impl Default for Variant {
    fn default() -> Self {
        Self::DeferredEvaluation
    }
}

impl Variant {
    /// Get the variant name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeferredEvaluation => "deferred_evaluation",
            Self::LockOnCorrectOnly => "lock_on_correct_only",
            Self::LockOnAnyAssignment => "lock_on_any_assignment",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "deferred_evaluation" => Some(Self::DeferredEvaluation),
            "lock_on_correct_only" => Some(Self::LockOnCorrectOnly),
            "lock_on_any_assignment" => Some(Self::LockOnAnyAssignment),
            _ => None,
        }
    }

    /// Whether assignments are evaluated as soon as they are made.
    pub fn is_instant(&self) -> bool {
        !matches!(self, Self::DeferredEvaluation)
    }
}

/// Correctness of a single slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotEvaluation {
    Correct,
    Incorrect,
    Empty,
}

/// Per-slot review row shown on the results screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotResult {
    pub slot_id: usize,
    pub is_correct: bool,
    pub user_answer: String,
    pub correct_answer: String,
}

/// What crosses the boundary to the result reporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    /// 0..=100
    pub score: u8,
    pub achievement: Option<String>,
}
