//! Core matching-game library shared by the backend and any presentation shell.
//!
//! Provides:
//! - Matching engine (term/definition assignment, variants, scoring)
//! - Intent reducer returning host-executed effects
//! - Markdown parser for game content
//! - Route access policy for the authentication gate

pub mod engine;
pub mod error;
pub mod gate;
pub mod intent;
pub mod parser;
pub mod scoring;
pub mod shuffle;
pub mod types;

pub use engine::{start_session, validate_pairs, GameSession, FEEDBACK_DELAY};
pub use error::{GameError, ParseError, Result};
pub use gate::{classify_route, decide, AccessDecision, GatePolicy, IdentityLookup, RouteKind};
pub use intent::{Effect, Intent};
pub use parser::parse;
pub use scoring::{achievement_for, POINTS_PER_MATCH};
pub use types::{
    GameOutcome, Phase, Slot, SlotEvaluation, SlotResult, TermDefinitionPair, TermToken, Variant,
};
