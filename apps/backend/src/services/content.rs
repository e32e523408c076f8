//! Built-in game content.

use mindmatch_core::{parse, validate_pairs, TermDefinitionPair};

use crate::error::Result;

/// Activity name results are stored under.
pub const ACTIVITY_NAME: &str = "mind_match_game";

const DEFAULT_DECK: &str = include_str!("../../content/mind_match.md");

/// The nervous-system deck shipped with the server.
pub fn default_pairs() -> Result<Vec<TermDefinitionPair>> {
    let pairs = parse(DEFAULT_DECK)?;
    validate_pairs(&pairs)?;
    Ok(pairs)
}
