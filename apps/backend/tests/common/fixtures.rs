//! Test fixtures and factory functions for creating test data.

#![allow(dead_code)]

use serde_json::{json, Value};

/// Two-pair deck small enough to play through by hand.
pub fn small_deck() -> Value {
    json!([
        { "id": 1, "term": "Neuron", "definition": "Sel saraf" },
        { "id": 2, "term": "Akson", "definition": "Serabut panjang" }
    ])
}

pub fn start_request(variant: Option<&str>) -> Value {
    json!({ "variant": variant, "pairs": small_deck() })
}

pub fn player_register_request(name: Option<&str>) -> Value {
    json!({ "name": name })
}

pub fn assign(pair_id: i64, slot_id: u64) -> Value {
    json!({ "type": "assign_term", "pair_id": pair_id, "slot_id": slot_id })
}

pub fn intent(kind: &str) -> Value {
    json!({ "type": kind })
}

/// Slot id whose definition matches.
pub fn slot_for(view: &Value, definition: &str) -> u64 {
    view["slots"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["definition"] == definition)
        .and_then(|s| s["slot_id"].as_u64())
        .unwrap()
}
