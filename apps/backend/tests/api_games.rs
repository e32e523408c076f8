//! Game session API tests.
//!
//! These tests require a running PostgreSQL database.

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use pretty_assertions::assert_eq;
use serde_json::json;

use common::fixtures;
use common::TestContext;

#[tokio::test]
#[ignore = "requires database"]
async fn test_start_with_builtin_deck() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (player_id, token) = ctx.create_test_player(None).await;

    let response = server
        .post("/api/games")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .json(&json!({}))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["phase"], "playing");
    assert_eq!(body["variant"], "deferred_evaluation");
    assert_eq!(body["slots"].as_array().unwrap().len(), 12);
    assert_eq!(body["terms"].as_array().unwrap().len(), 12);
    assert_eq!(body["save_status"], "idle");

    ctx.cleanup_player(player_id).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_start_rejects_duplicate_ids() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (player_id, token) = ctx.create_test_player(None).await;

    let response = server
        .post("/api/games")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .json(&json!({
            "pairs": [
                { "id": 1, "term": "Neuron", "definition": "Sel saraf" },
                { "id": 1, "term": "Akson", "definition": "Serabut panjang" }
            ]
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "invalid_input");

    ctx.cleanup_player(player_id).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_deferred_game_is_played_and_saved() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (player_id, token) = ctx.create_test_player(None).await;
    let auth = TestContext::auth_header_value(&token);

    let view: serde_json::Value = server
        .post("/api/games")
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&fixtures::start_request(None))
        .await
        .json();
    let id = view["session_id"].as_str().unwrap().to_string();
    let intents = format!("/api/games/{}/intents", id);

    let neuron = fixtures::slot_for(&view, "Sel saraf");
    let akson = fixtures::slot_for(&view, "Serabut panjang");

    // Submitting an incomplete board is refused
    let response = server
        .post(&intents)
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&fixtures::intent("submit"))
        .await;
    response.assert_status(StatusCode::CONFLICT);

    // Swap answers: right term into the wrong slot first, then fix it
    server
        .post(&intents)
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&fixtures::assign(1, akson))
        .await
        .assert_status_ok();
    let view: serde_json::Value = server
        .post(&intents)
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&fixtures::assign(1, neuron))
        .await
        .json();

    // Moving a term empties the slot it came from
    let akson_slot = &view["slots"][akson as usize];
    assert!(akson_slot.get("assigned_term").is_none());
    // No answers leak before submission
    assert_eq!(view["slots"][neuron as usize]["evaluation"], "empty");

    server
        .post(&intents)
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&fixtures::assign(2, akson))
        .await
        .assert_status_ok();

    let response = server
        .post(&intents)
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&fixtures::intent("submit"))
        .await;
    response.assert_status_ok();
    let view: serde_json::Value = response.json();
    assert_eq!(view["phase"], "results");
    assert_eq!(view["score"], 100);
    assert_eq!(view["achievement"], "Brain Master");

    // The reporter runs in the background
    let mut saved = None;
    for _ in 0..50 {
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        let view: serde_json::Value = server
            .get(&format!("/api/games/{}", id))
            .add_header(axum::http::header::AUTHORIZATION, auth.clone())
            .await
            .json();
        if view["save_status"] != "pending" {
            saved = Some(view["save_status"].clone());
            break;
        }
    }
    assert_eq!(saved, Some(json!("saved")));

    let record = ctx
        .db
        .get_activity_progress(player_id, "mind_match_game")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.score, 100);
    assert_eq!(record.details.0.achievement.as_deref(), Some("Brain Master"));

    ctx.cleanup_player(player_id).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_lock_on_correct_clears_miss_after_delay() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (player_id, token) = ctx.create_test_player(None).await;
    let auth = TestContext::auth_header_value(&token);

    let view: serde_json::Value = server
        .post("/api/games")
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&fixtures::start_request(Some("lock_on_correct_only")))
        .await
        .json();
    let id = view["session_id"].as_str().unwrap().to_string();
    let akson = fixtures::slot_for(&view, "Serabut panjang");

    let view: serde_json::Value = server
        .post(&format!("/api/games/{}/intents", id))
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&fixtures::assign(1, akson))
        .await
        .json();
    assert_eq!(view["slots"][akson as usize]["evaluation"], "incorrect");
    assert_eq!(view["attempts"], 1);

    tokio::time::sleep(tokio::time::Duration::from_millis(1300)).await;

    let view: serde_json::Value = server
        .get(&format!("/api/games/{}", id))
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .await
        .json();
    assert!(view["slots"][akson as usize].get("assigned_term").is_none());
    assert_eq!(view["slots"][akson as usize]["evaluation"], "empty");

    ctx.cleanup_player(player_id).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_sessions_are_private() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (owner_id, owner_token) = ctx.create_test_player(None).await;
    let (other_id, other_token) = ctx.create_test_player(None).await;

    let view: serde_json::Value = server
        .post("/api/games")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&owner_token),
        )
        .json(&fixtures::start_request(None))
        .await
        .json();
    let path = format!("/api/games/{}", view["session_id"].as_str().unwrap());

    let response = server
        .get(&path)
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&other_token),
        )
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let response = server
        .delete(&path)
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&owner_token),
        )
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["deleted"], true);

    ctx.cleanup_player(owner_id).await;
    ctx.cleanup_player(other_id).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_unknown_intent_is_rejected() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (player_id, token) = ctx.create_test_player(None).await;
    let auth = TestContext::auth_header_value(&token);

    let view: serde_json::Value = server
        .post("/api/games")
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&fixtures::start_request(None))
        .await
        .json();

    let response = server
        .post(&format!(
            "/api/games/{}/intents",
            view["session_id"].as_str().unwrap()
        ))
        .add_header(axum::http::header::AUTHORIZATION, auth)
        .json(&json!({ "type": "teleport" }))
        .await;
    assert!(response.status_code().is_client_error());

    ctx.cleanup_player(player_id).await;
}
