//! End-to-end tests
//!
//! Each test runs a registry, a gateway and one or more game backends in
//! process, all on loopback ports with in-memory stores.
//!
//! Run with: cargo test -p integration-tests --test e2e_tests

use game_core::ServiceKind;
use integration_tests::{
    fixtures::*, wait_until, Closed, TestCluster,
};
use reqwest::StatusCode;
use serde_json::json;

// ============================================================================
// Registry
// ============================================================================

#[tokio::test]
async fn test_registry_routes_registered_instance() {
    let cluster = TestCluster::start().await.expect("Failed to start cluster");
    let game = cluster
        .start_game("game-a", ServiceKind::Stateless, vec![1001])
        .await
        .expect("Failed to start game");

    let (status, body) = cluster
        .post_registry("/registry/route", &json!({ "game_id": 1001 }))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["endpoint"], json!(game.endpoint()));

    let (status, _) = cluster
        .post_registry("/registry/route", &json!({ "game_id": 9999 }))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_stopped_instance_is_no_longer_routed() {
    let cluster = TestCluster::start().await.expect("Failed to start cluster");
    let game = cluster
        .start_game("game-a", ServiceKind::Stateless, vec![1001])
        .await
        .expect("Failed to start game");

    game.shutdown().await;

    let route = cluster.registry.select_service_by_game(1001).await.unwrap();
    assert!(route.is_none());
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_returns_profile() {
    let cluster = TestCluster::start().await.expect("Failed to start cluster");
    let mut ws = cluster.connect().await.unwrap();

    ws.send_action("login", json!({ "token": TOKEN })).await.unwrap();
    let reply = ws.next_json().await.unwrap();

    assert_eq!(reply["action"], "login");
    assert_eq!(reply["data"]["success"], true);
    assert_eq!(reply["data"]["user_id"], USER_ID);
    assert_eq!(reply["data"]["nickname"], NICKNAME);
    assert_eq!(reply["data"]["balance"], 1_000_000);
}

#[tokio::test]
async fn test_rejected_token_closes_connection() {
    let cluster = TestCluster::start().await.expect("Failed to start cluster");
    let mut ws = cluster.connect().await.unwrap();

    ws.send_action("login", json!({ "token": "invalid" })).await.unwrap();
    let reply = ws.next_json().await.unwrap();
    assert_eq!(reply["action"], "login");
    assert_eq!(reply["error"], "Authentication Failed");

    assert_eq!(ws.expect_closed().await.unwrap(), Closed::Frame("Auth Failed".into()));
}

#[tokio::test]
async fn test_enter_game_before_login_is_rejected() {
    let cluster = TestCluster::start().await.expect("Failed to start cluster");
    let mut ws = cluster.connect().await.unwrap();

    ws.send_action("enterGame", json!({ "game_id": 1001 })).await.unwrap();
    let reply = ws.next_json().await.unwrap();
    assert_eq!(reply["action"], "enterGame");
    assert_eq!(reply["error"], "Not Logged In");

    assert_eq!(ws.expect_closed().await.unwrap(), Closed::Frame("Not Logged In".into()));
}

// ============================================================================
// Enter game
// ============================================================================

#[tokio::test]
async fn test_enter_stateless_game() {
    let cluster = TestCluster::start().await.expect("Failed to start cluster");
    let game = cluster
        .start_game("game-a", ServiceKind::Stateless, vec![1001])
        .await
        .expect("Failed to start game");
    let mut ws = cluster.login(TOKEN).await.unwrap();

    ws.send_action("enterGame", json!({ "game_id": 1001 })).await.unwrap();
    let reply = ws.next_json().await.unwrap();

    assert_eq!(reply["action"], "enterGame");
    assert_eq!(reply["data"], json!({ "success": true, "game_id": 1001 }));
    assert_eq!(game.handler.joins(), vec![USER_ID.to_string()]);
}

#[tokio::test]
async fn test_enter_unknown_game_keeps_connection() {
    let cluster = TestCluster::start().await.expect("Failed to start cluster");
    let game = cluster
        .start_game("game-a", ServiceKind::Stateless, vec![1001])
        .await
        .expect("Failed to start game");
    let mut ws = cluster.login(TOKEN).await.unwrap();

    ws.send_action("enterGame", json!({ "game_id": 4242 })).await.unwrap();
    let reply = ws.next_json().await.unwrap();
    assert_eq!(reply["error"], "Game Service Unavailable or Invalid ID");

    // The session may retry with a valid game.
    ws.send_action("enterGame", json!({ "game_id": 1001 })).await.unwrap();
    let reply = ws.next_json().await.unwrap();
    assert_eq!(reply["data"]["success"], true);
    assert_eq!(game.handler.joins().len(), 1);
}

#[tokio::test]
async fn test_second_enter_game_is_refused() {
    let cluster = TestCluster::start().await.expect("Failed to start cluster");
    let _game = cluster
        .start_game("game-a", ServiceKind::Stateful, vec![2001])
        .await
        .expect("Failed to start game");
    let mut ws = cluster.login(TOKEN).await.unwrap();

    ws.send_action("enterGame", json!({ "game_id": 2001 })).await.unwrap();
    ws.next_json().await.unwrap();

    ws.send_action("enterGame", json!({ "game_id": 2001 })).await.unwrap();
    let reply = ws.next_json().await.unwrap();
    assert_eq!(reply["error"], "Already In Game");
}

// ============================================================================
// Forwarding
// ============================================================================

#[tokio::test]
async fn test_forward_before_enter_game() {
    let cluster = TestCluster::start().await.expect("Failed to start cluster");
    let mut ws = cluster.login(TOKEN).await.unwrap();

    ws.send_action("move", json!({ "x": 1 })).await.unwrap();
    let reply = ws.next_json().await.unwrap();

    assert_eq!(reply["action"], "move");
    assert_eq!(reply["error"], "Unknown Action or Not In Game");
}

#[tokio::test]
async fn test_forward_to_stateless_game_echoes_frame() {
    let cluster = TestCluster::start().await.expect("Failed to start cluster");
    let _game = cluster
        .start_game("game-a", ServiceKind::Stateless, vec![1001])
        .await
        .expect("Failed to start game");
    let mut ws = cluster.login(TOKEN).await.unwrap();
    ws.send_action("enterGame", json!({ "game_id": 1001 })).await.unwrap();
    ws.next_json().await.unwrap();

    let frame = json!({ "action": "move", "payload": { "x": 3, "y": 4 } }).to_string();
    ws.send_text(frame.clone()).await.unwrap();

    assert_eq!(ws.next_text().await.unwrap(), frame);
}

#[tokio::test]
async fn test_stateful_push_reaches_client() {
    let cluster = TestCluster::start().await.expect("Failed to start cluster");
    let _game = cluster
        .start_game("room-a", ServiceKind::Stateful, vec![2001])
        .await
        .expect("Failed to start game");
    let mut ws = cluster.login(TOKEN).await.unwrap();
    ws.send_action("enterGame", json!({ "game_id": 2001 })).await.unwrap();
    ws.next_json().await.unwrap();

    let frame = json!({ "action": PUSH_ACTION, "payload": {} }).to_string();
    ws.send_text(frame.clone()).await.unwrap();

    // One copy pushed through the connector, one as the reply.
    assert_eq!(ws.next_text().await.unwrap(), frame);
    assert_eq!(ws.next_text().await.unwrap(), frame);
}

#[tokio::test]
async fn test_game_error_is_reported() {
    let cluster = TestCluster::start().await.expect("Failed to start cluster");
    let _game = cluster
        .start_game("game-a", ServiceKind::Stateless, vec![1001])
        .await
        .expect("Failed to start game");
    let mut ws = cluster.login(TOKEN).await.unwrap();
    ws.send_action("enterGame", json!({ "game_id": 1001 })).await.unwrap();
    ws.next_json().await.unwrap();

    ws.send_action(FAIL_ACTION, json!({})).await.unwrap();
    let reply = ws.next_json().await.unwrap();

    assert_eq!(reply["action"], "forward");
    assert_eq!(reply["error"], "Game Server Error: bad move");
}

// ============================================================================
// Session end
// ============================================================================

#[tokio::test]
async fn test_kick_from_game_closes_connection() {
    let cluster = TestCluster::start().await.expect("Failed to start cluster");
    let _game = cluster
        .start_game("room-a", ServiceKind::Stateful, vec![2001])
        .await
        .expect("Failed to start game");
    let mut ws = cluster.login(TOKEN).await.unwrap();
    ws.send_action("enterGame", json!({ "game_id": 2001 })).await.unwrap();
    ws.next_json().await.unwrap();

    ws.send_action(KICK_ACTION, json!({})).await.unwrap();

    assert_eq!(ws.expect_closed().await.unwrap(), Closed::Frame(KICK_REASON.into()));
}

#[tokio::test]
async fn test_disconnect_notifies_game() {
    let cluster = TestCluster::start().await.expect("Failed to start cluster");
    let game = cluster
        .start_game("room-a", ServiceKind::Stateful, vec![2001])
        .await
        .expect("Failed to start game");
    let mut ws = cluster.login(TOKEN).await.unwrap();
    ws.send_action("enterGame", json!({ "game_id": 2001 })).await.unwrap();
    ws.next_json().await.unwrap();

    ws.close().await.unwrap();

    let handler = game.handler.clone();
    let quit = wait_until(|| {
        let handler = handler.clone();
        async move { handler.quits() == vec![USER_ID.to_string()] }
    })
    .await;
    assert!(quit, "game never saw the quit");
}
