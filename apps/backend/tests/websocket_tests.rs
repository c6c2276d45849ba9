//! Spectators over a real WebSocket connection.
//!
//! Run with: cargo test -p arena --test websocket_tests

mod support;

use std::time::Duration;

use arena::ai::PlayerId;
use arena::session::{SideAssignment, TickOutcome};
use arena::{build_state, AppState, MoveLoop, Session};
use support::providers::{acquirer, random_only_acquirer, ScriptedProvider};
use support::server::{start_test_server, test_config};
use support::websocket_client::WebSocketClient;

const WAIT: Duration = Duration::from_secs(5);
const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

async fn arena_state() -> Result<AppState, Box<dyn std::error::Error>> {
    Ok(build_state(test_config())
        .with_session(Session::with_sides(SideAssignment::new(PlayerId::ChatGpt), 1))
        .build()
        .await?)
}

fn move_loop(state: &AppState, acquirer: std::sync::Arc<arena::ai::MoveAcquirer>) -> MoveLoop {
    MoveLoop::new(
        state.session().clone(),
        acquirer,
        state.hub().clone(),
        state.store().clone(),
        Duration::from_secs(60),
    )
}

#[actix_web::test]
async fn viewer_gets_snapshot_then_moves() -> Result<(), Box<dyn std::error::Error>> {
    let state = arena_state().await?;
    let (server, addr) = start_test_server(state.clone())?;

    let mut client = WebSocketClient::connect_retry(&format!("ws://{addr}/ws"), WAIT).await?;
    let snapshot = client
        .recv_json_timeout(WAIT)
        .await?
        .expect("registration snapshot");
    assert_eq!(snapshot["type"], "game_state");
    assert_eq!(snapshot["fen"], START_FEN);
    assert_eq!(snapshot["turn"], "white");
    assert_eq!(snapshot["whitePlayer"], "ChatGPT");
    assert_eq!(snapshot["blackPlayer"], "Claude");
    assert_eq!(snapshot["currentPlayer"], "ChatGPT");
    assert_eq!(snapshot["viewerCount"], 1);
    assert!(snapshot["svg"].as_str().unwrap().starts_with("<svg"));
    assert!(snapshot.get("move").is_none());

    let ml = move_loop(
        &state,
        acquirer(
            ScriptedProvider::new(PlayerId::ChatGpt, &[Some("e4")]),
            ScriptedProvider::new(PlayerId::Claude, &[]),
        ),
    );
    assert!(matches!(ml.tick().await, TickOutcome::Played { ref san, .. } if san == "e4"));

    let mv = client.recv_json_timeout(WAIT).await?.expect("move event");
    assert_eq!(mv["type"], "move");
    assert_eq!(mv["move"], "e4");
    assert_eq!(mv["uci"], "e2e4");
    assert_eq!(mv["turn"], "black");
    assert_eq!(mv["currentPlayer"], "Claude");
    assert!(mv["version"].as_u64() > snapshot["version"].as_u64());

    client.close().await?;
    server.stop(true).await;
    Ok(())
}

#[actix_web::test]
async fn client_payloads_are_ignored() -> Result<(), Box<dyn std::error::Error>> {
    let state = arena_state().await?;
    let (server, addr) = start_test_server(state.clone())?;

    let mut client = WebSocketClient::connect_retry(&format!("ws://{addr}/ws"), WAIT).await?;
    let _ = client.recv_json_timeout(WAIT).await?;

    client.send("{not json").await?;
    client.send(r#"{"type":"move","move":"e4"}"#).await?;
    assert!(client.expect_silence(Duration::from_millis(200)).await);

    move_loop(&state, random_only_acquirer()).tick().await;
    let mv = client.recv_json_timeout(WAIT).await?.expect("still connected");
    assert_eq!(mv["type"], "move");

    client.close().await?;
    server.stop(true).await;
    Ok(())
}

#[actix_web::test]
async fn every_viewer_receives_each_move() -> Result<(), Box<dyn std::error::Error>> {
    let state = arena_state().await?;
    let (server, addr) = start_test_server(state.clone())?;
    let url = format!("ws://{addr}/ws");

    let mut first = WebSocketClient::connect_retry(&url, WAIT).await?;
    assert_eq!(first.recv_json_timeout(WAIT).await?.unwrap()["viewerCount"], 1);
    let mut second = WebSocketClient::connect_retry(&url, WAIT).await?;
    assert_eq!(second.recv_json_timeout(WAIT).await?.unwrap()["viewerCount"], 2);

    move_loop(&state, random_only_acquirer()).tick().await;

    let a = first.recv_json_timeout(WAIT).await?.unwrap();
    let b = second.recv_json_timeout(WAIT).await?.unwrap();
    assert_eq!(a, b);
    assert_eq!(a["viewerCount"], 2);

    first.close().await?;
    second.close().await?;
    server.stop(true).await;
    Ok(())
}

#[actix_web::test]
async fn reconnecting_viewer_gets_the_current_position() -> Result<(), Box<dyn std::error::Error>> {
    let state = arena_state().await?;
    let (server, addr) = start_test_server(state.clone())?;
    let url = format!("ws://{addr}/ws");

    let mut client = WebSocketClient::connect_retry(&url, WAIT).await?;
    let _ = client.recv_json_timeout(WAIT).await?;
    client.close().await?;

    let ml = move_loop(&state, random_only_acquirer());
    ml.tick().await;
    ml.tick().await;

    let mut client = WebSocketClient::connect_retry(&url, WAIT).await?;
    let snapshot = client.recv_json_timeout(WAIT).await?.unwrap();
    let (fen, version) = {
        let session = state.session().lock();
        (session.current_position().fen(), session.version())
    };
    assert_eq!(snapshot["type"], "game_state");
    assert_eq!(snapshot["fen"], fen);
    assert_eq!(snapshot["version"], version);
    assert_eq!(snapshot["turn"], "white");

    client.close().await?;
    server.stop(true).await;
    Ok(())
}
