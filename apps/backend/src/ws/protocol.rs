use serde::{Deserialize, Serialize};

use crate::ai::PlayerId;
use crate::rules::Side;
use crate::session::{PlayedMove, SessionSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Full state: sent on registration and after a new game starts.
    GameState,
    /// One ply was played.
    Move,
}

/// One server-to-viewer message. Built once per broadcast and shared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub version: u64,
    pub fen: String,
    pub turn: Side,
    pub svg: String,
    pub viewer_count: usize,
    pub white_player: PlayerId,
    pub black_player: PlayerId,
    pub current_player: PlayerId,
    #[serde(rename = "move", default, skip_serializing_if = "Option::is_none")]
    pub san: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uci: Option<String>,
}

impl StateEvent {
    pub fn full_state(snapshot: &SessionSnapshot, viewer_count: usize) -> Self {
        Self {
            kind: EventKind::GameState,
            version: snapshot.version,
            fen: snapshot.fen.clone(),
            turn: snapshot.turn,
            svg: snapshot.svg.clone(),
            viewer_count,
            white_player: snapshot.white,
            black_player: snapshot.black,
            current_player: snapshot.current_player,
            san: None,
            uci: None,
        }
    }

    pub fn move_applied(
        snapshot: &SessionSnapshot,
        played: &PlayedMove,
        viewer_count: usize,
    ) -> Self {
        Self {
            kind: EventKind::Move,
            san: Some(played.san.clone()),
            uci: Some(played.uci.clone()),
            ..Self::full_state(snapshot, viewer_count)
        }
    }
}
