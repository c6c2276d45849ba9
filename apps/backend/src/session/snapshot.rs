use uuid::Uuid;

use crate::ai::PlayerId;
use crate::rules::Side;

/// Everything a viewer event needs from the session, captured under the
/// session lock and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub version: u64,
    pub fen: String,
    pub turn: Side,
    pub svg: String,
    pub white: PlayerId,
    pub black: PlayerId,
    /// Provider to move next.
    pub current_player: PlayerId,
    pub ply: usize,
}

/// The ply a move-applied event announces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayedMove {
    pub san: String,
    pub uci: String,
}
