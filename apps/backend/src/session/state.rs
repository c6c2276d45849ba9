use std::sync::Arc;

use parking_lot::Mutex;
use rand::Rng;
use time::OffsetDateTime;
use uuid::Uuid;

use super::snapshot::SessionSnapshot;
use crate::ai::PlayerId;
use crate::render::{self, ColorScheme};
use crate::repos::games::NewGameRecord;
use crate::rules::{ChessMove, LegalMove, Outcome, Position, RulesError, Side};

/// The one live session, shared between the move loop and the hub.
pub type SharedSession = Arc<Mutex<Session>>;

/// Which provider plays which color. The two are always distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideAssignment {
    white: PlayerId,
    black: PlayerId,
}

impl SideAssignment {
    pub fn new(white: PlayerId) -> Self {
        Self {
            white,
            black: white.other(),
        }
    }

    /// Coin flip for white.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            Self::new(PlayerId::ChatGpt)
        } else {
            Self::new(PlayerId::Claude)
        }
    }

    pub fn white(&self) -> PlayerId {
        self.white
    }

    pub fn black(&self) -> PlayerId {
        self.black
    }

    pub fn player_for(&self, side: Side) -> PlayerId {
        match side {
            Side::White => self.white,
            Side::Black => self.black,
        }
    }
}

/// A single game: position, pairing, and when it began.
///
/// `version` grows by one on every ply and on every replacement, so any two
/// snapshots taken from the live session can be ordered.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    position: Position,
    sides: SideAssignment,
    started_at: OffsetDateTime,
    version: u64,
}

impl Session {
    /// A fresh game with a random pairing.
    pub fn start() -> Self {
        Self::with_sides(SideAssignment::random(&mut rand::rng()), 1)
    }

    pub fn with_sides(sides: SideAssignment, version: u64) -> Self {
        Self::from_position(Position::new(), sides, version)
    }

    pub fn from_position(position: Position, sides: SideAssignment, version: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            sides,
            started_at: OffsetDateTime::now_utc(),
            version,
        }
    }

    /// The session that replaces this one: new id, new pairing, new clock.
    pub fn start_new(&self) -> Self {
        Self::with_sides(
            SideAssignment::random(&mut rand::rng()),
            self.version + 1,
        )
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn sides(&self) -> SideAssignment {
        self.sides
    }

    pub fn started_at(&self) -> OffsetDateTime {
        self.started_at
    }

    pub fn current_position(&self) -> &Position {
        &self.position
    }

    pub fn valid_moves(&self) -> Vec<LegalMove> {
        self.position.legal_moves()
    }

    /// Provider whose turn it is.
    pub fn mover(&self) -> PlayerId {
        self.sides.player_for(self.position.side_to_move())
    }

    /// Play `mv` and return its SAN.
    pub fn apply_move(&mut self, mv: ChessMove) -> Result<String, RulesError> {
        let san = self.position.apply(mv)?;
        self.version += 1;
        Ok(san)
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.position.outcome()
    }

    pub fn snapshot(&self, scheme: &ColorScheme) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            version: self.version,
            fen: self.position.fen(),
            turn: self.position.side_to_move(),
            svg: render::render(&self.position, scheme),
            white: self.sides.white,
            black: self.sides.black,
            current_player: self.mover(),
            ply: self.position.ply_count(),
        }
    }

    /// History row for this session once it has ended.
    pub fn finished_record(&self, outcome: Outcome, ended_at: OffsetDateTime) -> NewGameRecord {
        NewGameRecord {
            white_player: self.sides.white.to_string(),
            black_player: self.sides.black.to_string(),
            winner: outcome
                .winner()
                .map(|side| self.sides.player_for(side).to_string()),
            outcome: outcome.result_token().to_string(),
            started_at: self.started_at,
            ended_at,
            total_moves: i32::try_from(self.position.ply_count()).unwrap_or(i32::MAX),
            pgn: self.position.pgn_movetext(),
        }
    }
}
