//! Chess rules adapter.
//!
//! Wraps the `chess` crate behind the handful of operations the arena needs:
//! legal move enumeration, move application, terminal outcome detection and
//! the two notations (SAN for people and providers, UCI for machines).

mod notation;
mod position;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use chess::ChessMove;
pub use notation::{san, uci};
pub use position::Position;

/// Errors raised by the rules adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RulesError {
    #[error("illegal move {uci} in position {fen}")]
    IllegalMove { uci: String, fen: String },
    #[error("invalid FEN: {0}")]
    InvalidFen(String),
}

/// Side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }
}

impl From<chess::Color> for Side {
    fn from(color: chess::Color) -> Self {
        match color {
            chess::Color::White => Side::White,
            chess::Color::Black => Side::Black,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawReason {
    Stalemate,
    InsufficientMaterial,
    FivefoldRepetition,
    SeventyFiveMoveRule,
}

/// Terminal outcome of a game. A game in progress has no outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    WhiteWins,
    BlackWins,
    Draw(DrawReason),
}

impl Outcome {
    pub fn winner(self) -> Option<Side> {
        match self {
            Outcome::WhiteWins => Some(Side::White),
            Outcome::BlackWins => Some(Side::Black),
            Outcome::Draw(_) => None,
        }
    }

    /// PGN result token.
    pub fn result_token(self) -> &'static str {
        match self {
            Outcome::WhiteWins => "1-0",
            Outcome::BlackWins => "0-1",
            Outcome::Draw(_) => "1/2-1/2",
        }
    }

    pub fn method(self) -> &'static str {
        match self {
            Outcome::WhiteWins | Outcome::BlackWins => "checkmate",
            Outcome::Draw(DrawReason::Stalemate) => "stalemate",
            Outcome::Draw(DrawReason::InsufficientMaterial) => "insufficient_material",
            Outcome::Draw(DrawReason::FivefoldRepetition) => "fivefold_repetition",
            Outcome::Draw(DrawReason::SeventyFiveMoveRule) => "seventy_five_move_rule",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.result_token(), self.method())
    }
}

/// A legal move together with both of its canonical spellings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegalMove {
    pub chess_move: ChessMove,
    pub san: String,
    pub uci: String,
}

/// A legal-move set that is known to contain at least one move.
#[derive(Debug, Clone)]
pub struct LegalMoves(Vec<LegalMove>);

impl LegalMoves {
    /// Returns `None` for an empty set.
    pub fn new(moves: Vec<LegalMove>) -> Option<Self> {
        if moves.is_empty() {
            None
        } else {
            Some(Self(moves))
        }
    }

    pub fn as_slice(&self) -> &[LegalMove] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn san_list(&self) -> Vec<String> {
        self.0.iter().map(|m| m.san.clone()).collect()
    }

    /// Keep only the moves whose SAN is in `sans`. Returns `None` if nothing survives.
    pub fn restricted_to(&self, sans: &[&str]) -> Option<Self> {
        Self::new(
            self.0
                .iter()
                .filter(|m| sans.contains(&m.san.as_str()))
                .cloned()
                .collect(),
        )
    }
}
