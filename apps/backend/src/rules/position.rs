use std::str::FromStr;

use chess::{Board, BoardStatus, ChessMove, Color, File, MoveGen, Piece, Rank, Square};

use super::notation::{self, piece_letter};
use super::{DrawReason, LegalMove, Outcome, RulesError, Side};

/// Halfmove clock value (150 plies = 75 moves) at which the game is drawn.
const SEVENTY_FIVE_MOVE_PLIES: u32 = 150;
const FIVEFOLD: usize = 5;

/// A game in progress: the board plus everything FEN and draw detection
/// need that the board itself does not track.
#[derive(Debug, Clone)]
pub struct Position {
    board: Board,
    halfmove_clock: u32,
    fullmove_number: u32,
    start_fullmove: u32,
    start_side: Side,
    /// Zobrist hashes of every position reached, current one last.
    seen: Vec<u64>,
    san_history: Vec<String>,
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl Position {
    /// Standard starting position.
    pub fn new() -> Self {
        Self::from_board(Board::default(), 0, 1)
    }

    pub fn from_fen(fen: &str) -> Result<Self, RulesError> {
        let board = Board::from_str(fen).map_err(|e| RulesError::InvalidFen(e.to_string()))?;
        let mut fields = fen.split_whitespace().skip(4);
        let halfmove = fields.next().and_then(|f| f.parse().ok()).unwrap_or(0);
        let fullmove = fields
            .next()
            .and_then(|f| f.parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(1);
        Ok(Self::from_board(board, halfmove, fullmove))
    }

    fn from_board(board: Board, halfmove_clock: u32, fullmove_number: u32) -> Self {
        Self {
            halfmove_clock,
            fullmove_number,
            start_fullmove: fullmove_number,
            start_side: board.side_to_move().into(),
            seen: vec![board.get_hash()],
            san_history: Vec::new(),
            board,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Side {
        self.board.side_to_move().into()
    }

    /// Number of plies played since this position was created.
    pub fn ply_count(&self) -> usize {
        self.san_history.len()
    }

    pub fn legal_moves(&self) -> Vec<LegalMove> {
        MoveGen::new_legal(&self.board)
            .map(|mv| LegalMove {
                chess_move: mv,
                san: notation::san(&self.board, mv),
                uci: notation::uci(mv),
            })
            .collect()
    }

    /// Play `mv`, returning its SAN.
    pub fn apply(&mut self, mv: ChessMove) -> Result<String, RulesError> {
        if !self.board.legal(mv) {
            return Err(RulesError::IllegalMove {
                uci: notation::uci(mv),
                fen: self.fen(),
            });
        }

        let san = notation::san(&self.board, mv);
        let resets_clock = self.board.piece_on(mv.get_source()) == Some(Piece::Pawn)
            || self.board.piece_on(mv.get_dest()).is_some();
        let mover = self.board.side_to_move();

        self.board = self.board.make_move_new(mv);
        self.halfmove_clock = if resets_clock {
            0
        } else {
            self.halfmove_clock + 1
        };
        if mover == Color::Black {
            self.fullmove_number += 1;
        }
        self.seen.push(self.board.get_hash());
        self.san_history.push(san.clone());

        Ok(san)
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.board.status() {
            BoardStatus::Checkmate => {
                return Some(match self.side_to_move() {
                    Side::White => Outcome::BlackWins,
                    Side::Black => Outcome::WhiteWins,
                });
            }
            BoardStatus::Stalemate => return Some(Outcome::Draw(DrawReason::Stalemate)),
            BoardStatus::Ongoing => {}
        }

        if insufficient_material(&self.board) {
            return Some(Outcome::Draw(DrawReason::InsufficientMaterial));
        }
        let current = self.board.get_hash();
        if self.seen.iter().filter(|h| **h == current).count() >= FIVEFOLD {
            return Some(Outcome::Draw(DrawReason::FivefoldRepetition));
        }
        if self.halfmove_clock >= SEVENTY_FIVE_MOVE_PLIES {
            return Some(Outcome::Draw(DrawReason::SeventyFiveMoveRule));
        }
        None
    }

    /// Forsyth–Edwards notation of the current position.
    pub fn fen(&self) -> String {
        let mut fen = String::with_capacity(90);

        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                let sq = Square::make_square(Rank::from_index(rank), File::from_index(file));
                match (self.board.piece_on(sq), self.board.color_on(sq)) {
                    (Some(piece), Some(color)) => {
                        if empty > 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0;
                        }
                        let letter = piece_letter(piece);
                        fen.push(if color == Color::White {
                            letter
                        } else {
                            letter.to_ascii_lowercase()
                        });
                    }
                    _ => empty += 1,
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.side_to_move() {
            Side::White => 'w',
            Side::Black => 'b',
        });

        fen.push(' ');
        let white = self.board.castle_rights(Color::White);
        let black = self.board.castle_rights(Color::Black);
        let mut castling = String::new();
        if white.has_kingside() {
            castling.push('K');
        }
        if white.has_queenside() {
            castling.push('Q');
        }
        if black.has_kingside() {
            castling.push('k');
        }
        if black.has_queenside() {
            castling.push('q');
        }
        if castling.is_empty() {
            castling.push('-');
        }
        fen.push_str(&castling);

        fen.push(' ');
        match self.en_passant_target() {
            Some(sq) => fen.push_str(&sq.to_string()),
            None => fen.push('-'),
        }

        fen.push_str(&format!(
            " {} {}",
            self.halfmove_clock, self.fullmove_number
        ));
        fen
    }

    /// The board reports the capturable pawn; FEN wants the square behind it.
    fn en_passant_target(&self) -> Option<Square> {
        let pawn = self.board.en_passant()?;
        let rank = match self.side_to_move() {
            Side::White => pawn.get_rank().to_index() + 1,
            Side::Black => pawn.get_rank().to_index().checked_sub(1)?,
        };
        Some(Square::make_square(Rank::from_index(rank), pawn.get_file()))
    }

    /// PGN movetext, with the result token appended when the game is over.
    pub fn pgn_movetext(&self) -> String {
        let mut parts = Vec::with_capacity(self.san_history.len() * 2);
        let mut number = self.start_fullmove;
        let mut side = self.start_side;

        for (i, san) in self.san_history.iter().enumerate() {
            match side {
                Side::White => parts.push(format!("{number}. {san}")),
                Side::Black if i == 0 => parts.push(format!("{number}... {san}")),
                Side::Black => parts.push(san.clone()),
            }
            if side == Side::Black {
                number += 1;
            }
            side = side.opponent();
        }

        if let Some(outcome) = self.outcome() {
            parts.push(outcome.result_token().to_string());
        }
        parts.join(" ")
    }
}

fn insufficient_material(board: &Board) -> bool {
    let heavy = *board.pieces(Piece::Pawn) | *board.pieces(Piece::Rook) | *board.pieces(Piece::Queen);
    if heavy.popcnt() > 0 {
        return false;
    }

    let knights = board.pieces(Piece::Knight).popcnt();
    let bishops = *board.pieces(Piece::Bishop);
    if knights + bishops.popcnt() <= 1 {
        return true;
    }
    if knights > 0 {
        return false;
    }

    // Only bishops left: drawn when they all stand on one square color.
    let mut colors = bishops.map(|sq| (sq.get_rank().to_index() + sq.get_file().to_index()) % 2);
    match colors.next() {
        Some(first) => colors.all(|c| c == first),
        None => true,
    }
}
