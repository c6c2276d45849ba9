//! SAN and UCI rendering of moves.

use chess::{Board, BoardStatus, ChessMove, MoveGen, Piece, Square};

/// Long algebraic (UCI) form, e.g. `e2e4`, `e7e8q`.
pub fn uci(mv: ChessMove) -> String {
    mv.to_string()
}

/// Standard algebraic notation for `mv` played from `board`.
///
/// `mv` must be legal in `board`; for anything else the UCI form is returned.
pub fn san(board: &Board, mv: ChessMove) -> String {
    let src = mv.get_source();
    let dst = mv.get_dest();
    let Some(piece) = board.piece_on(src) else {
        return uci(mv);
    };

    let mut out = String::with_capacity(8);

    if piece == Piece::King && file_distance(src, dst) == 2 {
        if dst.get_file().to_index() > src.get_file().to_index() {
            out.push_str("O-O");
        } else {
            out.push_str("O-O-O");
        }
    } else {
        // A pawn changing file is always a capture, en passant included.
        let capture = board.piece_on(dst).is_some()
            || (piece == Piece::Pawn && src.get_file() != dst.get_file());

        if piece == Piece::Pawn {
            if capture {
                out.push(file_char(src));
                out.push('x');
            }
            out.push_str(&dst.to_string());
            if let Some(promotion) = mv.get_promotion() {
                out.push('=');
                out.push(piece_letter(promotion));
            }
        } else {
            out.push(piece_letter(piece));
            out.push_str(&disambiguation(board, mv, piece));
            if capture {
                out.push('x');
            }
            out.push_str(&dst.to_string());
        }
    }

    let next = board.make_move_new(mv);
    if next.status() == BoardStatus::Checkmate {
        out.push('#');
    } else if next.checkers().popcnt() > 0 {
        out.push('+');
    }

    out
}

fn disambiguation(board: &Board, mv: ChessMove, piece: Piece) -> String {
    let src = mv.get_source();
    let rivals: Vec<Square> = MoveGen::new_legal(board)
        .filter(|other| {
            other.get_dest() == mv.get_dest()
                && other.get_source() != src
                && board.piece_on(other.get_source()) == Some(piece)
        })
        .map(|other| other.get_source())
        .collect();

    if rivals.is_empty() {
        return String::new();
    }

    let shares_file = rivals.iter().any(|sq| sq.get_file() == src.get_file());
    let shares_rank = rivals.iter().any(|sq| sq.get_rank() == src.get_rank());

    if !shares_file {
        file_char(src).to_string()
    } else if !shares_rank {
        rank_char(src).to_string()
    } else {
        src.to_string()
    }
}

fn file_distance(a: Square, b: Square) -> usize {
    a.get_file().to_index().abs_diff(b.get_file().to_index())
}

fn file_char(sq: Square) -> char {
    (b'a' + sq.get_file().to_index() as u8) as char
}

fn rank_char(sq: Square) -> char {
    (b'1' + sq.get_rank().to_index() as u8) as char
}

pub(crate) fn piece_letter(piece: Piece) -> char {
    match piece {
        Piece::Pawn => 'P',
        Piece::Knight => 'N',
        Piece::Bishop => 'B',
        Piece::Rook => 'R',
        Piece::Queen => 'Q',
        Piece::King => 'K',
    }
}
