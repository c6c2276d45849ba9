//! SVG board snapshots for viewers.

use std::fmt::{self, Write};

use chess::{Color, File, Piece, Rank, Square};

use crate::rules::Position;

const SQUARE: u32 = 45;
const BOARD: u32 = SQUARE * 8;

/// Two-color square scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorScheme {
    pub light: String,
    pub dark: String,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            light: "white".to_string(),
            dark: "#D97757".to_string(),
        }
    }
}

/// Render the board as an SVG document, white at the bottom.
pub fn render_svg(position: &Position, scheme: &ColorScheme) -> Result<String, fmt::Error> {
    let board = position.board();
    let mut svg = String::with_capacity(8 * 1024);

    write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {BOARD} {BOARD}" width="{BOARD}" height="{BOARD}">"#
    )?;

    for rank in 0..8 {
        for file in 0..8 {
            let x = file as u32 * SQUARE;
            let y = (7 - rank) as u32 * SQUARE;
            // a1 is dark
            let fill = if (rank + file) % 2 == 0 {
                &scheme.dark
            } else {
                &scheme.light
            };
            write!(
                svg,
                r#"<rect x="{x}" y="{y}" width="{SQUARE}" height="{SQUARE}" fill="{fill}"/>"#
            )?;

            let sq = Square::make_square(Rank::from_index(rank), File::from_index(file));
            if let (Some(piece), Some(color)) = (board.piece_on(sq), board.color_on(sq)) {
                write!(
                    svg,
                    r#"<text x="{cx}" y="{cy}" font-size="36" text-anchor="middle" dominant-baseline="central">{glyph}</text>"#,
                    cx = x + SQUARE / 2,
                    cy = y + SQUARE / 2,
                    glyph = glyph(piece, color),
                )?;
            }
        }
    }

    svg.write_str("</svg>")?;
    Ok(svg)
}

/// Like [`render_svg`], but degrades to an empty snapshot on failure.
pub fn render(position: &Position, scheme: &ColorScheme) -> String {
    match render_svg(position, scheme) {
        Ok(svg) => svg,
        Err(e) => {
            tracing::error!(error = %e, fen = %position.fen(), "board render failed");
            String::new()
        }
    }
}

fn glyph(piece: Piece, color: Color) -> char {
    match (color, piece) {
        (Color::White, Piece::King) => '♔',
        (Color::White, Piece::Queen) => '♕',
        (Color::White, Piece::Rook) => '♖',
        (Color::White, Piece::Bishop) => '♗',
        (Color::White, Piece::Knight) => '♘',
        (Color::White, Piece::Pawn) => '♙',
        (Color::Black, Piece::King) => '♚',
        (Color::Black, Piece::Queen) => '♛',
        (Color::Black, Piece::Rook) => '♜',
        (Color::Black, Piece::Bishop) => '♝',
        (Color::Black, Piece::Knight) => '♞',
        (Color::Black, Piece::Pawn) => '♟',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_full_board() {
        let svg = render(&Position::new(), &ColorScheme::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<rect").count(), 64);
        assert_eq!(svg.matches("<text").count(), 32);
        assert_eq!(svg.matches("fill=\"#D97757\"").count(), 32);
        assert!(svg.contains('♔'));
        assert!(svg.contains('♚'));
    }

    #[test]
    fn custom_scheme_is_used() {
        let scheme = ColorScheme {
            light: "#eee".to_string(),
            dark: "#333".to_string(),
        };
        let svg = render(&Position::new(), &scheme);
        assert_eq!(svg.matches("fill=\"#333\"").count(), 32);
        assert!(!svg.contains("#D97757"));
    }

    #[test]
    fn sparse_board_has_fewer_pieces() {
        let position = Position::from_fen("8/8/4k3/8/8/3K4/8/8 w - - 0 1").unwrap();
        let svg = render(&position, &ColorScheme::default());
        assert_eq!(svg.matches("<text").count(), 2);
    }
}
