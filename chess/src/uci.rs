//! UCI (Universal Chess Interface) notation helpers

use cozy_chess::{Board, File, Move, Piece, Rank, Square};

/// Detect cozy-chess castling (king-takes-own-rook) and return the square the
/// king actually lands on.
///
/// cozy_chess uses king-to-rook notation: e1h1, e1a1, e8h8, e8a8
/// UCI and the board UI use standard notation: e1g1, e1c1, e8g8, e8c8
pub fn castling_king_destination(board: &Board, mv: Move) -> Option<Square> {
    if board.piece_on(mv.from) != Some(Piece::King) {
        return None;
    }
    if board.color_on(mv.to) != board.color_on(mv.from) {
        return None;
    }
    let file = if mv.to.file() as usize > mv.from.file() as usize {
        File::G
    } else {
        File::C
    };
    Some(Square::new(file, mv.from.rank()))
}

/// Format a square in algebraic notation (e.g., "e4")
pub fn format_square(sq: Square) -> String {
    let file = (b'a' + sq.file() as u8) as char;
    let rank = (b'1' + sq.rank() as u8) as char;
    format!("{}{}", file, rank)
}

/// Parse a square in algebraic notation
pub fn parse_square(s: &str) -> Option<Square> {
    let mut chars = s.chars();
    let file = match chars.next()? {
        c @ 'a'..='h' => File::index((c as u8 - b'a') as usize),
        _ => return None,
    };
    let rank = match chars.next()? {
        c @ '1'..='8' => Rank::index((c as u8 - b'1') as usize),
        _ => return None,
    };
    if chars.next().is_some() {
        return None;
    }
    Some(Square::new(file, rank))
}

/// Promotion suffix used by UCI move text
pub fn format_piece(piece: Piece) -> char {
    match piece {
        Piece::Pawn => 'p',
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::King => 'k',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_and_parse_square() {
        let e4 = Square::new(File::E, Rank::Fourth);
        assert_eq!(format_square(e4), "e4");
        assert_eq!(parse_square("e4"), Some(e4));
        assert_eq!(parse_square("h8"), Some(Square::new(File::H, Rank::Eighth)));
        assert_eq!(parse_square("i1"), None);
        assert_eq!(parse_square("e9"), None);
        assert_eq!(parse_square("e44"), None);
    }

    #[test]
    fn test_castling_destination() {
        let board: Board = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();
        let kingside = Move {
            from: Square::new(File::E, Rank::First),
            to: Square::new(File::H, Rank::First),
            promotion: None,
        };
        let queenside = Move {
            from: Square::new(File::E, Rank::First),
            to: Square::new(File::A, Rank::First),
            promotion: None,
        };
        assert_eq!(
            castling_king_destination(&board, kingside),
            Some(Square::new(File::G, Rank::First))
        );
        assert_eq!(
            castling_king_destination(&board, queenside),
            Some(Square::new(File::C, Rank::First))
        );
    }

    #[test]
    fn test_plain_king_move_is_not_castling() {
        let board: Board = "4k3/8/8/8/8/8/8/4K3 w - - 0 1".parse().unwrap();
        let mv = Move {
            from: Square::new(File::E, Rank::First),
            to: Square::new(File::F, Rank::First),
            promotion: None,
        };
        assert_eq!(castling_king_destination(&board, mv), None);
    }
}
