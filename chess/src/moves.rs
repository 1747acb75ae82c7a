use cozy_chess::{Board, Move, Piece};

use crate::types::{Coord, PieceCode, PieceColor, PieceKind};
use crate::uci::{castling_king_destination, format_piece, format_square};

/// A legal move described the way the board UI sees it.
///
/// Castling is shown king-origin to king-destination (e1 → g1) even though the
/// underlying engine move is king-takes-rook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameMove {
    pub from: Coord,
    pub to: Coord,
    pub piece_moved: PieceCode,
    /// `PieceCode::EMPTY` when nothing is captured.
    pub piece_captured: PieceCode,
    pub is_en_passant: bool,
    pub is_castling: bool,
    pub promotion: Option<PieceKind>,
    raw: Move,
}

impl GameMove {
    /// Describe an engine move against the position it will be played from.
    pub fn describe(board: &Board, mv: Move) -> Self {
        let mover_color = board.color_on(mv.from);
        let mover_kind = board.piece_on(mv.from);
        let piece_moved = match (mover_color, mover_kind) {
            (Some(color), Some(kind)) => PieceCode::new(color.into(), kind.into()),
            _ => PieceCode::EMPTY,
        };

        let castle_to = castling_king_destination(board, mv);
        let is_en_passant = mover_kind == Some(Piece::Pawn)
            && mv.from.file() != mv.to.file()
            && board.piece_on(mv.to).is_none();

        let piece_captured = if castle_to.is_some() {
            PieceCode::EMPTY
        } else if is_en_passant {
            match mover_color {
                Some(color) => PieceCode::new(PieceColor::from(color).opponent(), PieceKind::Pawn),
                None => PieceCode::EMPTY,
            }
        } else {
            match (board.color_on(mv.to), board.piece_on(mv.to)) {
                (Some(color), Some(kind)) => PieceCode::new(color.into(), kind.into()),
                _ => PieceCode::EMPTY,
            }
        };

        Self {
            from: Coord::from_square(mv.from),
            to: Coord::from_square(castle_to.unwrap_or(mv.to)),
            piece_moved,
            piece_captured,
            is_en_passant,
            is_castling: castle_to.is_some(),
            promotion: mv.promotion.map(PieceKind::from),
            raw: mv,
        }
    }

    /// Origin/destination equality, the only comparison the board UI makes.
    pub fn matches(&self, from: Coord, to: Coord) -> bool {
        self.from == from && self.to == to
    }

    /// The engine-level move this describes.
    pub fn raw(&self) -> Move {
        self.raw
    }

    pub fn is_capture(&self) -> bool {
        !self.piece_captured.is_empty()
    }

    /// Promotion to anything other than a queen.
    pub fn is_underpromotion(&self) -> bool {
        matches!(self.promotion, Some(kind) if kind != PieceKind::Queen)
    }

    /// Square the captured piece stood on. Differs from the destination only
    /// for en passant, where it is one row back toward the capturer's origin.
    pub fn capture_square(&self) -> Option<Coord> {
        if !self.is_capture() {
            return None;
        }
        if !self.is_en_passant {
            return Some(self.to);
        }
        Some(Coord::new(self.from.row, self.to.col))
    }

    /// Standard UCI move text (e2e4, e1g1, e7e8q).
    pub fn uci(&self) -> String {
        let (Some(from), Some(to)) = (self.from.to_square(), self.to.to_square()) else {
            return "0000".to_string();
        };
        let mut s = format!("{}{}", format_square(from), format_square(to));
        if let Some(kind) = self.promotion {
            s.push(format_piece(kind.into()));
        }
        s
    }

    /// Resolve standard UCI text against a list of legal moves.
    pub fn find_uci<'a>(moves: &'a [GameMove], text: &str) -> Option<&'a GameMove> {
        moves.iter().find(|mv| mv.uci() == text)
    }
}

impl std::fmt::Display for GameMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.uci())
    }
}
