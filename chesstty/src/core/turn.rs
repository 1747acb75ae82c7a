use chess::PieceColor;

/// Who controls each side. Fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatConfig {
    pub white_is_human: bool,
    pub black_is_human: bool,
}

impl SeatConfig {
    pub const fn new(white_is_human: bool, black_is_human: bool) -> Self {
        Self {
            white_is_human,
            black_is_human,
        }
    }

    pub const fn human_vs_human() -> Self {
        Self::new(true, true)
    }

    pub const fn engine_vs_engine() -> Self {
        Self::new(false, false)
    }

    /// The human plays `side`, the engine plays the other.
    pub fn human_as(side: PieceColor) -> Self {
        match side {
            PieceColor::White => Self::new(true, false),
            PieceColor::Black => Self::new(false, true),
        }
    }

    pub fn is_human(&self, side: PieceColor) -> bool {
        match side {
            PieceColor::White => self.white_is_human,
            PieceColor::Black => self.black_is_human,
        }
    }

    pub fn label(&self, side: PieceColor) -> &'static str {
        if self.is_human(side) {
            "Human"
        } else {
            "Engine"
        }
    }
}

/// Whether `side_to_move` is human-controlled.
pub fn is_human_turn(seats: &SeatConfig, side_to_move: PieceColor) -> bool {
    seats.is_human(side_to_move)
}
