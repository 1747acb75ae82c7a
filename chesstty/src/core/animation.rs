//! Frame-by-frame slide of a committed move.

use chess::{Coord, GameMove, PieceCode};

pub const DEFAULT_FRAMES_PER_SQUARE: u32 = 10;

/// Upper bound accepted from configuration.
pub const MAX_FRAMES_PER_SQUARE: u32 = 60;

/// Everything needed to draw one animation frame
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationFrame {
    /// Board after the move.
    pub board: [[PieceCode; 8]; 8],
    pub piece: PieceCode,
    /// Interpolated position, in squares.
    pub row: f32,
    pub col: f32,
    /// Destination square, drawn empty underneath the moving piece.
    pub mask: Coord,
    /// Captured piece and the square it is drawn on until the slide ends.
    pub captured: Option<(PieceCode, Coord)>,
    pub index: u32,
    pub total_frames: u32,
}

/// A move being animated. Yields `total_frames + 1` frames, then is done.
#[derive(Debug, Clone)]
pub struct AnimationJob {
    mv: GameMove,
    board: [[PieceCode; 8]; 8],
    frame_cursor: u32,
    total_frames: u32,
}

impl AnimationJob {
    /// `board` is the grid after the move was played.
    pub fn new(mv: GameMove, board: [[PieceCode; 8]; 8], frames_per_square: u32) -> Self {
        Self {
            mv,
            board,
            frame_cursor: 0,
            total_frames: total_frames(&mv, frames_per_square),
        }
    }

    pub fn mv(&self) -> &GameMove {
        &self.mv
    }

    pub fn total_frames(&self) -> u32 {
        self.total_frames
    }

    pub fn frame_cursor(&self) -> u32 {
        self.frame_cursor
    }

    pub fn is_finished(&self) -> bool {
        self.frame_cursor > self.total_frames
    }

    pub fn next_frame(&mut self) -> Option<AnimationFrame> {
        if self.is_finished() {
            return None;
        }

        let index = self.frame_cursor;
        self.frame_cursor += 1;

        let progress = if self.total_frames == 0 {
            1.0
        } else {
            index as f32 / self.total_frames as f32
        };
        let d_row = self.mv.to.row as f32 - self.mv.from.row as f32;
        let d_col = self.mv.to.col as f32 - self.mv.from.col as f32;

        Some(AnimationFrame {
            board: self.board,
            piece: self.mv.piece_moved,
            row: self.mv.from.row as f32 + d_row * progress,
            col: self.mv.from.col as f32 + d_col * progress,
            mask: self.mv.to,
            captured: self
                .mv
                .capture_square()
                .map(|square| (self.mv.piece_captured, square)),
            index,
            total_frames: self.total_frames,
        })
    }
}

/// `(|Δrow| + |Δcol|) × frames_per_square`
pub fn total_frames(mv: &GameMove, frames_per_square: u32) -> u32 {
    u32::from(mv.from.distance(mv.to)).saturating_mul(frames_per_square)
}
