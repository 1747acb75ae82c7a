use cozy_chess::Board;

use crate::moves::GameMove;
use crate::types::{Coord, PieceCode, PieceColor, PieceKind};

/// Main game state wrapper around cozy-chess Board
#[derive(Debug, Clone)]
pub struct Game {
    position: Board,
    history: Vec<HistoryEntry>,
    start_position: StartPosition,
}

/// A played move together with its notation
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub mv: GameMove,
    pub san: String,
}

/// Starting position of the game
#[derive(Debug, Clone, PartialEq)]
pub enum StartPosition {
    Standard,
    Fen(String),
}

/// End-of-game condition read after every committed move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminalState {
    #[default]
    None,
    Checkmate {
        winner: PieceColor,
    },
    Stalemate,
}

impl TerminalState {
    pub fn is_over(self) -> bool {
        !matches!(self, TerminalState::None)
    }

    /// Text shown on the board once the game has ended.
    pub fn message(self) -> Option<String> {
        match self {
            TerminalState::None => None,
            TerminalState::Checkmate { winner } => {
                Some(format!("{} wins by checkmate", winner.title()))
            }
            TerminalState::Stalemate => Some("Stalemate".to_string()),
        }
    }
}

impl Game {
    /// Create a new game from the standard starting position
    pub fn new() -> Self {
        Self {
            position: Board::default(),
            history: Vec::new(),
            start_position: StartPosition::Standard,
        }
    }

    /// Create a game from a FEN string
    pub fn from_fen(fen: &str) -> Result<Self, GameError> {
        let position = crate::fen::parse_fen(fen)?;
        Ok(Self {
            position,
            history: Vec::new(),
            start_position: StartPosition::Fen(fen.to_string()),
        })
    }

    /// Get the current board position
    pub fn position(&self) -> &Board {
        &self.position
    }

    /// Get the move history
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn last_move(&self) -> Option<&GameMove> {
        self.history.last().map(|entry| &entry.mv)
    }

    pub fn start_position(&self) -> &StartPosition {
        &self.start_position
    }

    /// Make a move on the board
    pub fn make_move(&mut self, mv: &GameMove) -> Result<&HistoryEntry, GameError> {
        let raw = mv.raw();
        let mut next = self.position.clone();
        next.try_play(raw).map_err(|_| GameError::IllegalMove)?;

        // Re-describe against the live position so history never carries a
        // description taken from some other board.
        let described = GameMove::describe(&self.position, raw);
        let san = generate_san(&described);
        self.position = next;
        self.history.push(HistoryEntry { mv: described, san });

        self.history.last().ok_or(GameError::IllegalMove)
    }

    /// Undo the last move
    pub fn undo(&mut self) -> Result<GameMove, GameError> {
        let entry = self.history.pop().ok_or(GameError::NothingToUndo)?;
        self.rebuild_position()?;
        Ok(entry.mv)
    }

    /// All legal moves for the side to move.
    ///
    /// Engine enumeration order is kept, except that under-promotions are
    /// moved behind every other move: a click pair that matches several
    /// promotions therefore resolves to the queen.
    pub fn legal_moves(&self) -> Vec<GameMove> {
        let mut raw = Vec::new();
        self.position.generate_moves(|mvs| {
            raw.extend(mvs);
            false
        });
        let mut moves: Vec<GameMove> = raw
            .into_iter()
            .map(|mv| GameMove::describe(&self.position, mv))
            .collect();
        moves.sort_by_key(GameMove::is_underpromotion);
        moves
    }

    /// Checkmate / stalemate detection
    pub fn terminal(&self) -> TerminalState {
        let has_moves = self.position.generate_moves(|_| true);
        if has_moves {
            TerminalState::None
        } else if self.position.checkers().is_empty() {
            TerminalState::Stalemate
        } else {
            TerminalState::Checkmate {
                winner: self.side_to_move().opponent(),
            }
        }
    }

    /// Get the side to move
    pub fn side_to_move(&self) -> PieceColor {
        self.position.side_to_move().into()
    }

    pub fn piece_at(&self, coord: Coord) -> PieceCode {
        let Some(square) = coord.to_square() else {
            return PieceCode::EMPTY;
        };
        match (self.position.color_on(square), self.position.piece_on(square)) {
            (Some(color), Some(piece)) => PieceCode::new(color.into(), piece.into()),
            _ => PieceCode::EMPTY,
        }
    }

    /// The 8x8 grid of piece codes, row 0 being rank 8.
    pub fn grid(&self) -> [[PieceCode; 8]; 8] {
        let mut grid = [[PieceCode::EMPTY; 8]; 8];
        for (row, cells) in grid.iter_mut().enumerate() {
            for (col, cell) in cells.iter_mut().enumerate() {
                *cell = self.piece_at(Coord::new(row as u16, col as u16));
            }
        }
        grid
    }

    /// Export position to FEN string
    pub fn to_fen(&self) -> String {
        crate::fen::format_fen(&self.position)
    }

    /// Rebuild position from start + history (for undo)
    fn rebuild_position(&mut self) -> Result<(), GameError> {
        let mut board = match &self.start_position {
            StartPosition::Standard => Board::default(),
            StartPosition::Fen(fen) => crate::fen::parse_fen(fen)?,
        };

        for entry in &self.history {
            board
                .try_play(entry.mv.raw())
                .map_err(|_| GameError::IllegalMove)?;
        }

        self.position = board;
        Ok(())
    }
}

/// Generate simplified SAN notation for a move
fn generate_san(mv: &GameMove) -> String {
    if mv.is_castling {
        return if mv.to.col == 6 { "O-O" } else { "O-O-O" }.to_string();
    }

    let mut san = String::new();
    let uci = mv.uci();

    match mv.piece_moved.kind() {
        Some(PieceKind::Pawn) | None => {
            // Pawn captures include the file
            if mv.is_capture() {
                san.push_str(&uci[0..1]);
            }
        }
        Some(kind) => san.push(kind.to_char_upper()),
    }

    if mv.is_capture() {
        san.push('x');
    }

    san.push_str(&uci[2..4]);

    if let Some(promo) = mv.promotion {
        san.push('=');
        san.push(promo.to_char_upper());
    }

    san
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("Illegal move")]
    IllegalMove,
    #[error("Nothing to undo")]
    NothingToUndo,
    #[error("FEN parse error: {0}")]
    Fen(#[from] crate::fen::FenError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(game: &Game, from: Coord, to: Coord) -> GameMove {
        *game
            .legal_moves()
            .iter()
            .find(|mv| mv.matches(from, to))
            .expect("move should be legal")
    }

    #[test]
    fn test_starting_position_has_twenty_moves() {
        let game = Game::new();
        assert_eq!(game.legal_moves().len(), 20);
        assert_eq!(game.side_to_move(), PieceColor::White);
        assert_eq!(game.terminal(), TerminalState::None);
    }

    #[test]
    fn test_make_and_undo_move() {
        let mut game = Game::new();
        let e4 = find(&game, Coord::new(6, 4), Coord::new(4, 4));
        let entry = game.make_move(&e4).unwrap();
        assert_eq!(entry.san, "e4");
        assert_eq!(game.side_to_move(), PieceColor::Black);
        assert_eq!(game.piece_at(Coord::new(4, 4)).to_string(), "wp");

        let undone = game.undo().unwrap();
        assert_eq!(undone.uci(), "e2e4");
        assert_eq!(game.to_fen(), crate::fen::STANDARD_FEN);
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_undo_on_empty_history() {
        let mut game = Game::new();
        assert!(matches!(game.undo(), Err(GameError::NothingToUndo)));
    }

    #[test]
    fn test_illegal_move_from_other_position_rejected() {
        let mut game = Game::new();
        let e4 = find(&game, Coord::new(6, 4), Coord::new(4, 4));
        game.make_move(&e4).unwrap();
        // White's move again, but it is Black to move now
        assert!(matches!(game.make_move(&e4), Err(GameError::IllegalMove)));
    }

    #[test]
    fn test_fools_mate_is_checkmate() {
        let mut game = Game::new();
        for (from, to) in [
            (Coord::new(6, 5), Coord::new(5, 5)), // f3
            (Coord::new(1, 4), Coord::new(3, 4)), // e5
            (Coord::new(6, 6), Coord::new(4, 6)), // g4
            (Coord::new(0, 3), Coord::new(4, 7)), // Qh4#
        ] {
            let mv = find(&game, from, to);
            game.make_move(&mv).unwrap();
        }
        assert_eq!(
            game.terminal(),
            TerminalState::Checkmate {
                winner: PieceColor::Black
            }
        );
        assert_eq!(
            game.terminal().message().as_deref(),
            Some("Black wins by checkmate")
        );
    }

    #[test]
    fn test_stalemate_detection() {
        let game = Game::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(game.terminal(), TerminalState::Stalemate);
        assert_eq!(game.terminal().message().as_deref(), Some("Stalemate"));
    }

    #[test]
    fn test_queen_promotion_is_first_match() {
        let game = Game::from_fen("8/4P2k/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let first = find(&game, Coord::new(1, 4), Coord::new(0, 4));
        assert_eq!(first.promotion, Some(PieceKind::Queen));
        let promotions = game
            .legal_moves()
            .iter()
            .filter(|mv| mv.matches(Coord::new(1, 4), Coord::new(0, 4)))
            .count();
        assert_eq!(promotions, 4);
    }

    #[test]
    fn test_castling_through_king_destination() {
        let mut game = Game::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let castle = find(&game, Coord::new(7, 4), Coord::new(7, 6));
        assert_eq!(game.make_move(&castle).unwrap().san, "O-O");
        assert_eq!(game.piece_at(Coord::new(7, 6)).to_string(), "wK");
        assert_eq!(game.piece_at(Coord::new(7, 5)).to_string(), "wR");
    }

    #[test]
    fn test_undo_from_fen_start() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
        let mut game = Game::from_fen(fen).unwrap();
        let castle = find(&game, Coord::new(7, 4), Coord::new(7, 2));
        game.make_move(&castle).unwrap();
        game.undo().unwrap();
        assert_eq!(game.to_fen(), fen);
    }

    #[test]
    fn test_grid_uses_piece_codes() {
        let grid = Game::new().grid();
        assert_eq!(grid[0][0].to_string(), "bR");
        assert_eq!(grid[7][4].to_string(), "wK");
        assert_eq!(grid[6][0].to_string(), "wp");
        assert_eq!(grid[4][4].to_string(), "--");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn undo_restores_every_intermediate_position(picks in proptest::collection::vec(any::<usize>(), 0..24)) {
                let mut game = Game::new();
                let mut fens = vec![game.to_fen()];
                for pick in picks {
                    let moves = game.legal_moves();
                    if moves.is_empty() {
                        break;
                    }
                    let mv = moves[pick % moves.len()];
                    game.make_move(&mv).unwrap();
                    fens.push(game.to_fen());
                }
                while let Some(expected) = fens.pop() {
                    prop_assert_eq!(game.to_fen(), expected);
                    if game.undo().is_err() {
                        prop_assert!(fens.is_empty());
                    }
                }
            }

            #[test]
            fn every_legal_move_replays(picks in proptest::collection::vec(any::<usize>(), 0..16)) {
                let mut game = Game::new();
                for pick in picks {
                    let moves = game.legal_moves();
                    if moves.is_empty() {
                        break;
                    }
                    for mv in &moves {
                        prop_assert!(mv.from.is_on_board() && mv.to.is_on_board());
                        prop_assert_eq!(mv.piece_moved.color(), Some(game.side_to_move()));
                    }
                    game.make_move(&moves[pick % moves.len()]).unwrap();
                }
            }
        }
    }
}
