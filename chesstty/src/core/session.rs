use chess::{Game, GameError, GameMove, TerminalState};

use super::turn::{is_human_turn, SeatConfig};

/// The live game, who plays it, and whether it is over.
///
/// Sole owner and writer of the rules-engine state.
#[derive(Debug, Clone)]
pub struct Session {
    game: Game,
    seats: SeatConfig,
    legal_moves: Vec<GameMove>,
    terminal: TerminalState,
}

impl Session {
    pub fn new(seats: SeatConfig) -> Self {
        Self::with_game(Game::new(), seats)
    }

    pub fn with_game(game: Game, seats: SeatConfig) -> Self {
        let mut session = Self {
            game,
            seats,
            legal_moves: Vec::new(),
            terminal: TerminalState::None,
        };
        session.refresh();
        session
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn seats(&self) -> SeatConfig {
        self.seats
    }

    pub fn legal_moves(&self) -> &[GameMove] {
        &self.legal_moves
    }

    pub fn terminal(&self) -> TerminalState {
        self.terminal
    }

    pub fn is_game_over(&self) -> bool {
        self.terminal.is_over()
    }

    pub fn is_human_turn(&self) -> bool {
        is_human_turn(&self.seats, self.game.side_to_move())
    }

    /// Play a move. Legal moves and the terminal state are left stale until
    /// [`Session::refresh`], which runs once the move has been animated.
    pub fn commit(&mut self, mv: &GameMove) -> Result<(), GameError> {
        let entry = self.game.make_move(mv)?;
        tracing::info!(mv = %entry.mv, san = %entry.san, "Move committed");
        Ok(())
    }

    /// Recompute legal moves and relay checkmate or stalemate.
    pub fn refresh(&mut self) {
        self.legal_moves = self.game.legal_moves();
        let terminal = self.game.terminal();
        if terminal.is_over() && terminal != self.terminal {
            if let Some(message) = terminal.message() {
                tracing::info!(outcome = %message, moves = self.game.history().len(), "Game over");
            }
        }
        self.terminal = terminal;
    }

    /// Take back the last move, if any.
    pub fn undo(&mut self) -> Option<GameMove> {
        let undone = match self.game.undo() {
            Ok(mv) => {
                tracing::info!(mv = %mv, "Move undone");
                Some(mv)
            }
            Err(GameError::NothingToUndo) => None,
            Err(e) => {
                tracing::error!("Undo failed: {}", e);
                None
            }
        };
        self.refresh();
        undone
    }

    /// Replace the game with a fresh one. Seats are kept.
    pub fn reset(&mut self) {
        tracing::info!("Session reset");
        *self = Self::new(self.seats);
    }
}
