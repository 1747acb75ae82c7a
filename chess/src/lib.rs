pub mod fen;
pub mod game;
pub mod moves;
pub mod types;
pub mod uci;

pub use fen::{FenError, STANDARD_FEN};
pub use game::{Game, GameError, HistoryEntry, StartPosition, TerminalState};
pub use moves::GameMove;
pub use types::{Coord, PieceCode, PieceColor, PieceKind};
pub use uci::{format_square, parse_square};
