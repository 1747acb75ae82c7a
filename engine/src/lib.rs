//! Move-search backend.
//!
//! Searches run out of process. The front-end hands a [`SearchRequest`] (an
//! immutable snapshot of the game plus its legal moves) to a
//! [`SearchSpawner`], which starts a worker and returns a [`SearchJob`]: the
//! worker handle paired with a one-shot channel that receives exactly one
//! [`SearchReply`].

pub mod process;
pub mod search;
pub mod uci;

pub use process::{ProcessSpawner, DEFAULT_SEARCH_DEPTH};
pub use uci::{UciCommand, UciError, UciMessage};

use chess::{Game, GameMove};
use rand::seq::SliceRandom;
use tokio::sync::oneshot;

/// Everything a worker needs, captured by value at spawn time.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub snapshot: Game,
    pub legal_moves: Vec<GameMove>,
}

impl SearchRequest {
    pub fn new(snapshot: Game, legal_moves: Vec<GameMove>) -> Self {
        Self {
            snapshot,
            legal_moves,
        }
    }
}

/// The single value a worker writes to its result channel
#[derive(Debug, Clone, PartialEq)]
pub enum SearchReply {
    Move(GameMove),
    /// The worker found nothing it could play.
    NoMove,
}

/// Liveness and forced termination of a running worker
pub trait Worker: Send {
    /// Non-blocking: false once the worker has exited for any reason.
    fn is_alive(&mut self) -> bool;
    /// Forcibly stop the worker. No graceful shutdown is attempted.
    fn kill(&mut self);
}

/// Starts search workers
pub trait SearchSpawner {
    fn spawn(&mut self, request: SearchRequest) -> Result<SearchJob, EngineError>;
}

/// A running worker and the receiving end of its result channel
pub struct SearchJob {
    worker: Box<dyn Worker>,
    result: oneshot::Receiver<SearchReply>,
}

impl SearchJob {
    pub fn new(worker: Box<dyn Worker>, result: oneshot::Receiver<SearchReply>) -> Self {
        Self { worker, result }
    }

    pub fn is_alive(&mut self) -> bool {
        self.worker.is_alive()
    }

    /// Non-blocking receive on the result channel.
    pub fn try_result(&mut self) -> Result<SearchReply, oneshot::error::TryRecvError> {
        self.result.try_recv()
    }

    /// Kill the worker and close the channel so a late result is dropped.
    pub fn kill(mut self) {
        self.result.close();
        self.worker.kill();
    }
}

impl std::fmt::Debug for SearchJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchJob").finish_non_exhaustive()
    }
}

/// Engine analysis information
#[derive(Debug, Clone, Default)]
pub struct EngineInfo {
    pub depth: Option<u8>,
    pub nodes: Option<u64>,
    pub score: Option<Score>,
    pub pv: Vec<cozy_chess::Move>, // Principal variation
}

#[derive(Debug, Clone)]
pub enum Score {
    Centipawns(i32),
    Mate(i8), // Negative for being mated
}

/// Uniformly random legal move. Local fallback, never spawns anything.
pub fn find_random_move(legal_moves: &[GameMove]) -> Option<GameMove> {
    legal_moves.choose(&mut rand::thread_rng()).copied()
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to spawn search worker: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("search worker has no stdin")]
    NoStdin,
    #[error("search worker has no stdout")]
    NoStdout,
}
