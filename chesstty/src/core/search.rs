//! Lifecycle of the background search: at most one worker at a time.

use chess::{Game, GameMove};
use engine::{find_random_move, SearchJob, SearchReply, SearchRequest, SearchSpawner};
use tokio::sync::oneshot::error::TryRecvError;

/// Default number of empty polls tolerated after the worker has exited.
pub const DEFAULT_EXIT_GRACE_POLLS: u32 = 30;

/// State of the (single) search task
#[derive(Debug)]
pub enum SearchTask {
    Idle,
    Running {
        job: SearchJob,
        snapshot: Game,
        legal_moves: Vec<GameMove>,
        /// Polls that found the worker gone and the channel still empty.
        empty_polls: u32,
    },
    Completed(GameMove),
    /// Killed by undo or reset. Becomes `Idle` at the start of the next tick.
    Cancelled,
}

impl SearchTask {
    pub fn is_running(&self) -> bool {
        matches!(self, SearchTask::Running { .. })
    }
}

/// What one call to [`SearchOrchestrator::step`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStep {
    /// Suppressed this tick, or nothing to search.
    Inactive,
    Spawned,
    Waiting,
    /// A move is ready in `Completed`; take it with `take_completed`.
    Ready,
}

pub struct SearchOrchestrator<S> {
    spawner: S,
    task: SearchTask,
    suppressed_this_tick: bool,
    exit_grace_polls: u32,
    spawned: u64,
}

impl<S: SearchSpawner> SearchOrchestrator<S> {
    pub fn new(spawner: S) -> Self {
        Self {
            spawner,
            task: SearchTask::Idle,
            suppressed_this_tick: false,
            exit_grace_polls: DEFAULT_EXIT_GRACE_POLLS,
            spawned: 0,
        }
    }

    pub fn with_exit_grace_polls(mut self, polls: u32) -> Self {
        self.exit_grace_polls = polls.max(1);
        self
    }

    pub fn task(&self) -> &SearchTask {
        &self.task
    }

    pub fn is_running(&self) -> bool {
        self.task.is_running()
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed_this_tick
    }

    /// Number of workers spawned so far.
    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    pub fn spawner(&self) -> &S {
        &self.spawner
    }

    pub fn spawner_mut(&mut self) -> &mut S {
        &mut self.spawner
    }

    /// Start-of-tick housekeeping: a cancelled task settles to idle and last
    /// tick's guard is lifted.
    pub fn begin_tick(&mut self) {
        if matches!(self.task, SearchTask::Cancelled) {
            self.task = SearchTask::Idle;
        }
        self.suppressed_this_tick = false;
    }

    /// Block spawning for the rest of this tick.
    pub fn suppress_this_tick(&mut self) {
        self.suppressed_this_tick = true;
    }

    /// Advance the task by one non-blocking step. The caller guarantees it
    /// is an engine turn and the game is not over.
    pub fn step(&mut self, game: &Game, legal_moves: &[GameMove]) -> SearchStep {
        if self.suppressed_this_tick {
            return SearchStep::Inactive;
        }

        match self.task {
            SearchTask::Idle | SearchTask::Cancelled => {
                if legal_moves.is_empty() {
                    return SearchStep::Inactive;
                }
                self.spawn(game, legal_moves);
                if self.is_running() {
                    // A worker may answer before the first poll.
                    self.poll();
                }
                match self.task {
                    SearchTask::Completed(_) => SearchStep::Ready,
                    _ => SearchStep::Spawned,
                }
            }
            SearchTask::Running { .. } => {
                self.poll();
                match self.task {
                    SearchTask::Completed(_) => SearchStep::Ready,
                    _ => SearchStep::Waiting,
                }
            }
            SearchTask::Completed(_) => SearchStep::Ready,
        }
    }

    /// Hand over a completed result, returning the task to idle.
    pub fn take_completed(&mut self) -> Option<GameMove> {
        match std::mem::replace(&mut self.task, SearchTask::Idle) {
            SearchTask::Completed(mv) => Some(mv),
            other => {
                self.task = other;
                None
            }
        }
    }

    /// Kill any running worker and drop its result. Returns true if there
    /// was a task to cancel.
    pub fn cancel(&mut self) -> bool {
        match std::mem::replace(&mut self.task, SearchTask::Idle) {
            SearchTask::Running { job, .. } => {
                job.kill();
                tracing::info!("Search cancelled, worker killed");
                self.task = SearchTask::Cancelled;
                true
            }
            SearchTask::Completed(mv) => {
                tracing::info!(mv = %mv, "Completed search result discarded");
                self.task = SearchTask::Cancelled;
                true
            }
            other => {
                self.task = other;
                false
            }
        }
    }

    fn spawn(&mut self, game: &Game, legal_moves: &[GameMove]) {
        let request = SearchRequest::new(game.clone(), legal_moves.to_vec());
        match self.spawner.spawn(request) {
            Ok(job) => {
                self.spawned += 1;
                tracing::info!(side = %game.side_to_move(), legal = legal_moves.len(), "Search spawned");
                self.task = SearchTask::Running {
                    job,
                    snapshot: game.clone(),
                    legal_moves: legal_moves.to_vec(),
                    empty_polls: 0,
                };
            }
            Err(e) => {
                tracing::error!("Search worker could not be started: {}", e);
                self.complete_with_fallback(legal_moves, "spawn failed");
            }
        }
    }

    fn poll(&mut self) {
        let SearchTask::Running {
            job,
            legal_moves,
            empty_polls,
            ..
        } = &mut self.task
        else {
            return;
        };

        match job.try_result() {
            Ok(SearchReply::Move(mv)) if legal_moves.contains(&mv) => {
                tracing::info!(mv = %mv, "Search result received");
                self.task = SearchTask::Completed(mv);
            }
            Ok(SearchReply::Move(mv)) => {
                tracing::warn!(mv = %mv, "Search returned a move outside the snapshot's legal set");
                let legal = std::mem::take(legal_moves);
                self.complete_with_fallback(&legal, "illegal result");
            }
            Ok(SearchReply::NoMove) => {
                let legal = std::mem::take(legal_moves);
                self.complete_with_fallback(&legal, "no move");
            }
            Err(TryRecvError::Closed) => {
                let legal = std::mem::take(legal_moves);
                self.complete_with_fallback(&legal, "channel closed");
            }
            Err(TryRecvError::Empty) => {
                if job.is_alive() {
                    return;
                }
                *empty_polls += 1;
                if *empty_polls >= self.exit_grace_polls {
                    let legal = std::mem::take(legal_moves);
                    self.complete_with_fallback(&legal, "worker exited without a result");
                }
            }
        }
    }

    /// Any search failure ends here: a uniformly random legal move.
    fn complete_with_fallback(&mut self, legal_moves: &[GameMove], reason: &str) {
        if let SearchTask::Running { job, .. } = std::mem::replace(&mut self.task, SearchTask::Idle) {
            job.kill();
        }
        match find_random_move(legal_moves) {
            Some(mv) => {
                tracing::warn!(reason, mv = %mv, "Search failed, playing a random move");
                self.task = SearchTask::Completed(mv);
            }
            None => {
                tracing::warn!(reason, "Search failed and no legal move is left");
            }
        }
    }

    /// Stop any outstanding worker before exit.
    pub fn shutdown(&mut self) {
        if self.cancel() {
            tracing::info!("Outstanding search stopped on shutdown");
        }
        self.task = SearchTask::Idle;
    }
}

impl<S> Drop for SearchOrchestrator<S> {
    fn drop(&mut self) {
        if let SearchTask::Running { job, .. } = std::mem::replace(&mut self.task, SearchTask::Idle) {
            job.kill();
        }
    }
}
