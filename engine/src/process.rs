use crate::uci::{format_uci_move, parse_uci_message, UciMessage};
use crate::{EngineError, SearchJob, SearchReply, SearchRequest, SearchSpawner, UciError, Worker};
use chess::GameMove;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout};
use tokio::sync::oneshot;

/// Default search depth handed to the worker with `go depth`.
pub const DEFAULT_SEARCH_DEPTH: u8 = 3;

/// Spawns one OS process per search and talks UCI to it.
///
/// Works with the bundled `chesstty-search` worker and with any other UCI
/// engine (e.g. Stockfish): the process receives `position fen …` and
/// `go depth …`, the first `bestmove` line is the result, and the process is
/// then told to `quit`.
#[derive(Debug, Clone)]
pub struct ProcessSpawner {
    program: PathBuf,
    args: Vec<String>,
    depth: u8,
}

impl ProcessSpawner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            depth: DEFAULT_SEARCH_DEPTH,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_depth(mut self, depth: u8) -> Self {
        self.depth = depth.max(1);
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl SearchSpawner for ProcessSpawner {
    #[tracing::instrument(level = "debug", skip(self, request), fields(program = %self.program.display()))]
    fn spawn(&mut self, request: SearchRequest) -> Result<SearchJob, EngineError> {
        let mut child = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                tracing::error!("Failed to spawn search worker: {}", e);
                EngineError::Spawn(e)
            })?;

        let stdin = child.stdin.take().ok_or(EngineError::NoStdin)?;
        let stdout = child.stdout.take().ok_or(EngineError::NoStdout)?;
        tracing::info!(pid = ?child.id(), depth = self.depth, "Search worker spawned");

        let (reply_tx, reply_rx) = oneshot::channel();
        tokio::spawn(drive_search(stdin, stdout, request, self.depth, reply_tx));

        Ok(SearchJob::new(Box::new(ProcessWorker { child }), reply_rx))
    }
}

/// Handle to a spawned worker process
struct ProcessWorker {
    child: Child,
}

impl Worker for ProcessWorker {
    fn is_alive(&mut self) -> bool {
        match self.child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                tracing::debug!(%status, "Search worker exited");
                false
            }
            Err(e) => {
                tracing::warn!("Failed to poll search worker: {}", e);
                false
            }
        }
    }

    fn kill(&mut self) {
        if let Err(e) = self.child.start_kill() {
            // Already exited; nothing left to stop.
            tracing::debug!("Kill on finished search worker: {}", e);
        }
    }
}

/// Owns the worker's pipes for the lifetime of one search. Sends exactly one
/// reply, falling back to `NoMove` on any protocol failure.
async fn drive_search(
    mut stdin: ChildStdin,
    stdout: ChildStdout,
    request: SearchRequest,
    depth: u8,
    reply_tx: oneshot::Sender<SearchReply>,
) {
    let reply = match exchange(&mut stdin, stdout, &request, depth).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!("Search worker protocol failure: {}", e);
            SearchReply::NoMove
        }
    };

    if reply_tx.send(reply).is_err() {
        tracing::debug!("Search result discarded, receiver gone");
    }

    // The process may already be gone (killed, or exited on its own).
    let _ = stdin.write_all(b"quit\n").await;
    let _ = stdin.flush().await;
}

async fn exchange(
    stdin: &mut ChildStdin,
    stdout: ChildStdout,
    request: &SearchRequest,
    depth: u8,
) -> Result<SearchReply, UciError> {
    let commands = format!(
        "position fen {}\ngo depth {}\n",
        request.snapshot.to_fen(),
        depth
    );
    tracing::trace!("UCI >> {}", commands.trim());
    stdin.write_all(commands.as_bytes()).await?;
    stdin.flush().await?;

    let mut lines = BufReader::new(stdout).lines();
    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        tracing::trace!("UCI << {}", trimmed);

        match parse_uci_message(trimmed) {
            Ok(UciMessage::BestMove { mv: Some(mv), .. }) => {
                let text = format_uci_move(&mv);
                return Ok(resolve_reply(&request.legal_moves, &text));
            }
            Ok(UciMessage::BestMove { mv: None, .. }) => {
                tracing::info!("Search worker reported no move");
                return Ok(SearchReply::NoMove);
            }
            Ok(UciMessage::Info(info)) => {
                tracing::debug!(
                    depth = ?info.depth,
                    nodes = ?info.nodes,
                    score = ?info.score,
                    pv = %describe_pv(&info.pv),
                    "Search info"
                );
            }
            Ok(_) => {}
            Err(UciError::UnknownMessage(_)) => {
                tracing::trace!("Ignoring UCI line: {}", trimmed);
            }
            Err(e) => return Err(e),
        }
    }

    tracing::warn!("Search worker closed stdout before bestmove");
    Ok(SearchReply::NoMove)
}

/// Principal variation as space-separated UCI moves.
fn describe_pv(pv: &[cozy_chess::Move]) -> String {
    pv.iter().map(format_uci_move).collect::<Vec<_>>().join(" ")
}

/// Map engine text onto the snapshot's legal moves. Anything unknown is
/// treated as no move.
fn resolve_reply(legal_moves: &[GameMove], text: &str) -> SearchReply {
    match GameMove::find_uci(legal_moves, text) {
        Some(mv) => {
            tracing::info!(mv = %mv, "Search worker chose move");
            SearchReply::Move(*mv)
        }
        None => {
            tracing::warn!(mv = text, "Search worker chose a move that is not legal");
            SearchReply::NoMove
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess::Game;
    use std::time::Duration;

    fn scripted(script: &str) -> ProcessSpawner {
        ProcessSpawner::new("/bin/sh").with_args(["-c", script])
    }

    fn request() -> SearchRequest {
        let game = Game::new();
        let legal = game.legal_moves();
        SearchRequest::new(game, legal)
    }

    async fn wait_for_reply(job: &mut SearchJob) -> SearchReply {
        for _ in 0..200 {
            if let Ok(reply) = job.try_result() {
                return reply;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("no reply from worker");
    }

    #[test]
    fn test_resolve_reply() {
        let legal = Game::new().legal_moves();
        assert!(matches!(resolve_reply(&legal, "e2e4"), SearchReply::Move(mv) if mv.uci() == "e2e4"));
        assert_eq!(resolve_reply(&legal, "e2e5"), SearchReply::NoMove);
    }

    #[tokio::test]
    async fn test_worker_bestmove_is_resolved() {
        let mut spawner = scripted(
            r#"while read line; do case "$line" in go*) echo "info depth 1 score cp 20"; echo "bestmove e2e4";; quit) exit 0;; esac; done"#,
        );
        let mut job = spawner.spawn(request()).unwrap();
        match wait_for_reply(&mut job).await {
            SearchReply::Move(mv) => assert_eq!(mv.uci(), "e2e4"),
            other => panic!("unexpected reply: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_worker_none_is_no_move() {
        let mut spawner = scripted(
            r#"while read line; do case "$line" in go*) echo "bestmove (none)";; quit) exit 0;; esac; done"#,
        );
        let mut job = spawner.spawn(request()).unwrap();
        assert_eq!(wait_for_reply(&mut job).await, SearchReply::NoMove);
    }

    #[tokio::test]
    async fn test_worker_exiting_silently_is_no_move() {
        let mut spawner = scripted("exit 0");
        let mut job = spawner.spawn(request()).unwrap();
        assert_eq!(wait_for_reply(&mut job).await, SearchReply::NoMove);
        for _ in 0..200 {
            if !job.is_alive() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("worker should have exited");
    }

    fn sleeping_child() -> Child {
        tokio::process::Command::new("/bin/sh")
            .args(["-c", "sleep 30"])
            .kill_on_drop(true)
            .spawn()
            .unwrap()
    }

    #[tokio::test]
    async fn test_kill_stops_hung_worker() {
        let mut worker = ProcessWorker {
            child: sleeping_child(),
        };
        assert!(worker.is_alive());

        worker.kill();
        for _ in 0..200 {
            if !worker.is_alive() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("killed worker is still running");
    }

    #[tokio::test]
    async fn test_killed_job_drops_late_reply() {
        let (reply_tx, reply_rx) = oneshot::channel();
        let mut job = SearchJob::new(
            Box::new(ProcessWorker {
                child: sleeping_child(),
            }),
            reply_rx,
        );
        assert!(job.is_alive());
        assert!(job.try_result().is_err());

        job.kill();
        assert!(reply_tx.send(SearchReply::NoMove).is_err());
    }

    #[tokio::test]
    async fn test_spawned_hung_worker_gives_no_reply() {
        let mut spawner = scripted("sleep 30");
        let mut job = spawner.spawn(request()).unwrap();
        assert!(job.is_alive());
        assert!(job.try_result().is_err());
        job.kill();
    }

    #[test]
    fn test_describe_pv() {
        let pv = ["e2e4", "e7e5", "g1f3"].map(|text| crate::uci::parse_uci_move(text).unwrap());
        assert_eq!(describe_pv(&pv), "e2e4 e7e5 g1f3");
        assert_eq!(describe_pv(&[]), "");
    }

    #[tokio::test]
    async fn test_missing_program_fails_to_spawn() {
        let mut spawner = ProcessSpawner::new("/nonexistent/chesstty-search");
        assert!(matches!(
            spawner.spawn(request()),
            Err(EngineError::Spawn(_))
        ));
    }
}
