//! `chesstty-search`: a minimal UCI engine, spawned once per search by the
//! front-end. Reads commands on stdin, answers on stdout, logs to stderr.

use chess::{Game, GameMove};
use engine::search;
use engine::uci::parse_uci_command;
use engine::{UciCommand, UciError, DEFAULT_SEARCH_DEPTH};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), UciError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut game = Game::new();

    while let Some(line) = lines.next_line().await? {
        let command = match parse_uci_command(line.trim()) {
            Ok(command) => command,
            Err(e) => {
                tracing::debug!("Ignoring input: {}", e);
                continue;
            }
        };

        let reply = match command {
            UciCommand::Uci => Some(format!(
                "id name chesstty-search {}\nid author chesstty\nuciok",
                env!("CARGO_PKG_VERSION")
            )),
            UciCommand::IsReady => Some("readyok".to_string()),
            UciCommand::NewGame => {
                game = Game::new();
                None
            }
            UciCommand::Position { fen, moves } => {
                match setup_position(fen.as_deref(), &moves) {
                    Ok(next) => game = next,
                    Err(e) => tracing::warn!("Bad position command: {}", e),
                }
                None
            }
            UciCommand::Go { depth } => Some(go(&game, depth.unwrap_or(DEFAULT_SEARCH_DEPTH))),
            UciCommand::Stop => None,
            UciCommand::Quit => break,
        };

        if let Some(reply) = reply {
            stdout.write_all(reply.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }
    }

    Ok(())
}

fn setup_position(fen: Option<&str>, moves: &[String]) -> Result<Game, chess::GameError> {
    let mut game = match fen {
        Some(fen) => Game::from_fen(fen)?,
        None => Game::new(),
    };
    for text in moves {
        let legal = game.legal_moves();
        let mv = GameMove::find_uci(&legal, text).ok_or(chess::GameError::IllegalMove)?;
        game.make_move(mv)?;
    }
    Ok(game)
}

fn go(game: &Game, depth: u8) -> String {
    let outcome = search::search(game.position(), depth);
    tracing::info!(depth, nodes = outcome.nodes, score = outcome.score, "Search complete");

    match outcome.best {
        Some(mv) => {
            let described = GameMove::describe(game.position(), mv);
            format!(
                "info depth {} score cp {} nodes {}\nbestmove {}",
                depth,
                outcome.score,
                outcome.nodes,
                described.uci()
            )
        }
        None => "bestmove (none)".to_string(),
    }
}
