use crate::{EngineInfo, Score};
use cozy_chess::{Move, Piece};

/// Incoming message from UCI engine
#[derive(Debug, Clone)]
pub enum UciMessage {
    Id { name: String, value: String },
    UciOk,
    ReadyOk,
    /// `mv` is `None` for `bestmove (none)` / `bestmove 0000`
    BestMove { mv: Option<Move>, ponder: Option<Move> },
    Info(EngineInfo),
}

/// Command sent from the front-end to a UCI engine
#[derive(Debug, Clone, PartialEq)]
pub enum UciCommand {
    Uci,
    IsReady,
    NewGame,
    Position {
        fen: Option<String>,
        moves: Vec<String>,
    },
    Go {
        depth: Option<u8>,
    },
    Stop,
    Quit,
}

/// Parse a UCI message line
pub fn parse_uci_message(line: &str) -> Result<UciMessage, crate::UciError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    match tokens.first() {
        Some(&"uciok") => Ok(UciMessage::UciOk),
        Some(&"readyok") => Ok(UciMessage::ReadyOk),

        Some(&"id") => {
            if tokens.len() < 3 {
                return Err(crate::UciError::MalformedMessage(line.to_string()));
            }
            let name = tokens[1].to_string();
            let value = tokens[2..].join(" ");
            Ok(UciMessage::Id { name, value })
        }

        Some(&"bestmove") => {
            let Some(&text) = tokens.get(1) else {
                return Err(crate::UciError::MalformedMessage(line.to_string()));
            };
            let mv = match text {
                "(none)" | "0000" => None,
                _ => Some(parse_uci_move(text)?),
            };
            let ponder = if tokens.len() >= 4 && tokens[2] == "ponder" {
                parse_uci_move(tokens[3]).ok()
            } else {
                None
            };
            Ok(UciMessage::BestMove { mv, ponder })
        }

        Some(&"info") => Ok(UciMessage::Info(parse_info_line(&tokens[1..]))),

        _ => Err(crate::UciError::UnknownMessage(line.to_string())),
    }
}

/// Parse a UCI command line (the engine side of the protocol)
pub fn parse_uci_command(line: &str) -> Result<UciCommand, crate::UciError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    match tokens.first() {
        Some(&"uci") => Ok(UciCommand::Uci),
        Some(&"isready") => Ok(UciCommand::IsReady),
        Some(&"ucinewgame") => Ok(UciCommand::NewGame),
        Some(&"stop") => Ok(UciCommand::Stop),
        Some(&"quit") => Ok(UciCommand::Quit),

        Some(&"position") => {
            let moves_at = tokens.iter().position(|t| *t == "moves");
            let setup = &tokens[1..moves_at.unwrap_or(tokens.len())];
            let fen = match setup.first() {
                Some(&"startpos") => None,
                Some(&"fen") if setup.len() > 1 => Some(setup[1..].join(" ")),
                _ => return Err(crate::UciError::MalformedMessage(line.to_string())),
            };
            let moves = moves_at
                .map(|at| tokens[at + 1..].iter().map(|t| t.to_string()).collect())
                .unwrap_or_default();
            Ok(UciCommand::Position { fen, moves })
        }

        Some(&"go") => {
            let depth = tokens
                .iter()
                .position(|t| *t == "depth")
                .and_then(|at| tokens.get(at + 1))
                .and_then(|d| d.parse().ok());
            Ok(UciCommand::Go { depth })
        }

        _ => Err(crate::UciError::UnknownMessage(line.to_string())),
    }
}

/// Fields of an `info` line worth logging. Unknown fields are skipped;
/// `pv` runs to the end of the line.
fn parse_info_line(tokens: &[&str]) -> EngineInfo {
    let mut info = EngineInfo::default();
    let mut rest = tokens.iter().copied();
    while let Some(field) = rest.next() {
        match field {
            "depth" => info.depth = rest.next().and_then(|v| v.parse().ok()),
            "nodes" => info.nodes = rest.next().and_then(|v| v.parse().ok()),
            "score" => {
                info.score = match (rest.next(), rest.next()) {
                    (Some("cp"), Some(v)) => v.parse().ok().map(Score::Centipawns),
                    (Some("mate"), Some(v)) => v.parse().ok().map(Score::Mate),
                    _ => None,
                }
            }
            "pv" => {
                info.pv = rest
                    .by_ref()
                    .map_while(|t| parse_uci_move(t).ok())
                    .collect();
            }
            _ => {}
        }
    }
    info
}

/// Parse UCI move format (e2e4, e7e8q)
pub fn parse_uci_move(s: &str) -> Result<Move, crate::UciError> {
    if !s.is_ascii() || s.len() < 4 || s.len() > 5 {
        return Err(crate::UciError::InvalidMove(s.to_string()));
    }

    let square = |text: &str| {
        chess::parse_square(text).ok_or_else(|| crate::UciError::InvalidMove(s.to_string()))
    };
    let from = square(&s[0..2])?;
    let to = square(&s[2..4])?;

    let promotion = match s.as_bytes().get(4) {
        None => None,
        Some(b'q') => Some(Piece::Queen),
        Some(b'r') => Some(Piece::Rook),
        Some(b'b') => Some(Piece::Bishop),
        Some(b'n') => Some(Piece::Knight),
        Some(_) => return Err(crate::UciError::InvalidMove(s.to_string())),
    };

    Ok(Move {
        from,
        to,
        promotion,
    })
}

/// Format move for UCI (cozy-chess Move → "e2e4")
pub fn format_uci_move(mv: &Move) -> String {
    let mut s = format!(
        "{}{}",
        chess::format_square(mv.from),
        chess::format_square(mv.to)
    );
    if let Some(promo) = mv.promotion {
        s.push(chess::uci::format_piece(promo));
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bestmove() {
        let msg = parse_uci_message("bestmove e2e4 ponder e7e5").unwrap();
        match msg {
            UciMessage::BestMove { mv, ponder } => {
                assert_eq!(format_uci_move(&mv.unwrap()), "e2e4");
                assert_eq!(format_uci_move(&ponder.unwrap()), "e7e5");
            }
            _ => panic!("Wrong message type"),
        }
    }

    #[test]
    fn test_parse_bestmove_none() {
        for line in ["bestmove (none)", "bestmove 0000"] {
            match parse_uci_message(line).unwrap() {
                UciMessage::BestMove { mv, .. } => assert!(mv.is_none()),
                other => panic!("Wrong message type: {:?}", other),
            }
        }
    }

    #[test]
    fn test_parse_bestmove_garbage() {
        assert!(parse_uci_message("bestmove").is_err());
        assert!(parse_uci_message("bestmove zz99").is_err());
    }

    #[test]
    fn test_parse_info() {
        let msg = parse_uci_message("info depth 12 score cp 35 nodes 15234 pv e2e4 e7e5").unwrap();
        match msg {
            UciMessage::Info(info) => {
                assert_eq!(info.depth, Some(12));
                assert!(matches!(info.score, Some(Score::Centipawns(35))));
                assert_eq!(info.nodes, Some(15234));
                assert_eq!(info.pv.len(), 2);
            }
            _ => panic!("Wrong message type"),
        }
    }

    #[test]
    fn test_parse_promotion_move() {
        let mv = parse_uci_move("e7e8q").unwrap();
        assert_eq!(mv.promotion, Some(Piece::Queen));
        assert!(parse_uci_move("e7e8x").is_err());
    }

    #[test]
    fn test_parse_position_commands() {
        assert_eq!(
            parse_uci_command("position startpos moves e2e4 e7e5").unwrap(),
            UciCommand::Position {
                fen: None,
                moves: vec!["e2e4".to_string(), "e7e5".to_string()],
            }
        );
        assert_eq!(
            parse_uci_command("position fen 4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap(),
            UciCommand::Position {
                fen: Some("4k3/8/8/8/8/8/8/4K3 w - - 0 1".to_string()),
                moves: vec![],
            }
        );
        assert!(parse_uci_command("position").is_err());
    }

    #[test]
    fn test_parse_go() {
        assert_eq!(
            parse_uci_command("go depth 4").unwrap(),
            UciCommand::Go { depth: Some(4) }
        );
        assert_eq!(
            parse_uci_command("go movetime 100").unwrap(),
            UciCommand::Go { depth: None }
        );
    }
}
