//! The UCI line protocol, both directions: messages a worker prints and
//! commands it reads.

pub mod parser;

pub use parser::{
    format_uci_move, parse_uci_command, parse_uci_message, parse_uci_move, UciCommand, UciMessage,
};

#[derive(Debug, thiserror::Error)]
pub enum UciError {
    #[error("worker pipe failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed UCI line: {0}")]
    MalformedMessage(String),
    #[error("unrecognised UCI line: {0}")]
    UnknownMessage(String),
    #[error("not a UCI move: {0}")]
    InvalidMove(String),
}
