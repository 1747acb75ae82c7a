//! Material-only alpha-beta search used by the `chesstty-search` worker.

use chess::PieceKind;
use cozy_chess::{Board, Color, GameStatus, Move, Piece};

const MATE_SCORE: i32 = 100_000;
const INFINITY: i32 = MATE_SCORE + 1_000;

/// Result of a completed search
#[derive(Debug, Clone, Copy)]
pub struct SearchOutcome {
    pub best: Option<Move>,
    /// Centipawns from the side to move's point of view.
    pub score: i32,
    pub nodes: u64,
}

/// Best move for the side to move, or `None` when there is no legal move.
pub fn best_move(board: &Board, depth: u8) -> Option<Move> {
    search(board, depth).best
}

#[tracing::instrument(level = "debug", skip(board))]
pub fn search(board: &Board, depth: u8) -> SearchOutcome {
    let depth = depth.max(1);
    let mut nodes = 0;
    let mut best = None;
    let mut alpha = -INFINITY;

    for mv in ordered_moves(board) {
        let mut next = board.clone();
        next.play_unchecked(mv);
        let score = -negamax(&next, depth - 1, 1, -INFINITY, -alpha, &mut nodes);
        if best.is_none() || score > alpha {
            alpha = score;
            best = Some(mv);
        }
    }

    let score = if best.is_some() {
        alpha
    } else {
        leaf_score(board, 0)
    };
    tracing::debug!(nodes, score, "Search finished");

    SearchOutcome { best, score, nodes }
}

fn negamax(board: &Board, depth: u8, ply: i32, mut alpha: i32, beta: i32, nodes: &mut u64) -> i32 {
    *nodes += 1;

    if board.status() != GameStatus::Ongoing {
        return leaf_score(board, ply);
    }
    if depth == 0 {
        return evaluate(board);
    }

    for mv in ordered_moves(board) {
        let mut next = board.clone();
        next.play_unchecked(mv);
        let score = -negamax(&next, depth - 1, ply + 1, -beta, -alpha, nodes);
        if score >= beta {
            return beta;
        }
        alpha = alpha.max(score);
    }
    alpha
}

/// Score of a finished position. Faster mates score higher.
fn leaf_score(board: &Board, ply: i32) -> i32 {
    match board.status() {
        GameStatus::Won => -(MATE_SCORE - ply),
        GameStatus::Drawn => 0,
        GameStatus::Ongoing => evaluate(board),
    }
}

/// Material from the side to move's point of view
fn evaluate(board: &Board) -> i32 {
    let white = material(board, Color::White);
    let black = material(board, Color::Black);
    match board.side_to_move() {
        Color::White => white - black,
        Color::Black => black - white,
    }
}

fn material(board: &Board, color: Color) -> i32 {
    Piece::ALL
        .iter()
        .map(|&piece| {
            let count = (board.pieces(piece) & board.colors(color)).len() as i32;
            PieceKind::from(piece).value() * count
        })
        .sum()
}

/// Captures first, most valuable victim first.
fn ordered_moves(board: &Board) -> Vec<Move> {
    let mut moves = Vec::with_capacity(48);
    board.generate_moves(|mvs| {
        moves.extend(mvs);
        false
    });
    let them = board.occupied() ^ board.colors(board.side_to_move());
    moves.sort_by_key(|mv| {
        if them.has(mv.to) {
            board
                .piece_on(mv.to)
                .map(|victim| -PieceKind::from(victim).value())
                .unwrap_or(0)
        } else {
            1
        }
    });
    moves
}
