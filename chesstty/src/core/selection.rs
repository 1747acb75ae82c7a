//! Click accumulation: two board clicks make a candidate move.

use chess::{Coord, GameMove};

/// Result of feeding one click to [`SelectionState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Same square twice, or a click off the board.
    Deselected,
    /// First click of a pair.
    Selected(Coord),
    /// The pair matched a legal move.
    Commit(GameMove),
    /// The pair matched nothing; the latest click is the new origin.
    Reselected(Coord),
}

/// Selected square plus up to two pending clicks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: Option<Coord>,
    pending_clicks: Vec<Coord>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<Coord> {
        self.selected
    }

    pub fn pending_clicks(&self) -> &[Coord] {
        &self.pending_clicks
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.pending_clicks.clear();
    }

    /// Feed one click.
    ///
    /// `legal_moves` is matched by origin and destination in enumeration
    /// order; the first match wins. When `may_commit` is false (not a human
    /// turn) a completed pair is never committed and collapses to its second
    /// click, so at most two clicks are ever pending.
    pub fn on_square_clicked(
        &mut self,
        coord: Coord,
        legal_moves: &[GameMove],
        may_commit: bool,
    ) -> ClickOutcome {
        if self.selected == Some(coord) || !coord.is_on_board() {
            self.clear();
            return ClickOutcome::Deselected;
        }

        self.selected = Some(coord);
        self.pending_clicks.push(coord);
        if self.pending_clicks.len() < 2 {
            return ClickOutcome::Selected(coord);
        }

        let (origin, destination) = (self.pending_clicks[0], self.pending_clicks[1]);
        if may_commit {
            if let Some(mv) = legal_moves.iter().find(|mv| mv.matches(origin, destination)) {
                self.clear();
                return ClickOutcome::Commit(*mv);
            }
        }

        self.pending_clicks.clear();
        self.pending_clicks.push(coord);
        ClickOutcome::Reselected(coord)
    }
}
