use chess::Coord;

/// An input already translated out of terminal terms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A board square was clicked. May be off the board.
    SquareClicked(Coord),
    Control(Control),
}

/// Session-level commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Undo,
    Reset,
    ToggleSound,
    Quit,
}

impl From<Control> for InputEvent {
    fn from(control: Control) -> Self {
        InputEvent::Control(control)
    }
}

impl InputEvent {
    pub fn click(row: u16, col: u16) -> Self {
        InputEvent::SquareClicked(Coord::new(row, col))
    }
}
