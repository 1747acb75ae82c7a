//! Pieces, sides and board coordinates as the front-end sees them.
//!
//! Rows run top to bottom as drawn (row 0 is rank 8) and columns run a to h.
//! Conversions to and from cozy-chess live here so nothing above this crate
//! touches engine types.

use cozy_chess::{File, Rank, Square};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

/// Also used as "side": the player owning a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceColor {
    White,
    Black,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    pub fn to_char_upper(self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Rook => 'R',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'p' => Some(Self::Pawn),
            'n' => Some(Self::Knight),
            'b' => Some(Self::Bishop),
            'r' => Some(Self::Rook),
            'q' => Some(Self::Queen),
            'k' => Some(Self::King),
            _ => None,
        }
    }

    /// Material value in centipawns. The king is priced at zero; it is never
    /// captured in legal play.
    pub fn value(self) -> i32 {
        match self {
            Self::Pawn => 100,
            Self::Knight => 320,
            Self::Bishop => 330,
            Self::Rook => 500,
            Self::Queen => 900,
            Self::King => 0,
        }
    }
}

impl PieceColor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Capitalised name, as shown in end-of-game text.
    pub fn title(self) -> &'static str {
        match self {
            Self::White => "White",
            Self::Black => "Black",
        }
    }
}

/// Two-character piece code: side (`w`/`b`) followed by type (`p`, `N`, `B`,
/// `R`, `Q`, `K`). `--` marks an empty square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PieceCode(Option<(PieceColor, PieceKind)>);

impl PieceCode {
    pub const EMPTY: PieceCode = PieceCode(None);

    pub fn new(color: PieceColor, kind: PieceKind) -> Self {
        Self(Some((color, kind)))
    }

    pub fn is_empty(self) -> bool {
        self.0.is_none()
    }

    pub fn color(self) -> Option<PieceColor> {
        self.0.map(|(color, _)| color)
    }

    pub fn kind(self) -> Option<PieceKind> {
        self.0.map(|(_, kind)| kind)
    }

    /// Every non-empty code, white first.
    pub fn all() -> impl Iterator<Item = PieceCode> {
        [PieceColor::White, PieceColor::Black]
            .into_iter()
            .flat_map(|color| PieceKind::ALL.into_iter().map(move |kind| Self::new(color, kind)))
    }
}

impl std::fmt::Display for PieceCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            None => f.write_str("--"),
            Some((color, kind)) => {
                let side = match color {
                    PieceColor::White => 'w',
                    PieceColor::Black => 'b',
                };
                let kind = match kind {
                    PieceKind::Pawn => 'p',
                    other => other.to_char_upper(),
                };
                write!(f, "{}{}", side, kind)
            }
        }
    }
}

impl std::str::FromStr for PieceCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "--" {
            return Ok(Self::EMPTY);
        }
        let mut chars = s.chars();
        let color = match chars.next() {
            Some('w') => PieceColor::White,
            Some('b') => PieceColor::Black,
            _ => return Err(format!("invalid piece code: {}", s)),
        };
        let kind = chars
            .next()
            .and_then(PieceKind::from_char)
            .ok_or_else(|| format!("invalid piece code: {}", s))?;
        if chars.next().is_some() {
            return Err(format!("invalid piece code: {}", s));
        }
        Ok(Self::new(color, kind))
    }
}

/// A board coordinate as the player sees it: row 0 is rank 8 (top of the
/// board), column 0 is the a-file.
///
/// Coordinates are not range-checked on construction so that raw pointer
/// positions can be represented; [`Coord::is_on_board`] tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    pub row: u16,
    pub col: u16,
}

impl Coord {
    pub const fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }

    pub fn is_on_board(self) -> bool {
        self.row < 8 && self.col < 8
    }

    /// Convert to a cozy-chess square. Returns `None` off the board.
    pub fn to_square(self) -> Option<Square> {
        if !self.is_on_board() {
            return None;
        }
        Some(Square::new(
            File::index(self.col as usize),
            Rank::index(7 - self.row as usize),
        ))
    }

    pub fn from_square(square: Square) -> Self {
        Self {
            row: 7 - square.rank() as u16,
            col: square.file() as u16,
        }
    }

    /// Manhattan distance in squares, the basis of animation length.
    pub fn distance(self, other: Coord) -> u16 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Light squares have an even `row + col`, matching a1 being dark.
    pub fn is_light(self) -> bool {
        (self.row + self.col) % 2 == 0
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_square() {
            Some(square) => f.write_str(&crate::uci::format_square(square)),
            None => write!(f, "({}, {})", self.row, self.col),
        }
    }
}

impl From<cozy_chess::Piece> for PieceKind {
    fn from(p: cozy_chess::Piece) -> Self {
        match p {
            cozy_chess::Piece::Pawn => Self::Pawn,
            cozy_chess::Piece::Knight => Self::Knight,
            cozy_chess::Piece::Bishop => Self::Bishop,
            cozy_chess::Piece::Rook => Self::Rook,
            cozy_chess::Piece::Queen => Self::Queen,
            cozy_chess::Piece::King => Self::King,
        }
    }
}

impl From<PieceKind> for cozy_chess::Piece {
    fn from(p: PieceKind) -> Self {
        match p {
            PieceKind::Pawn => Self::Pawn,
            PieceKind::Knight => Self::Knight,
            PieceKind::Bishop => Self::Bishop,
            PieceKind::Rook => Self::Rook,
            PieceKind::Queen => Self::Queen,
            PieceKind::King => Self::King,
        }
    }
}

impl From<cozy_chess::Color> for PieceColor {
    fn from(c: cozy_chess::Color) -> Self {
        match c {
            cozy_chess::Color::White => Self::White,
            cozy_chess::Color::Black => Self::Black,
        }
    }
}

impl From<PieceColor> for cozy_chess::Color {
    fn from(c: PieceColor) -> Self {
        match c {
            PieceColor::White => Self::White,
            PieceColor::Black => Self::Black,
        }
    }
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char_upper())
    }
}

impl std::fmt::Display for PieceColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
