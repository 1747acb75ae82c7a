use chess::Coord;
use ratatui::layout::Rect;

/// Where a click outside the board lands; always off the board.
pub const OFF_BOARD: Coord = Coord::new(8, 8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SquareSize {
    /// 9×3 cells with piece art.
    Large,
    /// 3×1 cells with a single symbol.
    Compact,
}

impl SquareSize {
    pub fn cells(self) -> (u16, u16) {
        match self {
            SquareSize::Large => (9, 3),
            SquareSize::Compact => (3, 1),
        }
    }
}

/// Mapping between terminal cells and board coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardGeometry {
    /// Top-left cell of a8.
    pub left: u16,
    pub top: u16,
    pub size: SquareSize,
}

impl BoardGeometry {
    /// Rank labels take two columns on the left, file labels one row below.
    pub const LABEL_WIDTH: u16 = 2;
    pub const LABEL_HEIGHT: u16 = 1;

    /// Largest board that fits, centered in `area`.
    pub fn fit(area: Rect) -> Self {
        let size = [SquareSize::Large, SquareSize::Compact]
            .into_iter()
            .find(|size| {
                let (w, h) = size.cells();
                w * 8 + Self::LABEL_WIDTH <= area.width && h * 8 + Self::LABEL_HEIGHT <= area.height
            })
            .unwrap_or(SquareSize::Compact);

        let (w, h) = size.cells();
        let total_width = w * 8 + Self::LABEL_WIDTH;
        let total_height = h * 8 + Self::LABEL_HEIGHT;
        Self {
            left: area.x + area.width.saturating_sub(total_width) / 2 + Self::LABEL_WIDTH,
            top: area.y + area.height.saturating_sub(total_height) / 2,
            size,
        }
    }

    pub fn square_width(&self) -> u16 {
        self.size.cells().0
    }

    pub fn square_height(&self) -> u16 {
        self.size.cells().1
    }

    /// The 8×8 board without labels.
    pub fn board_rect(&self) -> Rect {
        Rect::new(
            self.left,
            self.top,
            self.square_width() * 8,
            self.square_height() * 8,
        )
    }

    pub fn square_rect(&self, coord: Coord) -> Rect {
        Rect::new(
            self.left + coord.col * self.square_width(),
            self.top + coord.row * self.square_height(),
            self.square_width(),
            self.square_height(),
        )
    }

    /// Top-left cell for a piece at a fractional board position.
    pub fn cell_at(&self, row: f32, col: f32) -> (u16, u16) {
        let x = self.left as f32 + col * self.square_width() as f32;
        let y = self.top as f32 + row * self.square_height() as f32;
        (x.round().max(0.0) as u16, y.round().max(0.0) as u16)
    }

    /// Board coordinate under a terminal cell, or [`OFF_BOARD`].
    pub fn coord_at(&self, column: u16, row: u16) -> Coord {
        if column < self.left || row < self.top {
            return OFF_BOARD;
        }
        let coord = Coord::new(
            (row - self.top) / self.square_height(),
            (column - self.left) / self.square_width(),
        );
        if coord.is_on_board() {
            coord
        } else {
            OFF_BOARD
        }
    }
}
