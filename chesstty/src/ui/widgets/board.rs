use chess::{Coord, PieceCode};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Widget},
};

use crate::core::animation::AnimationFrame;
use crate::ui::geometry::{BoardGeometry, SquareSize};
use crate::ui::render::RenderContext;

#[derive(Clone, Copy, PartialEq, Eq)]
enum SquareHighlight {
    Selected,
    LegalMove,
    LastMove,
    None,
}

impl SquareHighlight {
    fn bg_color(self, ctx: &RenderContext, is_light_square: bool) -> Color {
        let theme = &ctx.theme;
        let (light, dark) = match self {
            Self::Selected => theme.overlay_selected,
            Self::LegalMove => theme.overlay_legal_move,
            Self::LastMove => theme.overlay_last_move,
            Self::None => (theme.light_square, theme.dark_square),
        };
        if is_light_square {
            light
        } else {
            dark
        }
    }
}

/// The board, either static or mid-animation
pub struct BoardWidget<'a> {
    pub ctx: &'a RenderContext,
    pub geometry: BoardGeometry,
    pub grid: &'a [[PieceCode; 8]; 8],
    pub selected: Option<Coord>,
    pub destinations: &'a [Coord],
    pub last_move: Option<(Coord, Coord)>,
    pub cursor: Option<Coord>,
    pub frame: Option<&'a AnimationFrame>,
}

impl<'a> BoardWidget<'a> {
    pub fn new(ctx: &'a RenderContext, geometry: BoardGeometry, grid: &'a [[PieceCode; 8]; 8]) -> Self {
        Self {
            ctx,
            geometry,
            grid,
            selected: None,
            destinations: &[],
            last_move: None,
            cursor: None,
            frame: None,
        }
    }

    /// Draw an animation frame instead of the static grid. Highlights are
    /// suppressed while a piece is moving.
    pub fn animating(ctx: &'a RenderContext, geometry: BoardGeometry, frame: &'a AnimationFrame) -> Self {
        Self {
            frame: Some(frame),
            ..Self::new(ctx, geometry, &frame.board)
        }
    }

    fn highlight(&self, coord: Coord) -> SquareHighlight {
        if self.frame.is_some() {
            SquareHighlight::None
        } else if self.selected == Some(coord) {
            SquareHighlight::Selected
        } else if self.destinations.contains(&coord) {
            SquareHighlight::LegalMove
        } else if self
            .last_move
            .is_some_and(|(from, to)| from == coord || to == coord)
        {
            SquareHighlight::LastMove
        } else {
            SquareHighlight::None
        }
    }
}

impl Widget for BoardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("♟ Chess Board ♟")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.ctx.theme.board_border));
        block.render(area, buf);

        let bounds = area.intersection(buf.area);
        render_labels(self.ctx, &self.geometry, bounds, buf);

        for row in 0..8u16 {
            for col in 0..8u16 {
                let coord = Coord::new(row, col);
                let bg = self.highlight(coord).bg_color(self.ctx, coord.is_light());
                let rect = self.geometry.square_rect(coord);
                fill(buf, rect, bg, bounds);

                let masked = self.frame.is_some_and(|frame| frame.mask == coord);
                if !masked {
                    let piece = self.grid[row as usize][col as usize];
                    draw_piece(self.ctx, &self.geometry, buf, piece, rect.x, rect.y, bg, bounds);
                }

                if self.cursor == Some(coord) && self.frame.is_none() {
                    outline(buf, rect, self.ctx.theme.cursor, bounds);
                }
            }
        }

        if let Some(frame) = self.frame {
            if let Some((piece, square)) = frame.captured {
                let rect = self.geometry.square_rect(square);
                let bg = self.ctx.theme.square(square.is_light());
                draw_piece(self.ctx, &self.geometry, buf, piece, rect.x, rect.y, bg, bounds);
            }

            // Background taken from the square under the piece's center.
            let under = Coord::new(
                frame.row.round().clamp(0.0, 7.0) as u16,
                frame.col.round().clamp(0.0, 7.0) as u16,
            );
            let bg = self.ctx.theme.square(under.is_light());
            let (x, y) = self.geometry.cell_at(frame.row, frame.col);
            draw_piece(self.ctx, &self.geometry, buf, frame.piece, x, y, bg, bounds);
        }
    }
}

fn render_labels(ctx: &RenderContext, geometry: &BoardGeometry, bounds: Rect, buf: &mut Buffer) {
    let style = Style::default().fg(ctx.theme.board_label);
    let (w, h) = (geometry.square_width(), geometry.square_height());

    for row in 0..8u16 {
        let x = geometry.left.saturating_sub(BoardGeometry::LABEL_WIDTH);
        let y = geometry.top + row * h + h / 2;
        if contains(bounds, x, y) {
            buf.set_string(x, y, format!("{}", 8 - row), style);
        }
    }

    for col in 0..8u16 {
        let x = geometry.left + col * w + w / 2;
        let y = geometry.top + 8 * h;
        if contains(bounds, x, y) {
            buf.set_string(x, y, ((b'a' + col as u8) as char).to_string(), style);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_piece(
    ctx: &RenderContext,
    geometry: &BoardGeometry,
    buf: &mut Buffer,
    piece: PieceCode,
    x: u16,
    y: u16,
    bg: Color,
    bounds: Rect,
) {
    let (Some(color), Some(glyph)) = (piece.color(), ctx.piece(piece)) else {
        return;
    };
    let style = Style::default()
        .bg(bg)
        .fg(ctx.theme.piece(color))
        .add_modifier(Modifier::BOLD);

    match geometry.size {
        SquareSize::Large => {
            let offset = (geometry.square_width() - 5) / 2;
            for (i, line) in glyph.art.iter().enumerate() {
                let (px, py) = (x + offset, y + i as u16);
                if contains(bounds, px, py) && contains(bounds, px + 4, py) {
                    buf.set_string(px, py, line, style);
                }
            }
        }
        SquareSize::Compact => {
            let px = x + geometry.square_width() / 2;
            if contains(bounds, px, y) {
                buf.set_string(px, y, glyph.symbol.to_string(), style);
            }
        }
    }
}

fn fill(buf: &mut Buffer, rect: Rect, bg: Color, bounds: Rect) {
    let style = Style::default().bg(bg);
    for py in rect.top()..rect.bottom() {
        for px in rect.left()..rect.right() {
            if contains(bounds, px, py) {
                buf[(px, py)].set_symbol(" ").set_style(style);
            }
        }
    }
}

fn outline(buf: &mut Buffer, rect: Rect, color: Color, bounds: Rect) {
    let style = Style::default().fg(color).add_modifier(Modifier::BOLD);
    let (left, right) = (rect.left(), rect.right().saturating_sub(1));
    if rect.height == 1 {
        if contains(bounds, left, rect.y) && contains(bounds, right, rect.y) {
            buf[(left, rect.y)].set_symbol("[").set_style(style);
            buf[(right, rect.y)].set_symbol("]").set_style(style);
        }
        return;
    }

    let (top, bottom) = (rect.top(), rect.bottom().saturating_sub(1));
    for px in left..=right {
        for (py, corner_l, corner_r) in [(top, "┌", "┐"), (bottom, "└", "┘")] {
            if !contains(bounds, px, py) {
                continue;
            }
            let symbol = if px == left {
                corner_l
            } else if px == right {
                corner_r
            } else {
                "─"
            };
            buf[(px, py)].set_symbol(symbol).set_style(style);
        }
    }
    for py in top + 1..bottom {
        for px in [left, right] {
            if contains(bounds, px, py) {
                buf[(px, py)].set_symbol("│").set_style(style);
            }
        }
    }
}

fn contains(bounds: Rect, x: u16, y: u16) -> bool {
    x >= bounds.left() && x < bounds.right() && y >= bounds.top() && y < bounds.bottom()
}
