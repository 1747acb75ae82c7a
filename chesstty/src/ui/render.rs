//! Render context: palette and piece assets, owned by the app and passed to
//! every widget.

use std::collections::HashMap;

use chess::{PieceCode, PieceColor, PieceKind};
use ratatui::style::Color;

/// Colors used by the board and panels
#[derive(Debug, Clone)]
pub struct Theme {
    pub light_square: Color,
    pub dark_square: Color,
    pub white_piece: Color,
    pub black_piece: Color,
    pub board_border: Color,
    pub board_label: Color,

    // (light-square variant, dark-square variant)
    pub overlay_selected: (Color, Color),
    pub overlay_legal_move: (Color, Color),
    pub overlay_last_move: (Color, Color),
    pub cursor: Color,

    pub panel_border: Color,
    pub positive: Color,
    pub warning: Color,
    pub negative: Color,
    pub info: Color,
    pub muted: Color,
    pub text_primary: Color,
    pub text_bright: Color,
    pub end_game_text: Color,
    pub end_game_shadow: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            light_square: Color::Rgb(0xf0, 0xd9, 0xb5),
            dark_square: Color::Rgb(0xb5, 0x88, 0x63),
            // Explicit RGB: many terminals remap ANSI white and black.
            white_piece: Color::Rgb(255, 255, 255),
            black_piece: Color::Rgb(0, 0, 0),
            board_border: Color::Cyan,
            board_label: Color::Yellow,

            overlay_selected: (Color::LightBlue, Color::Blue),
            overlay_legal_move: (Color::Rgb(0x7a, 0x7a, 0x7a), Color::Rgb(0x5a, 0x5a, 0x5a)),
            overlay_last_move: (Color::LightYellow, Color::Yellow),
            cursor: Color::Magenta,

            panel_border: Color::Cyan,
            positive: Color::Green,
            warning: Color::Yellow,
            negative: Color::Red,
            info: Color::Cyan,
            muted: Color::DarkGray,
            text_primary: Color::White,
            text_bright: Color::LightCyan,
            end_game_text: Color::Gray,
            end_game_shadow: Color::Black,
        }
    }
}

impl Theme {
    pub fn square(&self, is_light: bool) -> Color {
        if is_light {
            self.light_square
        } else {
            self.dark_square
        }
    }

    pub fn piece(&self, color: PieceColor) -> Color {
        match color {
            PieceColor::White => self.white_piece,
            PieceColor::Black => self.black_piece,
        }
    }
}

/// Fixed-size drawable for one piece code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceGlyph {
    /// Single-cell symbol for compact boards.
    pub symbol: char,
    /// Three lines, five cells wide.
    pub art: [&'static str; 3],
}

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("no glyph for piece {0}")]
    MissingPiece(PieceCode),
}

pub struct RenderContext {
    pub theme: Theme,
    pieces: HashMap<PieceCode, PieceGlyph>,
}

impl RenderContext {
    /// Load every piece asset. A missing one is fatal.
    pub fn load(theme: Theme) -> Result<Self, AssetError> {
        let pieces: HashMap<_, _> = PieceCode::all()
            .filter_map(|code| Some((code, glyph_for(code)?)))
            .collect();

        if let Some(missing) = PieceCode::all().find(|code| !pieces.contains_key(code)) {
            return Err(AssetError::MissingPiece(missing));
        }
        tracing::debug!(assets = pieces.len(), "Piece assets loaded");

        Ok(Self { theme, pieces })
    }

    pub fn piece(&self, code: PieceCode) -> Option<&PieceGlyph> {
        self.pieces.get(&code)
    }
}

#[rustfmt::skip]
fn glyph_for(code: PieceCode) -> Option<PieceGlyph> {
    // Both sides share shapes; color comes from the theme.
    let kind = code.kind()?;
    let symbol = match kind {
        PieceKind::King => '♚',
        PieceKind::Queen => '♛',
        PieceKind::Rook => '♜',
        PieceKind::Bishop => '♝',
        PieceKind::Knight => '♞',
        PieceKind::Pawn => '♟',
    };
    let art = match kind {
        PieceKind::King   => ["✺█✺█✺", "-=K=-", "█████"],
        PieceKind::Queen  => ["✦█✦█✦", "-=Q=-", "█████"],
        PieceKind::Rook   => ["█ █ █", "-=R=-", "█████"],
        PieceKind::Bishop => ["  ❂  ", "-=B=-", "█████"],
        PieceKind::Knight => ["  ◉  ", "-=N=-", "█████"],
        PieceKind::Pawn   => ["  ●  ", "-=P=-", " ███ "],
    };
    Some(PieceGlyph { symbol, art })
}
