use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Clear, Widget},
};

use crate::ui::render::RenderContext;

/// Outcome text centered over the board, with a drop shadow
pub struct EndGameOverlay<'a> {
    pub ctx: &'a RenderContext,
    pub message: &'a str,
}

impl Widget for EndGameOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area);
        let width = self.message.chars().count() as u16 + 4;
        if area.width < width || area.height < 3 {
            return;
        }
        let x = area.x + (area.width - width) / 2;
        let y = area.y + (area.height - 3) / 2;
        let banner = Rect::new(x, y, width, 3);
        Clear.render(banner, buf);

        let shadow = Style::default()
            .fg(self.ctx.theme.end_game_shadow)
            .add_modifier(Modifier::BOLD);
        let text = Style::default()
            .fg(self.ctx.theme.end_game_text)
            .add_modifier(Modifier::BOLD);

        buf.set_string(x + 2, y + 1, self.message, text);
        if y + 2 < area.bottom() {
            // Shadow offset one row down, like the text it sits behind.
            buf.set_string(x + 3, y + 2, self.message, shadow);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::render::Theme;

    #[test]
    fn message_is_centered() {
        let ctx = RenderContext::load(Theme::default()).unwrap();
        let area = Rect::new(0, 0, 30, 9);
        let mut buf = Buffer::empty(area);
        EndGameOverlay {
            ctx: &ctx,
            message: "Stalemate",
        }
        .render(area, &mut buf);

        let x = (30 - 13) / 2 + 2;
        let row: String = (x..x + 9).map(|col| buf[(col, 4)].symbol().to_string()).collect();
        assert_eq!(row, "Stalemate");
    }

    #[test]
    fn area_beyond_buffer_is_clipped() {
        let ctx = RenderContext::load(Theme::default()).unwrap();
        let bounds = Rect::new(0, 0, 12, 4);
        let mut buf = Buffer::empty(bounds);
        EndGameOverlay {
            ctx: &ctx,
            message: "Black wins by checkmate",
        }
        .render(Rect::new(0, 0, 60, 20), &mut buf);
        assert_eq!(buf, Buffer::empty(bounds));

        let mut buf = Buffer::empty(bounds);
        EndGameOverlay {
            ctx: &ctx,
            message: "Stalemate",
        }
        .render(Rect::new(40, 30, 30, 9), &mut buf);
        assert_eq!(buf, Buffer::empty(bounds));
    }

    #[test]
    fn too_small_area_draws_nothing() {
        let ctx = RenderContext::load(Theme::default()).unwrap();
        let area = Rect::new(0, 0, 5, 2);
        let mut buf = Buffer::empty(area);
        EndGameOverlay {
            ctx: &ctx,
            message: "White wins by checkmate",
        }
        .render(area, &mut buf);
        assert_eq!(buf, Buffer::empty(area));
    }
}
