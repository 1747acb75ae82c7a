use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::ui::render::RenderContext;

pub struct ControlsPanel<'a> {
    pub ctx: &'a RenderContext,
}

impl<'a> ControlsPanel<'a> {
    pub fn new(ctx: &'a RenderContext) -> Self {
        Self { ctx }
    }
}

fn key_line(key: &'static str, color: Color, action: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(key, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::raw(action),
    ])
}

impl Widget for ControlsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let theme = &self.ctx.theme;
        let block = Block::default()
            .title("⌨ Controls ⌨")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.panel_border));

        let inner = block.inner(area);
        block.render(area, buf);

        let lines = vec![
            key_line("click ", theme.info, "Select / move"),
            key_line("←↑↓→ ", theme.info, "Move cursor"),
            key_line("Enter ", theme.info, "Select cursor square"),
            Line::raw(""),
            key_line("a ", theme.positive, "Undo move"),
            key_line("s ", theme.positive, "Reset game"),
            key_line("d ", theme.positive, "Toggle sound"),
            Line::raw(""),
            key_line("q/Esc ", theme.negative, "Quit"),
        ];

        Paragraph::new(lines).render(inner, buf);
    }
}
