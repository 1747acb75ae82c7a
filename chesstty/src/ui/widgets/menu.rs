use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::menu::MenuState;
use crate::ui::render::RenderContext;

#[rustfmt::skip]
const TITLE: [&str; 5] = [
    " ██████ ██   ██ ███████ ███████ ███████ ████████ ████████ ██    ██",
    "██      ██   ██ ██      ██      ██         ██       ██     ██  ██ ",
    "██      ███████ █████   ███████ ███████    ██       ██      ████  ",
    "██      ██   ██ ██           ██      ██    ██       ██       ██   ",
    " ██████ ██   ██ ███████ ███████ ███████    ██       ██       ██   ",
];

pub struct MenuWidget<'a> {
    pub ctx: &'a RenderContext,
    pub state: MenuState,
    pub sound_enabled: bool,
}

impl MenuWidget<'_> {
    fn options(&self) -> (&'static str, Vec<(&'static str, &'static str)>) {
        match self.state {
            MenuState::TitleScreen => ("", vec![("Enter", "Start")]),
            MenuState::SideSelect => (
                "Choose players",
                vec![
                    ("1", "Human vs Human"),
                    ("2", "Human vs Engine"),
                    ("3", "Engine vs Engine"),
                    ("4", "Quit"),
                ],
            ),
            MenuState::ConfirmSelect => (
                "Play as",
                vec![("1", "White"), ("2", "Black")],
            ),
            MenuState::Done(_) => ("", Vec::new()),
        }
    }
}

impl Widget for MenuWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let theme = &self.ctx.theme;
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.panel_border));
        let inner = block.inner(area);
        block.render(area, buf);

        let [_, title_area, _, options_area, footer_area] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(TITLE.len() as u16),
            Constraint::Length(2),
            Constraint::Length(7),
            Constraint::Fill(1),
        ])
        .areas(inner);

        let title_style = Style::default().fg(theme.light_square).add_modifier(Modifier::BOLD);
        Paragraph::new(TITLE.iter().map(|line| Line::styled(*line, title_style)).collect::<Vec<_>>())
            .alignment(Alignment::Center)
            .render(title_area, buf);

        let (heading, options) = self.options();
        let mut lines = Vec::new();
        if !heading.is_empty() {
            lines.push(Line::styled(
                heading,
                Style::default().fg(theme.warning).add_modifier(Modifier::BOLD),
            ));
            lines.push(Line::raw(""));
        }
        for (key, label) in options {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("[{}] ", key),
                    Style::default().fg(theme.positive).add_modifier(Modifier::BOLD),
                ),
                Span::styled(label, Style::default().fg(theme.text_primary)),
            ]));
        }
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(options_area, buf);

        let footer = Line::from(vec![
            Span::styled("d ", Style::default().fg(theme.info)),
            Span::styled(
                format!("sound {}", if self.sound_enabled { "on" } else { "off" }),
                Style::default().fg(theme.muted),
            ),
            Span::styled("   q ", Style::default().fg(theme.info)),
            Span::styled("quit", Style::default().fg(theme.muted)),
        ]);
        Paragraph::new(footer)
            .alignment(Alignment::Center)
            .render(footer_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::render::Theme;

    fn rendered(state: MenuState) -> String {
        let ctx = RenderContext::load(Theme::default()).unwrap();
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        MenuWidget {
            ctx: &ctx,
            state,
            sound_enabled: true,
        }
        .render(area, &mut buf);
        buf.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn side_select_lists_four_choices() {
        let text = rendered(MenuState::SideSelect);
        for label in ["Human vs Human", "Human vs Engine", "Engine vs Engine", "Quit"] {
            assert!(text.contains(label), "missing {label}");
        }
    }

    #[test]
    fn confirm_select_asks_for_side() {
        let text = rendered(MenuState::ConfirmSelect);
        assert!(text.contains("Play as"));
        assert!(text.contains("White"));
        assert!(text.contains("Black"));
    }
}
