use chess::{Game, TerminalState};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::core::turn::SeatConfig;
use crate::ui::render::RenderContext;

/// Side to move, who plays it, engine activity and the outcome
pub struct InfoPanel<'a> {
    pub ctx: &'a RenderContext,
    pub game: &'a Game,
    pub seats: SeatConfig,
    pub thinking: bool,
    pub terminal: TerminalState,
    pub sound_enabled: bool,
}

impl Widget for InfoPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let theme = &self.ctx.theme;
        let block = Block::default()
            .title("Game Info")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.panel_border));
        let inner = block.inner(area);
        block.render(area, buf);

        let label = Style::default().fg(theme.warning).add_modifier(Modifier::BOLD);
        let side = self.game.side_to_move();
        let mut lines = vec![
            Line::from(vec![
                Span::styled("White: ", label),
                Span::raw(self.seats.label(chess::PieceColor::White)),
            ]),
            Line::from(vec![
                Span::styled("Black: ", label),
                Span::raw(self.seats.label(chess::PieceColor::Black)),
            ]),
            Line::raw(""),
        ];

        match self.terminal.message() {
            Some(message) => {
                let color = match self.terminal {
                    TerminalState::Stalemate => theme.info,
                    _ => theme.negative,
                };
                lines.push(Line::from(Span::styled(
                    message,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(Span::styled(
                    "Press s to play again",
                    Style::default().fg(theme.muted),
                )));
            }
            None => {
                lines.push(Line::from(vec![
                    Span::styled("To move: ", label),
                    Span::styled(
                        format!("{} ({})", side.title(), self.seats.label(side)),
                        Style::default().fg(theme.text_bright),
                    ),
                ]));
                if self.thinking {
                    lines.push(Line::from(Span::styled(
                        "Engine thinking…",
                        Style::default().fg(theme.positive).add_modifier(Modifier::ITALIC),
                    )));
                }
            }
        }

        lines.push(Line::raw(""));
        let last = self
            .game
            .history()
            .last()
            .map(|entry| entry.san.clone())
            .unwrap_or_else(|| "-".to_string());
        lines.push(Line::from(vec![
            Span::styled("Last move: ", label),
            Span::raw(last),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Moves: ", label),
            Span::raw(self.game.history().len().to_string()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Sound: ", label),
            Span::raw(if self.sound_enabled { "on" } else { "off" }),
        ]));

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
