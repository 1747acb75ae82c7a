//! Terminal events to [`InputEvent`]s and [`MenuEvent`]s.

use chess::Coord;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use super::geometry::BoardGeometry;
use crate::core::input::{Control, InputEvent};
use crate::menu::MenuEvent;

/// Keyboard cursor for playing without a mouse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputMapper {
    cursor: Coord,
}

impl Default for InputMapper {
    fn default() -> Self {
        // e2, where most games start.
        Self {
            cursor: Coord::new(6, 4),
        }
    }
}

impl InputMapper {
    pub fn cursor(&self) -> Coord {
        self.cursor
    }

    /// Map one terminal event. Cursor movement is handled here and yields
    /// nothing for the orchestrator.
    pub fn map(&mut self, event: &Event, geometry: &BoardGeometry) -> Option<InputEvent> {
        match event {
            Event::Key(key) => self.map_key(key),
            Event::Mouse(mouse) => map_mouse(mouse, geometry),
            _ => None,
        }
    }

    fn map_key(&mut self, key: &KeyEvent) -> Option<InputEvent> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if is_ctrl_c(key) {
            return Some(Control::Quit.into());
        }

        match key.code {
            KeyCode::Char('a') => Some(Control::Undo.into()),
            KeyCode::Char('s') => Some(Control::Reset.into()),
            KeyCode::Char('d') => Some(Control::ToggleSound.into()),
            KeyCode::Char('q') | KeyCode::Esc => Some(Control::Quit.into()),
            KeyCode::Enter | KeyCode::Char(' ') => Some(InputEvent::SquareClicked(self.cursor)),
            KeyCode::Up => {
                self.cursor.row = self.cursor.row.saturating_sub(1);
                None
            }
            KeyCode::Down => {
                self.cursor.row = (self.cursor.row + 1).min(7);
                None
            }
            KeyCode::Left => {
                self.cursor.col = self.cursor.col.saturating_sub(1);
                None
            }
            KeyCode::Right => {
                self.cursor.col = (self.cursor.col + 1).min(7);
                None
            }
            _ => None,
        }
    }
}

fn map_mouse(mouse: &MouseEvent, geometry: &BoardGeometry) -> Option<InputEvent> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(InputEvent::SquareClicked(
            geometry.coord_at(mouse.column, mouse.row),
        )),
        _ => None,
    }
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Map a terminal event for the start menu.
pub fn map_menu_event(event: &Event) -> Option<MenuEvent> {
    let Event::Key(key) = event else {
        return None;
    };
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if is_ctrl_c(key) {
        return Some(MenuEvent::Quit);
    }

    Some(match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => MenuEvent::Enter,
        KeyCode::Char(c @ '1'..='4') => MenuEvent::Choice(c as u8 - b'0'),
        KeyCode::Char('d') => MenuEvent::ToggleSound,
        KeyCode::Char('q') | KeyCode::Esc => MenuEvent::Quit,
        _ => MenuEvent::Other,
    })
}
