//! Start menu as an explicit state machine.
//!
//! ```text
//! TitleScreen --Enter--> SideSelect --1--> Done(both human)
//!                                   --2--> ConfirmSelect --1--> Done(White human)
//!                                   --3--> Done(both engine)   --2--> Done(Black human)
//!                                   --4--> Done(Quit)
//! ```
//! `Quit` leaves from any state.

use chess::PieceColor;

use crate::core::turn::SeatConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEvent {
    Enter,
    /// A number key, `1` to `4`.
    Choice(u8),
    ToggleSound,
    Quit,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuResult {
    Start(SeatConfig),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuState {
    #[default]
    TitleScreen,
    SideSelect,
    ConfirmSelect,
    Done(MenuResult),
}

impl MenuState {
    /// The transition table.
    pub fn on_event(self, event: MenuEvent) -> MenuState {
        use MenuState::{ConfirmSelect, Done, SideSelect, TitleScreen};

        match (self, event) {
            (Done(_), _) => self,
            (_, MenuEvent::Quit) => Done(MenuResult::Quit),

            (TitleScreen, MenuEvent::Enter) => SideSelect,

            (SideSelect, MenuEvent::Choice(1)) => Done(MenuResult::Start(SeatConfig::human_vs_human())),
            (SideSelect, MenuEvent::Choice(2)) => ConfirmSelect,
            (SideSelect, MenuEvent::Choice(3)) => Done(MenuResult::Start(SeatConfig::engine_vs_engine())),
            (SideSelect, MenuEvent::Choice(4)) => Done(MenuResult::Quit),

            (ConfirmSelect, MenuEvent::Choice(1)) => {
                Done(MenuResult::Start(SeatConfig::human_as(PieceColor::White)))
            }
            (ConfirmSelect, MenuEvent::Choice(2)) => {
                Done(MenuResult::Start(SeatConfig::human_as(PieceColor::Black)))
            }

            _ => self,
        }
    }

    pub fn result(self) -> Option<MenuResult> {
        match self {
            MenuState::Done(result) => Some(result),
            _ => None,
        }
    }
}

/// Menu state plus the sound toggle, which every screen honours.
#[derive(Debug, Clone, Default)]
pub struct Menu {
    state: MenuState,
    sound_enabled: bool,
}

impl Menu {
    pub fn new(sound_enabled: bool) -> Self {
        Self {
            state: MenuState::TitleScreen,
            sound_enabled,
        }
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    /// Single entry point for menu input.
    pub fn dispatch(&mut self, event: MenuEvent) -> Option<MenuResult> {
        if event == MenuEvent::ToggleSound {
            self.sound_enabled = !self.sound_enabled;
            tracing::debug!(enabled = self.sound_enabled, "Menu sound toggled");
        } else {
            let next = self.state.on_event(event);
            if next != self.state {
                tracing::debug!(from = ?self.state, to = ?next, "Menu transition");
            }
            self.state = next;
        }
        self.state.result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(events: &[MenuEvent]) -> MenuState {
        events
            .iter()
            .fold(MenuState::default(), |state, event| state.on_event(*event))
    }

    #[test]
    fn title_needs_enter() {
        assert_eq!(run(&[MenuEvent::Choice(1)]), MenuState::TitleScreen);
        assert_eq!(run(&[MenuEvent::Enter]), MenuState::SideSelect);
    }

    #[test]
    fn side_select_choices() {
        assert_eq!(
            run(&[MenuEvent::Enter, MenuEvent::Choice(1)]).result(),
            Some(MenuResult::Start(SeatConfig::new(true, true)))
        );
        assert_eq!(
            run(&[MenuEvent::Enter, MenuEvent::Choice(2)]),
            MenuState::ConfirmSelect
        );
        assert_eq!(
            run(&[MenuEvent::Enter, MenuEvent::Choice(3)]).result(),
            Some(MenuResult::Start(SeatConfig::new(false, false)))
        );
        assert_eq!(
            run(&[MenuEvent::Enter, MenuEvent::Choice(4)]).result(),
            Some(MenuResult::Quit)
        );
    }

    #[test]
    fn confirm_select_picks_human_side() {
        let base = [MenuEvent::Enter, MenuEvent::Choice(2)];
        assert_eq!(
            run(&[base[0], base[1], MenuEvent::Choice(1)]).result(),
            Some(MenuResult::Start(SeatConfig::new(true, false)))
        );
        assert_eq!(
            run(&[base[0], base[1], MenuEvent::Choice(2)]).result(),
            Some(MenuResult::Start(SeatConfig::new(false, true)))
        );
        assert_eq!(
            run(&[base[0], base[1], MenuEvent::Choice(3)]),
            MenuState::ConfirmSelect
        );
    }

    #[test]
    fn quit_from_anywhere() {
        assert_eq!(run(&[MenuEvent::Quit]).result(), Some(MenuResult::Quit));
        assert_eq!(
            run(&[MenuEvent::Enter, MenuEvent::Choice(2), MenuEvent::Quit]).result(),
            Some(MenuResult::Quit)
        );
    }

    #[test]
    fn done_is_absorbing() {
        let done = run(&[MenuEvent::Enter, MenuEvent::Choice(1)]);
        assert_eq!(done.on_event(MenuEvent::Quit), done);
    }

    #[test]
    fn sound_toggle_does_not_transition() {
        let mut menu = Menu::new(true);
        menu.dispatch(MenuEvent::Enter);
        assert_eq!(menu.dispatch(MenuEvent::ToggleSound), None);
        assert_eq!(menu.state(), MenuState::SideSelect);
        assert!(!menu.sound_enabled());
    }
}
