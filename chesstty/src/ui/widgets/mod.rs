pub mod board;
pub mod controls_panel;
pub mod end_game;
pub mod info_panel;
pub mod menu;

pub use board::BoardWidget;
pub use controls_panel::ControlsPanel;
pub use end_game::EndGameOverlay;
pub use info_panel::InfoPanel;
pub use menu::MenuWidget;
