//! Terminal chess front-end: the game-loop orchestrator, the start menu and
//! the ratatui rendering around them.

pub mod config;
pub mod core;
pub mod menu;
pub mod sound;
pub mod ui;

pub use crate::core::input::{Control, InputEvent};
pub use crate::core::turn::SeatConfig;
pub use crate::core::{AnimationSettings, LoopPhase, Orchestrator, TickOutcome};
