pub mod app;
pub mod geometry;
pub mod input;
pub mod render;
pub mod widgets;

pub use app::{run_app, AppOptions};
