//! TUI module for the flashcard application.

mod app;
mod theme;
mod widgets;

pub use app::App;
