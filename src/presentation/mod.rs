//! Presentation layer handling terminal UI and user input.
//!
//! Rendering uses ratatui; keyboard and mouse events come from crossterm.

pub mod ui;
pub mod input;

pub use ui::*;
pub use input::*;
