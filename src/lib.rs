//! tmap - Terminal Table Map Editor
//!
//! Edits a fixed 16x16 numeric table: set, step, clear, interpolate and
//! Gaussian-smooth selections from a terminal UI.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
