//! Application layer managing state and user workflows.
//!
//! This module sits between the domain and presentation layers: it owns the
//! editor instance and turns user intents into grid operations.

pub mod state;

pub use state::*;
