//! Infrastructure layer providing external service integrations.
//!
//! Currently this is the settings file on disk.

pub mod persistence;

pub use persistence::*;
