//! Shared building blocks for the takehome workspace.
//!
//! Holds response types used by more than one crate and the tracing
//! initialisation helpers the binaries call on startup.

pub mod types;
pub mod utils;
