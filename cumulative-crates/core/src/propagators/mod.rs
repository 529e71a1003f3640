//! Contains the propagators of the engine.
pub(crate) mod cumulative;

pub use cumulative::*;
