//! Compute module - Board model, pattern catalog and generation stepping.

mod board;
mod patterns;
mod simulation;

pub use board::*;
pub use patterns::*;
pub use simulation::*;
