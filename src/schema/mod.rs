//! Schema module - Configuration and protocol types for the Life engine.

mod config;
mod protocol;

pub use config::*;
pub use protocol::*;
