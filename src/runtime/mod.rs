//! Runtime module - Engine, response bus and the autonomous step loop.

mod bus;
mod engine;
mod step_loop;

pub use bus::*;
pub use engine::*;
pub use step_loop::*;
