//! In-process host - the engine lives with its caller.

use super::{HostError, ResponseCallback, SimulationHost};
use crate::runtime::LifeEngine;
use crate::schema::{Command, EngineSettings};

/// Hosts an engine in the caller's context.
///
/// Commands run on the sending thread and callbacks subscribe to the
/// engine's bus directly. Autonomous steps still run on the engine's step
/// loop thread.
pub struct InProcessHost {
    engine: LifeEngine,
}

impl InProcessHost {
    pub fn new(settings: &EngineSettings) -> Self {
        Self {
            engine: LifeEngine::new(settings),
        }
    }

    /// The hosted engine.
    pub fn engine(&self) -> &LifeEngine {
        &self.engine
    }
}

impl SimulationHost for InProcessHost {
    fn send(&self, cmd: Command) -> Result<(), HostError> {
        self.engine.execute(cmd);
        Ok(())
    }

    fn on_response(&self, callback: ResponseCallback) {
        self.engine.subscribe(callback);
    }
}
