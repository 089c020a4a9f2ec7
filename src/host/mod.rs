//! Execution hosts - where the engine runs relative to its caller.
//!
//! A host accepts commands and reports responses through callbacks. The
//! two implementations are interchangeable and emit identical response
//! sequences; they differ only in isolation and latency.
//!
//! - [`WorkerHost`]: engine on a dedicated thread behind a JSON message boundary
//! - [`InProcessHost`]: engine in the caller's context, no serialization

mod in_process;
mod worker;

use std::sync::Arc;

pub use in_process::InProcessHost;
pub use worker::WorkerHost;

use crate::runtime::Subscriber;
use crate::schema::{Command, EngineSettings, ExecutionMode};

/// Callback receiving every response the hosted engine emits.
pub type ResponseCallback = Subscriber;

/// A context hosting a Life engine.
pub trait SimulationHost: Send + Sync {
    /// Hand a command to the engine. Never waits for the engine's work.
    fn send(&self, cmd: Command) -> Result<(), HostError>;

    /// Register a response callback.
    fn on_response(&self, callback: ResponseCallback);
}

/// Create the host selected by `mode`.
pub fn spawn_host(
    mode: ExecutionMode,
    settings: &EngineSettings,
) -> Result<Arc<dyn SimulationHost>, HostError> {
    let host: Arc<dyn SimulationHost> = match mode {
        ExecutionMode::Worker => Arc::new(WorkerHost::spawn(settings)?),
        ExecutionMode::InProcess => Arc::new(InProcessHost::new(settings)),
    };
    Ok(host)
}

/// Error type for host communication.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("Failed to spawn engine thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Engine context is no longer running")]
    Disconnected,

    #[error("Failed to encode command: {0}")]
    Encode(#[from] serde_json::Error),
}
