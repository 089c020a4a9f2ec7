//! Worker host - the engine runs isolated on its own thread.
//!
//! Everything crossing the boundary is JSON text: commands are encoded by
//! the host and decoded by the worker, responses the other way round. A
//! listener thread decodes responses before handing them to callbacks.
//! Messages that fail to decode are logged and dropped.

use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};
use log::{debug, error, warn};

use super::{HostError, ResponseCallback, SimulationHost};
use crate::runtime::{LifeEngine, ResponseBus};
use crate::schema::{Command, EngineSettings, Response};

/// Hosts an engine on a dedicated worker thread.
pub struct WorkerHost {
    commands: Option<Sender<String>>,
    callbacks: ResponseBus,
    worker: Option<JoinHandle<()>>,
    listener: Option<JoinHandle<()>>,
}

impl WorkerHost {
    /// Spawn the worker and listener threads.
    pub fn spawn(settings: &EngineSettings) -> Result<Self, HostError> {
        let (command_tx, command_rx) = crossbeam_channel::unbounded::<String>();
        let (response_tx, response_rx) = crossbeam_channel::unbounded::<String>();

        let worker_settings = settings.clone();
        let worker = thread::Builder::new()
            .name("life-worker".into())
            .spawn(move || run_worker(&worker_settings, command_rx, response_tx))?;

        let callbacks = ResponseBus::new();
        let listener_bus = callbacks.clone();
        let listener = thread::Builder::new()
            .name("life-worker-listener".into())
            .spawn(move || run_listener(response_rx, listener_bus))?;

        Ok(Self {
            commands: Some(command_tx),
            callbacks,
            worker: Some(worker),
            listener: Some(listener),
        })
    }

    /// Post a raw message to the worker, bypassing command encoding.
    pub fn post_message(&self, message: impl Into<String>) -> Result<(), HostError> {
        self.commands
            .as_ref()
            .ok_or(HostError::Disconnected)?
            .send(message.into())
            .map_err(|_| HostError::Disconnected)
    }
}

impl SimulationHost for WorkerHost {
    fn send(&self, cmd: Command) -> Result<(), HostError> {
        let message = serde_json::to_string(&cmd)?;
        self.post_message(message)
    }

    fn on_response(&self, callback: ResponseCallback) {
        self.callbacks.subscribe(callback);
    }
}

impl Drop for WorkerHost {
    fn drop(&mut self) {
        // Closing the command channel ends the worker, which drops the
        // engine and with it the response channel the listener drains.
        drop(self.commands.take());
        for handle in [self.worker.take(), self.listener.take()].into_iter().flatten() {
            if handle.thread().id() == thread::current().id() {
                continue;
            }
            let name = handle.thread().name().unwrap_or("worker").to_owned();
            if handle.join().is_err() {
                error!("{name} thread panicked");
            }
        }
    }
}

fn run_worker(settings: &EngineSettings, commands: Receiver<String>, responses: Sender<String>) {
    let engine = LifeEngine::new(settings);
    engine.subscribe(move |resp: &Response| match serde_json::to_string(resp) {
        Ok(message) => {
            if responses.send(message).is_err() {
                debug!("listener gone, dropping {:?} response", resp.cmd.kind());
            }
        }
        Err(e) => error!("failed to encode response: {e}"),
    });

    for message in commands.iter() {
        match serde_json::from_str::<Command>(&message) {
            Ok(cmd) => engine.execute(cmd),
            Err(e) => warn!("dropping malformed command: {e}"),
        }
    }

    engine.stop();
}

fn run_listener(responses: Receiver<String>, callbacks: ResponseBus) {
    for message in responses.iter() {
        match serde_json::from_str::<Response>(&message) {
            Ok(resp) => callbacks.publish(&resp),
            Err(e) => warn!("dropping malformed response: {e}"),
        }
    }
}
