//! Execution bridge - the caller-facing surface of the engine.
//!
//! The bridge owns a [`SimulationHost`] and a pump thread. Host callbacks
//! only forward responses into a channel; the pump demultiplexes them into
//! three streams and drives the pull loop that keeps exactly one
//! `FETCH_NEXT_GEN` outstanding while pulling. A board the consumer has not
//! taken yet is held aside and replaced by newer generations, so a slow
//! board reader never delays the flag streams.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, RecvError, Select, Sender};
use log::{debug, error, warn};

use crate::compute::Cell;
use crate::host::{self, HostError, SimulationHost};
use crate::schema::{
    BridgeConfig, Command, CommandKind, ConfigError, Configuration, Payload, Response,
};

/// Error type for bridge construction and commands.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Invalid bridge configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Host(#[from] HostError),
}

/// Messages from the bridge handle to its pump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    /// Start pulling generations.
    Resume,
    /// Stop pulling; an in-flight fetch still resolves.
    Halt,
    /// Exit the pump.
    Shutdown,
}

/// Caller-facing handle to a hosted Life engine.
pub struct LifeBridge {
    host: Arc<dyn SimulationHost>,
    control: Sender<Control>,
    ready: Receiver<bool>,
    pattern_added: Receiver<bool>,
    board: Receiver<Vec<Cell>>,
    pump: Option<JoinHandle<()>>,
}

impl LifeBridge {
    /// Create a bridge and the host selected by `config.mode`.
    pub fn new(config: &BridgeConfig) -> Result<Self, BridgeError> {
        config.validate()?;
        let host = host::spawn_host(config.mode, &config.engine)?;
        Self::with_host(host, config.board_buffer)
    }

    /// Create a bridge around an existing host.
    ///
    /// `board_buffer` bounds how many boards queue up ahead of the consumer.
    pub fn with_host(
        host: Arc<dyn SimulationHost>,
        board_buffer: usize,
    ) -> Result<Self, BridgeError> {
        let (response_tx, response_rx) = crossbeam_channel::unbounded::<Response>();
        let (control_tx, control_rx) = crossbeam_channel::unbounded();
        let (ready_tx, ready_rx) = crossbeam_channel::unbounded();
        let (pattern_tx, pattern_rx) = crossbeam_channel::unbounded();
        let (board_tx, board_rx) = crossbeam_channel::bounded(board_buffer.max(1));

        host.on_response(Box::new(move |resp: &Response| {
            if response_tx.send(resp.clone()).is_err() {
                debug!("bridge gone, dropping {:?} response", resp.cmd.kind());
            }
        }));

        let pump = Pump {
            host: Arc::clone(&host),
            pulling: false,
            in_flight: false,
            ready: ready_tx,
            pattern_added: pattern_tx,
            board: board_tx,
            pending_board: None,
        };
        let pump = thread::Builder::new()
            .name("life-bridge".into())
            .spawn(move || pump.run(&response_rx, &control_rx))
            .map_err(HostError::Spawn)?;

        Ok(Self {
            host,
            control: control_tx,
            ready: ready_rx,
            pattern_added: pattern_rx,
            board: board_rx,
            pump: Some(pump),
        })
    }

    /// Start a simulation and resume pulling generations.
    pub fn init(&self, config: Configuration) -> Result<(), HostError> {
        self.signal(Control::Resume);
        self.host.send(Command::Init { config })
    }

    /// Queue a catalog pattern. Names are matched case-insensitively.
    pub fn add(&self, name: &str) -> Result<(), HostError> {
        self.host.send(Command::AddPattern {
            pattern: name.to_lowercase(),
        })
    }

    /// Queue explicit cells. The engine does not acknowledge these.
    pub fn add_custom_shape(&self, cells: Vec<Cell>) -> Result<(), HostError> {
        self.host.send(Command::AddCustomPattern { pattern: cells })
    }

    /// Stop pulling and stop the engine's autonomous loop.
    pub fn stop(&self) -> Result<(), HostError> {
        self.signal(Control::Halt);
        self.host.send(Command::Stop)
    }

    /// Pulses `true` whenever an `INIT` is acknowledged.
    pub fn ready_stream(&self) -> Receiver<bool> {
        self.ready.clone()
    }

    /// Pulses `true` whenever a catalog pattern is accepted.
    pub fn pattern_added_stream(&self) -> Receiver<bool> {
        self.pattern_added.clone()
    }

    /// Generations, from both fetches and autonomous steps.
    pub fn board_stream(&self) -> Receiver<Vec<Cell>> {
        self.board.clone()
    }

    fn signal(&self, control: Control) {
        if self.control.send(control).is_err() {
            error!("bridge pump is gone, {control:?} not delivered");
        }
    }
}

impl Drop for LifeBridge {
    fn drop(&mut self) {
        self.signal(Control::Shutdown);
        if let Some(pump) = self.pump.take() {
            if pump.join().is_err() {
                error!("bridge pump panicked");
            }
        }
    }
}

/// Pump-thread state.
struct Pump {
    host: Arc<dyn SimulationHost>,
    pulling: bool,
    /// A `FETCH_NEXT_GEN` has been sent and not yet answered.
    in_flight: bool,
    ready: Sender<bool>,
    pattern_added: Sender<bool>,
    board: Sender<Vec<Cell>>,
    /// Newest generation the board stream has not accepted yet.
    pending_board: Option<Vec<Cell>>,
}

/// One wake-up of the pump.
enum Event {
    Control(Result<Control, RecvError>),
    Response(Result<Response, RecvError>),
    BoardDelivered,
}

impl Pump {
    fn run(mut self, responses: &Receiver<Response>, control: &Receiver<Control>) {
        loop {
            let flow = match self.next_event(responses, control) {
                Event::Control(Ok(msg)) => self.apply(msg),
                Event::Control(Err(_)) => ControlFlow::Break(()),
                // Control sent before a command must land before its response
                Event::Response(Ok(resp)) => match self.drain(control) {
                    ControlFlow::Continue(()) => {
                        self.dispatch(resp);
                        ControlFlow::Continue(())
                    }
                    brk => brk,
                },
                Event::Response(Err(_)) => {
                    debug!("host closed the response channel");
                    ControlFlow::Break(())
                }
                Event::BoardDelivered => {
                    self.request_next_generation();
                    ControlFlow::Continue(())
                }
            };
            if flow.is_break() {
                break;
            }
        }
        debug!("bridge pump exiting");
    }

    /// Wait for a control message, a response, or room for the pending board.
    ///
    /// Responses keep flowing while the board stream is full, so the flag
    /// streams never wait on the board consumer.
    fn next_event(
        &mut self,
        responses: &Receiver<Response>,
        control: &Receiver<Control>,
    ) -> Event {
        let mut sel = Select::new();
        let control_op = sel.recv(control);
        let response_op = sel.recv(responses);
        if self.pending_board.is_some() {
            sel.send(&self.board);
        }

        let oper = sel.select();
        match oper.index() {
            i if i == control_op => Event::Control(oper.recv(control)),
            i if i == response_op => Event::Response(oper.recv(responses)),
            _ => {
                let cells = self.pending_board.take().unwrap_or_default();
                if oper.send(&self.board, cells).is_err() {
                    debug!("board stream closed");
                }
                Event::BoardDelivered
            }
        }
    }

    fn apply(&mut self, control: Control) -> ControlFlow<()> {
        match control {
            Control::Resume => self.pulling = true,
            Control::Halt => self.pulling = false,
            Control::Shutdown => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    fn drain(&mut self, control: &Receiver<Control>) -> ControlFlow<()> {
        while let Ok(msg) = control.try_recv() {
            self.apply(msg)?;
        }
        ControlFlow::Continue(())
    }

    fn dispatch(&mut self, resp: Response) {
        if !resp.success {
            warn!("engine rejected {:?}", resp.cmd.kind());
            return;
        }

        match resp.cmd.kind() {
            CommandKind::Init => {
                let acked = resp.payload == Payload::Flag(true);
                let _ = self.ready.send(acked);
                if acked {
                    self.request_next_generation();
                }
            }
            CommandKind::AddPattern => {
                let _ = self.pattern_added.send(true);
            }
            CommandKind::FetchNextGen | CommandKind::CycleRefreshed => {
                if resp.cmd.kind() == CommandKind::FetchNextGen {
                    self.in_flight = false;
                }
                let Payload::Cells(cells) = resp.payload else {
                    warn!("{:?} response without a generation", resp.cmd.kind());
                    return;
                };
                // The next fetch waits until the board stream accepts this one
                if self.pending_board.replace(cells).is_some() {
                    debug!("board stream full, replaced a stale generation");
                }
            }
            CommandKind::AddCustomPattern | CommandKind::Stop => {}
        }
    }

    fn request_next_generation(&mut self) {
        if !self.pulling || self.in_flight {
            return;
        }
        match self.host.send(Command::FetchNextGen) {
            Ok(()) => self.in_flight = true,
            Err(e) => error!("failed to request next generation: {e}"),
        }
    }
}
