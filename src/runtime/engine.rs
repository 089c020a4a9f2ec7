//! Life engine - command dispatch, readiness and the autonomous step loop.
//!
//! The engine wraps a [`Simulation`] behind a mutex and publishes every
//! state change on a [`ResponseBus`]. Responses are published while the
//! simulation is locked, so observers see them in state-change order.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use log::{debug, error, warn};

use super::{ResponseBus, StepLoop};
use crate::compute::{BoardDimensions, Cell, PatternKind, Simulation};
use crate::schema::{Command, Configuration, EngineSettings, Response};

/// State shared between the engine handle and its step loop.
struct Shared {
    simulation: Mutex<Simulation>,
    bus: ResponseBus,
    ready: AtomicBool,
    /// Set while a step runs.
    stepping: AtomicBool,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Simulation> {
        self.simulation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn step(&self) -> bool {
        let Some(_guard) = StepGuard::acquire(&self.stepping) else {
            return false;
        };

        let start = Instant::now();
        let mut simulation = self.lock();
        let generation = simulation.step().to_vec();
        self.bus
            .publish(&Response::cells(Command::CycleRefreshed, generation));
        debug!("step duration: {:?}", start.elapsed());
        true
    }
}

/// Holds the in-progress flag for the duration of one step.
struct StepGuard<'a>(&'a AtomicBool);

impl<'a> StepGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for StepGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// The Life simulation engine.
///
/// States: uninitialized until the first successful `INIT`, running while
/// ready, stopped after [`LifeEngine::stop`]. Every call returns as soon as
/// its command is applied; generations surface through subscribers.
pub struct LifeEngine {
    shared: Arc<Shared>,
    cadence: Duration,
    step_loop: Mutex<Option<StepLoop>>,
}

impl LifeEngine {
    /// Create an engine from runtime settings.
    pub fn new(settings: &EngineSettings) -> Self {
        Self::with_simulation(Simulation::new(settings.random_seed), settings.cadence())
    }

    /// Create an engine around an existing simulation.
    pub fn with_simulation(simulation: Simulation, cadence: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                simulation: Mutex::new(simulation),
                bus: ResponseBus::new(),
                ready: AtomicBool::new(false),
                stepping: AtomicBool::new(false),
            }),
            cadence,
            step_loop: Mutex::new(None),
        }
    }

    /// Register a response observer.
    pub fn subscribe<F>(&self, subscriber: F)
    where
        F: Fn(&Response) + Send + Sync + 'static,
    {
        self.shared.bus.subscribe(subscriber);
    }

    /// Apply one command.
    pub fn execute(&self, cmd: Command) {
        match cmd {
            Command::Init { config } => self.init(config),
            Command::FetchNextGen => {
                let simulation = self.shared.lock();
                self.shared.bus.publish(&Response::cells(
                    Command::FetchNextGen,
                    simulation.generation().to_vec(),
                ));
            }
            Command::AddPattern { pattern } => match PatternKind::from_name(&pattern) {
                Some(kind) => {
                    let mut simulation = self.shared.lock();
                    simulation.queue_pattern(kind);
                    self.shared
                        .bus
                        .publish(&Response::ack(Command::AddPattern { pattern }));
                }
                None => debug!("ignoring unknown pattern {pattern:?}"),
            },
            Command::AddCustomPattern { pattern } => {
                self.shared.lock().queue_cells(pattern);
            }
            Command::CycleRefreshed => {}
            Command::Stop => self.stop(),
        }
    }

    /// Run one step now and publish `CYCLE_REFRESHED`.
    ///
    /// Returns false without stepping if another step is in progress.
    pub fn step(&self) -> bool {
        self.shared.step()
    }

    /// Clear readiness and stop the autonomous loop.
    ///
    /// A step already in flight completes and publishes before this returns.
    pub fn stop(&self) {
        self.shared.ready.store(false, Ordering::Release);
        let step_loop = self
            .step_loop
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(step_loop) = step_loop {
            step_loop.cancel();
        }
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.shared.ready.load(Ordering::Acquire)
    }

    /// Snapshot of the current generation.
    pub fn generation(&self) -> Vec<Cell> {
        self.shared.lock().generation().to_vec()
    }

    /// Snapshot of the pending pattern queue.
    pub fn pending_pattern(&self) -> Vec<Cell> {
        self.shared.lock().pending().to_vec()
    }

    pub fn dimensions(&self) -> BoardDimensions {
        self.shared.lock().dimensions()
    }

    fn init(&self, config: Configuration) {
        {
            let mut simulation = self.shared.lock();
            if let Err(e) = simulation.reset(&config) {
                warn!("rejecting INIT: {e}");
                self.shared
                    .bus
                    .publish(&Response::rejected(Command::Init { config }));
                return;
            }
            self.shared.ready.store(true, Ordering::Release);
            self.shared
                .bus
                .publish(&Response::ack(Command::Init { config }));
        }
        self.start_loop();
    }

    /// Start the autonomous loop, replacing one left by an earlier `INIT`.
    fn start_loop(&self) {
        let mut slot = self
            .step_loop
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.take() {
            previous.cancel();
        }

        let shared = Arc::clone(&self.shared);
        let spawned = StepLoop::spawn(self.cadence, move || {
            if !shared.ready.load(Ordering::Acquire) {
                return ControlFlow::Break(());
            }
            if !shared.step() {
                debug!("prior step did not complete, skipping tick");
            }
            ControlFlow::Continue(())
        });

        match spawned {
            Ok(step_loop) => *slot = Some(step_loop),
            Err(e) => {
                error!("failed to start step loop: {e}");
                self.shared.ready.store(false, Ordering::Release);
            }
        }
    }
}

impl Drop for LifeEngine {
    fn drop(&mut self) {
        self.stop();
    }
}
