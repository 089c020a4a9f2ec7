//! Life Engine - Conway's Game of Life behind a command/response boundary.
//!
//! The engine seeds a board, advances it autonomously on a fixed cadence and
//! answers commands with responses. A bridge gives callers three streams
//! (readiness, pattern acknowledgements and boards) and keeps a pull loop
//! running so the consumer always receives the latest generation.
//!
//! # Architecture
//!
//! - `compute`: board, Life rule, pattern catalog and seeding
//! - `schema`: configuration and the wire protocol
//! - `runtime`: the engine, its response bus and the step loop
//! - `host`: worker-thread and in-process execution contexts
//! - `bridge`: the caller-facing [`LifeBridge`]
//!
//! # Example
//!
//! ```rust,no_run
//! use life_engine::{BridgeConfig, Configuration, LifeBridge};
//!
//! let bridge = LifeBridge::new(&BridgeConfig::default()).unwrap();
//! let boards = bridge.board_stream();
//!
//! bridge.init(Configuration::default()).unwrap();
//! bridge.add("glider").unwrap();
//!
//! for board in boards.iter().take(10) {
//!     println!("{} live cells", board.len());
//! }
//! bridge.stop().unwrap();
//! ```

pub mod bridge;
pub mod compute;
pub mod host;
pub mod runtime;
pub mod schema;

// Re-export commonly used types
pub use bridge::{BridgeError, LifeBridge};
pub use compute::{Board, BoardDimensions, Cell, PatternKind, Simulation};
pub use host::{HostError, InProcessHost, SimulationHost, WorkerHost};
pub use runtime::LifeEngine;
pub use schema::{
    BridgeConfig, Command, ConfigError, Configuration, EngineSettings, ExecutionMode, Payload,
    Response,
};
