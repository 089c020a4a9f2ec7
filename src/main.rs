//! Life Engine CLI - Run a headless session from JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use life_engine::{BridgeConfig, Configuration, LifeBridge};

/// How long to wait for the engine to acknowledge `INIT`.
const READY_TIMEOUT: Duration = Duration::from_secs(5);

/// A headless session: where the engine runs, the board and patterns to queue.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SessionConfig {
    #[serde(default)]
    bridge: BridgeConfig,
    #[serde(default)]
    board: Configuration,
    /// Catalog patterns queued right after the board is ready.
    #[serde(default)]
    patterns: Vec<String>,
}

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <session.json> [generations]", args[0]);
        eprintln!();
        eprintln!("Run a headless Game of Life session from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  session.json  Path to session configuration file");
        eprintln!("  generations   Number of boards to receive (default: 20)");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_session();
        return;
    }

    let session_path = PathBuf::from(&args[1]);
    let generations: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(20);

    let session_str = fs::read_to_string(&session_path).unwrap_or_else(|e| {
        eprintln!("Error reading session file: {}", e);
        std::process::exit(1);
    });

    let session: SessionConfig = serde_json::from_str(&session_str).unwrap_or_else(|e| {
        eprintln!("Error parsing session: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = session.board.validate() {
        eprintln!("Invalid board: {}", e);
        std::process::exit(1);
    }

    let dims = session.board.dimensions();
    println!("Life Engine Session");
    println!("===================");
    println!("Mode: {:?}", session.bridge.mode);
    println!(
        "Board: {}x{} cells ({}x{} px)",
        dims.width, dims.height, session.board.board_width, session.board.board_height
    );
    println!("Live cells: {}", session.board.number_of_live_cell);
    println!("Cadence: {} ms", session.bridge.engine.cadence_ms);
    println!("Generations: {}", generations);
    println!();

    let bridge = LifeBridge::new(&session.bridge).unwrap_or_else(|e| {
        eprintln!("Error starting engine: {}", e);
        std::process::exit(1);
    });
    let ready = bridge.ready_stream();
    let boards = bridge.board_stream();

    let start = Instant::now();
    if let Err(e) = bridge.init(session.board) {
        eprintln!("Error sending INIT: {}", e);
        std::process::exit(1);
    }
    if ready.recv_timeout(READY_TIMEOUT).is_err() {
        eprintln!("Engine did not become ready");
        std::process::exit(1);
    }

    for pattern in &session.patterns {
        if let Err(e) = bridge.add(pattern) {
            eprintln!("Error queueing pattern {:?}: {}", pattern, e);
        }
    }

    for generation in 0..generations {
        match boards.recv() {
            Ok(board) => println!("Board {:4}: {:6} live cells", generation, board.len()),
            Err(_) => {
                eprintln!("Board stream closed");
                break;
            }
        }
    }

    if let Err(e) = bridge.stop() {
        eprintln!("Error stopping engine: {}", e);
    }

    let elapsed = start.elapsed();
    println!();
    println!("Completed in {:.2?}", elapsed);
    println!(
        "Average: {:.3} ms per board",
        elapsed.as_secs_f64() * 1000.0 / generations.max(1) as f64
    );
}

fn print_example_session() {
    let session = SessionConfig {
        patterns: vec!["glider".into(), "light-weight spaceship".into()],
        ..SessionConfig::default()
    };

    println!("Example session (session.json):");
    match serde_json::to_string_pretty(&session) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error encoding example: {}", e),
    }
}
