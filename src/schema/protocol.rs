//! Command/response protocol between callers and the engine.
//!
//! Both types serialize to the JSON shape used across the worker boundary:
//! commands are tagged by `type`, responses carry the originating command
//! and an untagged payload.

use serde::{Deserialize, Serialize};

use super::Configuration;
use crate::compute::Cell;

/// A request to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    /// Start a fresh simulation.
    Init { config: Configuration },
    /// Tag of responses produced by autonomous steps. Executing it is a no-op.
    CycleRefreshed,
    /// Report the current generation without advancing it.
    FetchNextGen,
    /// Queue a catalog pattern by name.
    AddPattern { pattern: String },
    /// Queue an explicit list of cells.
    AddCustomPattern { pattern: Vec<Cell> },
    /// Clear readiness and stop the autonomous loop.
    Stop,
}

/// Discriminant of a [`Command`], used for dispatch and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Init,
    CycleRefreshed,
    FetchNextGen,
    AddPattern,
    AddCustomPattern,
    Stop,
}

impl Command {
    /// Get the command discriminant.
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Init { .. } => CommandKind::Init,
            Command::CycleRefreshed => CommandKind::CycleRefreshed,
            Command::FetchNextGen => CommandKind::FetchNextGen,
            Command::AddPattern { .. } => CommandKind::AddPattern,
            Command::AddCustomPattern { .. } => CommandKind::AddCustomPattern,
            Command::Stop => CommandKind::Stop,
        }
    }
}

/// Response payload: an acknowledgement flag or a generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Flag(bool),
    Cells(Vec<Cell>),
}

/// Engine output, always tied to the command that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub cmd: Command,
    pub success: bool,
    pub payload: Payload,
}

impl Response {
    /// Successful acknowledgement of `cmd`.
    pub fn ack(cmd: Command) -> Self {
        Self {
            cmd,
            success: true,
            payload: Payload::Flag(true),
        }
    }

    /// Rejection of `cmd`.
    pub fn rejected(cmd: Command) -> Self {
        Self {
            cmd,
            success: false,
            payload: Payload::Flag(false),
        }
    }

    /// Successful response carrying a generation.
    pub fn cells(cmd: Command, cells: Vec<Cell>) -> Self {
        Self {
            cmd,
            success: true,
            payload: Payload::Cells(cells),
        }
    }

    /// Whether this response carries a generation.
    #[inline]
    pub fn is_generation(&self) -> bool {
        matches!(
            self.cmd.kind(),
            CommandKind::FetchNextGen | CommandKind::CycleRefreshed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_command_wire_shape() {
        let cmd = Command::Init {
            config: Configuration {
                board_width: 100,
                board_height: 50,
                number_of_live_cell: 3,
            },
        };
        assert_eq!(
            serde_json::to_value(&cmd).unwrap(),
            json!({
                "type": "INIT",
                "config": {"boardWidth": 100, "boardHeight": 50, "numberOfLiveCell": 3}
            })
        );
        assert_eq!(
            serde_json::to_value(Command::FetchNextGen).unwrap(),
            json!({"type": "FETCH_NEXT_GEN"})
        );
        assert_eq!(
            serde_json::to_value(Command::AddPattern {
                pattern: "glider".into()
            })
            .unwrap(),
            json!({"type": "ADD_PATTERN", "pattern": "glider"})
        );
    }

    #[test]
    fn test_custom_pattern_parses_cells() {
        let cmd: Command = serde_json::from_value(json!({
            "type": "ADD_CUSTOM_PATTERN",
            "pattern": [{"x": 1, "y": 2}, {"x": -3, "y": 4}]
        }))
        .unwrap();
        assert_eq!(
            cmd,
            Command::AddCustomPattern {
                pattern: vec![Cell::new(1, 2), Cell::new(-3, 4)]
            }
        );
    }

    #[test]
    fn test_malformed_commands_rejected() {
        // INIT without config
        assert!(serde_json::from_value::<Command>(json!({"type": "INIT"})).is_err());
        // ADD_PATTERN without a name
        assert!(serde_json::from_value::<Command>(json!({"type": "ADD_PATTERN"})).is_err());
        // Unknown type
        assert!(serde_json::from_value::<Command>(json!({"type": "RESET"})).is_err());
    }

    #[test]
    fn test_payload_untagged() {
        let flag: Response = serde_json::from_value(json!({
            "cmd": {"type": "ADD_PATTERN", "pattern": "beacon"},
            "success": true,
            "payload": true
        }))
        .unwrap();
        assert_eq!(flag.payload, Payload::Flag(true));
        assert!(!flag.is_generation());

        let empty: Response = serde_json::from_value(json!({
            "cmd": {"type": "CYCLE_REFRESHED"},
            "success": true,
            "payload": []
        }))
        .unwrap();
        assert_eq!(empty.payload, Payload::Cells(Vec::new()));
        assert!(empty.is_generation());
    }
}
