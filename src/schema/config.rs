//! Configuration types for Life engine sessions and runtime settings.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::compute::BoardDimensions;

/// Default autonomous step cadence in milliseconds.
fn default_cadence_ms() -> u64 {
    250
}

/// Default capacity of the bridge's board stream.
fn default_board_buffer() -> usize {
    1
}

/// Board configuration carried by an `INIT` command.
///
/// Dimensions are given in pixels and converted to grid units by
/// [`BoardDimensions::from_pixels`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// Board width in pixels.
    pub board_width: u32,
    /// Board height in pixels.
    pub board_height: u32,
    /// Number of randomly placed live cells.
    pub number_of_live_cell: u32,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            board_width: 800,
            board_height: 600,
            number_of_live_cell: 1000,
        }
    }
}

impl Configuration {
    /// Grid dimensions derived from the pixel size.
    #[inline]
    pub fn dimensions(&self) -> BoardDimensions {
        BoardDimensions::from_pixels(self.board_width, self.board_height)
    }

    /// Validate configuration parameters.
    ///
    /// Rejects boards that round down to nothing and live-cell counts that
    /// exceed the number of coordinates random placement can choose from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dims = self.dimensions();
        if dims.width == 0 || dims.height == 0 {
            return Err(ConfigError::BoardTooSmall {
                width: self.board_width,
                height: self.board_height,
            });
        }
        let capacity = dims.capacity();
        if u64::from(self.number_of_live_cell) > capacity {
            return Err(ConfigError::TooManyLiveCells {
                requested: self.number_of_live_cell,
                capacity,
            });
        }
        Ok(())
    }
}

/// Where the engine runs relative to the bridge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutionMode {
    /// Engine on its own thread behind a serialized message boundary.
    #[default]
    Worker,
    /// Engine in the caller's context, responses delivered directly.
    InProcess,
}

/// Engine runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Autonomous step cadence in milliseconds.
    #[serde(default = "default_cadence_ms")]
    pub cadence_ms: u64,
    /// Random seed for board seeding (None = from entropy).
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            cadence_ms: default_cadence_ms(),
            random_seed: None,
        }
    }
}

impl EngineSettings {
    /// Step cadence as a duration.
    #[inline]
    pub fn cadence(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.cadence_ms)
    }

    /// Validate runtime settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cadence_ms == 0 {
            return Err(ConfigError::InvalidCadence);
        }
        Ok(())
    }
}

/// Top-level bridge configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Execution context hosting the engine.
    #[serde(default)]
    pub mode: ExecutionMode,
    /// Engine runtime settings.
    #[serde(default)]
    pub engine: EngineSettings,
    /// Boards buffered ahead of the consumer before the pull loop waits.
    #[serde(default = "default_board_buffer")]
    pub board_buffer: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::default(),
            engine: EngineSettings::default(),
            board_buffer: default_board_buffer(),
        }
    }
}

impl BridgeConfig {
    /// Load and validate a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        if self.board_buffer == 0 {
            return Err(ConfigError::InvalidBoardBuffer);
        }
        Ok(())
    }
}

/// Configuration validation and loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Board of {width}x{height} pixels has no whole cells")]
    BoardTooSmall { width: u32, height: u32 },
    #[error("Requested {requested} live cells but the board only has {capacity} coordinates")]
    TooManyLiveCells { requested: u32, capacity: u64 },
    #[error("Step cadence must be positive")]
    InvalidCadence,
    #[error("Board buffer must hold at least one generation")]
    InvalidBoardBuffer,
    #[error("Failed to read config: {0}")]
    Read(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
