//! Board configuration.
//!
//! Square and border sizes arrive from a key-value document (JSON here).
//! Values outside their allowed range are never a hard failure: they are
//! replaced with the documented default and a warning is logged, so the
//! geometry engine only ever sees valid inputs.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::board::{CellSize, GridDimensions};

pub const ROWS_RANGE: RangeInclusive<u32> = 1..=8;
pub const COLUMNS_RANGE: RangeInclusive<u32> = 1..=8;
pub const SQUARE_SIZE_RANGE: RangeInclusive<u32> = 1..=16;
pub const BORDER_THICKNESS_RANGE: RangeInclusive<u32> = 0..=8;

pub const DEFAULT_ROWS: u32 = 8;
pub const DEFAULT_COLUMNS: u32 = 8;
pub const DEFAULT_SQUARE_SIZE: u32 = 3;
pub const DEFAULT_BORDER_THICKNESS: u32 = 1;

/// Option names accepted by [`BoardConfig::set_option`].
pub const OPTION_NAMES: [&str; 6] = [
    "Rows",
    "Columns",
    "SquareWidth",
    "SquareHeight",
    "BorderThickness",
    "FrameThickness",
];

/// Errors that can occur while loading or editing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse board config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("invalid value '{value}' for option '{name}'")]
    InvalidValue { name: String, value: String },
}

/// Size of the grid and of each square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SquareConfig {
    pub rows: u32,
    pub columns: u32,
    /// Blocks along the board's right vector.
    pub width: u32,
    /// Blocks along the board's forward vector.
    pub height: u32,
}

impl Default for SquareConfig {
    fn default() -> Self {
        SquareConfig {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            width: DEFAULT_SQUARE_SIZE,
            height: DEFAULT_SQUARE_SIZE,
        }
    }
}

impl SquareConfig {
    /// Grid dimensions, falling back to 8x8 if the values were never sanitized.
    pub fn dimensions(&self) -> GridDimensions {
        GridDimensions::new(self.rows, self.columns).unwrap_or_default()
    }

    /// Square footprint, falling back to the default size if the values
    /// were never sanitized.
    pub fn cell_size(&self) -> CellSize {
        CellSize::new(self.width, self.height).unwrap_or_default()
    }
}

/// Thickness of one border ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderConfig {
    pub thickness: u32,
}

impl Default for BorderConfig {
    fn default() -> Self {
        BorderConfig {
            thickness: DEFAULT_BORDER_THICKNESS,
        }
    }
}

/// Everything the board factory needs besides the anchor and orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub squares: SquareConfig,
    pub inner_border: BorderConfig,
    pub frame: BorderConfig,
}

/// Returns `value` if it lies in `range`, otherwise logs and returns `default`.
fn clamp_or_default(name: &str, value: u32, range: RangeInclusive<u32>, default: u32) -> u32 {
    if range.contains(&value) {
        value
    } else {
        warn!(
            option = name,
            value,
            min = *range.start(),
            max = *range.end(),
            default,
            "config value out of range, using default"
        );
        default
    }
}

impl BoardConfig {
    /// Parses a JSON document and sanitizes it. Missing keys take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: BoardConfig = serde_json::from_str(json)?;
        Ok(raw.sanitized())
    }

    /// Replaces every out-of-range value with its default. Idempotent.
    pub fn sanitized(&self) -> BoardConfig {
        BoardConfig {
            squares: SquareConfig {
                rows: clamp_or_default("squares.rows", self.squares.rows, ROWS_RANGE, DEFAULT_ROWS),
                columns: clamp_or_default(
                    "squares.columns",
                    self.squares.columns,
                    COLUMNS_RANGE,
                    DEFAULT_COLUMNS,
                ),
                width: clamp_or_default(
                    "squares.width",
                    self.squares.width,
                    SQUARE_SIZE_RANGE,
                    DEFAULT_SQUARE_SIZE,
                ),
                height: clamp_or_default(
                    "squares.height",
                    self.squares.height,
                    SQUARE_SIZE_RANGE,
                    DEFAULT_SQUARE_SIZE,
                ),
            },
            inner_border: BorderConfig {
                thickness: clamp_or_default(
                    "inner_border.thickness",
                    self.inner_border.thickness,
                    BORDER_THICKNESS_RANGE,
                    DEFAULT_BORDER_THICKNESS,
                ),
            },
            frame: BorderConfig {
                thickness: clamp_or_default(
                    "frame.thickness",
                    self.frame.thickness,
                    BORDER_THICKNESS_RANGE,
                    DEFAULT_BORDER_THICKNESS,
                ),
            },
        }
    }

    /// Sets a single option by its protocol name. The value is range-checked
    /// the same way as a loaded document.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let slot = match name {
            "Rows" => &mut self.squares.rows,
            "Columns" => &mut self.squares.columns,
            "SquareWidth" => &mut self.squares.width,
            "SquareHeight" => &mut self.squares.height,
            "BorderThickness" => &mut self.inner_border.thickness,
            "FrameThickness" => &mut self.frame.thickness,
            other => return Err(ConfigError::UnknownOption(other.to_string())),
        };
        *slot = value.parse().map_err(|_| ConfigError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        })?;
        *self = self.sanitized();
        Ok(())
    }
}
