//! Error types for radar queries.

use crate::core_modules::position::Position;
use thiserror::Error;

/// Errors that can occur while loading radar data or answering a query.
#[derive(Error, Debug)]
pub enum RadarError {
    /// A pixel was requested outside the image.
    #[error("position {position} is outside the {width}x{height} image")]
    OutOfBounds {
        position: Position,
        width: u32,
        height: u32,
    },

    /// The radar image could not be decoded or encoded.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Filesystem error while reading a palette, config or image.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A color literal could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// The same color appears twice in a palette.
    #[error("palette '{palette}' lists color {color} more than once")]
    DuplicateColor { palette: String, color: String },

    /// No palette provider is registered under this name.
    #[error("unknown palette: {0}")]
    UnknownPalette(String),

    /// A palette with no rain colors would never find rain.
    #[error("palette '{0}' has no rain colors")]
    EmptyPalette(String),

    /// Malformed JSON configuration or palette definition.
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// The survey pool stopped before answering.
    #[error("survey pool is closed")]
    PoolClosed,
}

impl RadarError {
    /// Create an OutOfBounds error.
    pub fn out_of_bounds(position: Position, width: u32, height: u32) -> Self {
        Self::OutOfBounds {
            position,
            width,
            height,
        }
    }

    /// Create an InvalidColor error.
    pub fn invalid_color(msg: impl Into<String>) -> Self {
        Self::InvalidColor(msg.into())
    }

    /// Whether this error is the recoverable "no pixel there" signal.
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }
}

/// Result type for radar operations.
pub type Result<T> = std::result::Result<T, RadarError>;
