//! Error types for DroneNav

use thiserror::Error;

use crate::terrain::Cell;

/// DroneNav error type
///
/// Unreachable goals and incomplete strobe sequences are not errors; they are
/// reported through `PathResult::is_reachable` and `Classification::Incomplete`.
#[derive(Error, Debug)]
pub enum NavError {
    #[error("cell {cell} is outside the {width}x{height} grid")]
    OutOfBounds { cell: Cell, width: usize, height: usize },

    #[error("path endpoint {cell} is an obstacle")]
    BlockedEndpoint { cell: Cell },

    #[error("path starts at {found} but the drone is at {expected}")]
    PathDoesNotStartAtAgent { expected: Cell, found: Cell },

    #[error("path jumps from {from} to {to}")]
    DiscontinuousPath { from: Cell, to: Cell },

    #[error("predictor unavailable: {0}")]
    PredictorUnavailable(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<toml::de::Error> for NavError {
    fn from(e: toml::de::Error) -> Self {
        NavError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NavError>;
