use super::config::ConfigError;
use thiserror::Error;

/// Rejections of runtime input, raised before any neighbor search starts.
#[derive(Debug, Error, PartialEq, Clone)]
pub enum ValidationError {
    #[error("Position set is empty")]
    EmptyPositions,

    #[error("Position {index} has a non-finite coordinate")]
    NonFinitePosition { index: usize },

    #[error("Particle positions are 3D but the simulation box is 2D")]
    DimensionMismatch,

    #[error("Cutoff radius {cutoff} exceeds half the smallest box width ({limit})")]
    CutoffExceedsBox { cutoff: f64, limit: f64 },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
}
