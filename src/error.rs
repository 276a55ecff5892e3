use thiserror::Error;

/// Errors raised while loading or validating an
/// [`EvolutionConfig`](crate::config::EvolutionConfig).
///
/// These are fatal to initialization and never surface from a running simulation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field}: range min {min} exceeds max {max}")]
    InvertedRange { field: &'static str, min: f32, max: f32 },
    #[error("{field}: range [{min}, {max}] must lie within [{lower}, {upper}]")]
    RangeOutOfBounds {
        field: &'static str,
        min: f32,
        max: f32,
        lower: f32,
        upper: f32,
    },
    #[error("{field}: value {value} is not finite")]
    NonFinite { field: &'static str, value: f32 },
    #[error("{field}: expected a probability in [0, 1], got {value}")]
    InvalidRate { field: &'static str, value: f32 },
    #[error("{field}: expected a positive value, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("{field}: expected a non-negative value, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("initial population {initial} exceeds the population cap {max}")]
    InitialExceedsCap { initial: usize, max: usize },
    #[error("population cap must be at least 1")]
    ZeroCap,
    #[error("heightmap of {columns}x{rows} needs {expected} samples, got {actual}")]
    HeightmapShape {
        columns: usize,
        rows: usize,
        expected: usize,
        actual: usize,
    },
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failures reported by a [`ModelFactory`](crate::model::ModelFactory).
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("visual creation failed: {0}")]
    Create(String),
    #[error("visual handle is no longer live")]
    StaleHandle,
}

/// Failures reported by a [`SpawnPlacer`](crate::placement::SpawnPlacer).
#[derive(Debug, Error, PartialEq)]
pub enum PlacementError {
    #[error("terrain returned a non-finite height at ({x}, {z})")]
    NonFiniteHeight { x: f32, z: f32 },
    #[error("position ({x}, {z}) is not finite")]
    NonFinitePosition { x: f32, z: f32 },
}
