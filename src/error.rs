//! Error types for dungeon generation.

/// A grid coordinate or rectangle fell outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("position ({x}, {y}) is outside the {width}x{height} grid")]
pub struct OutOfBounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Problems with a [`DungeonConfig`](crate::config::DungeonConfig), detected
/// before anything is generated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("target room count must be at least 1")]
    ZeroTargetRoomCount,

    /// The grid interior cannot hold this many minimum-size rooms.
    #[error("target room count {requested} exceeds grid capacity of {capacity}")]
    TargetRoomCountTooLarge { requested: u32, capacity: u32 },

    #[error("invalid room size bounds: min {min}, max {max}")]
    InvalidRoomSize { min: i32, max: i32 },

    #[error("wall fill probability {0} is outside [0, 1]")]
    InvalidWallProbability(f64),

    #[error("minimum partition size {partition} cannot hold a room of size {room_size}")]
    PartitionTooSmall { partition: i32, room_size: i32 },

    /// No region of the grid interior is large enough to be a partition.
    #[error("minimum partition size {partition} does not fit a {width}x{height} grid")]
    PartitionTooLarge { partition: i32, width: i32, height: i32 },

    #[error("unknown generation algorithm '{0}'")]
    UnknownAlgorithm(String),
}

/// Errors returned by a generation run. No partial dungeon accompanies any of them.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DungeonError {
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigError),

    /// A retry budget ran out. Retrying with another seed may succeed.
    #[error("could not place {target} after {attempts} attempts")]
    PlacementFailure { target: String, attempts: u32 },

    /// An internal invariant did not hold after a stage finished.
    #[error("generation invariant violated: {0}")]
    Generation(String),

    #[error(transparent)]
    OutOfBounds(#[from] OutOfBounds),

    #[error("could not decode value: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for DungeonError {
    fn from(err: serde_json::Error) -> Self {
        DungeonError::Decode(err.to_string())
    }
}
