//! Generation configuration and validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// GenerationAlgorithm
// ---------------------------------------------------------------------------

/// Which room-placement strategy drives a run.
///
/// Encoded by its stable name (`"RANDOM_ROOMS"`, ...), never by ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GenerationAlgorithm {
    /// Rectangles sampled at random positions, rejected on overlap
    RandomRooms,
    /// Smoothed noise; connected caves become rooms
    CellularAutomata,
    /// Recursive splitting with one room per leaf
    BinarySpacePartition,
}

impl GenerationAlgorithm {
    pub const ALL: [GenerationAlgorithm; 3] = [
        GenerationAlgorithm::RandomRooms,
        GenerationAlgorithm::CellularAutomata,
        GenerationAlgorithm::BinarySpacePartition,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RandomRooms => "RANDOM_ROOMS",
            Self::CellularAutomata => "CELLULAR_AUTOMATA",
            Self::BinarySpacePartition => "BINARY_SPACE_PARTITION",
        }
    }

    /// Whether rooms are true rectangles of floor (as opposed to cave bounding boxes)
    pub fn is_rectangular(&self) -> bool {
        !matches!(self, Self::CellularAutomata)
    }
}

impl fmt::Display for GenerationAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownAlgorithm(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// DungeonConfig
// ---------------------------------------------------------------------------

/// Input to a generation run. The engine only ever reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    pub name: String,
    pub width: i32,
    pub height: i32,
    pub algorithm: GenerationAlgorithm,
    /// Rooms to aim for. Strategies may produce fewer.
    pub target_room_count: u32,
    /// `None` draws a fresh seed per run; the seed used is reported in the result.
    pub seed: Option<u64>,

    /// Smallest room side for RANDOM_ROOMS and BSP
    pub min_room_size: i32,
    /// Largest room side for RANDOM_ROOMS and BSP
    pub max_room_size: i32,

    /// Chance that a cell starts as wall (cellular automata)
    pub wall_fill_probability: f64,
    /// Smoothing passes (cellular automata)
    pub iterations: u32,

    /// Partitions smaller than twice this are not split further (BSP)
    pub min_partition_size: i32,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            name: "dungeon".to_string(),
            width: DUNGEON_DEFAULT_WIDTH,
            height: DUNGEON_DEFAULT_HEIGHT,
            algorithm: GenerationAlgorithm::RandomRooms,
            target_room_count: DUNGEON_DEFAULT_ROOM_COUNT,
            seed: None,
            min_room_size: DUNGEON_MIN_ROOM_SIZE,
            max_room_size: DUNGEON_MAX_ROOM_SIZE,
            wall_fill_probability: CAVE_WALL_FILL_PROBABILITY,
            iterations: CAVE_SMOOTHING_ITERATIONS,
            min_partition_size: BSP_MIN_PARTITION_SIZE,
        }
    }
}

impl DungeonConfig {
    pub fn new(width: i32, height: i32, algorithm: GenerationAlgorithm) -> Self {
        Self {
            width,
            height,
            algorithm,
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_target_room_count(mut self, count: u32) -> Self {
        self.target_room_count = count;
        self
    }

    pub fn with_room_size(mut self, min: i32, max: i32) -> Self {
        self.min_room_size = min;
        self.max_room_size = max;
        self
    }

    pub fn with_cave_params(mut self, wall_fill_probability: f64, iterations: u32) -> Self {
        self.wall_fill_probability = wall_fill_probability;
        self.iterations = iterations;
        self
    }

    pub fn with_min_partition_size(mut self, size: i32) -> Self {
        self.min_partition_size = size;
        self
    }

    // -- Presets ------------------------------------------------------------

    /// 20x20 random rooms, 8 rooms
    pub fn small(seed: Option<u64>) -> Self {
        Self::preset("small", 20, 20, GenerationAlgorithm::RandomRooms, 8, seed)
    }

    /// 30x30 random rooms, 15 rooms
    pub fn medium(seed: Option<u64>) -> Self {
        Self::preset("medium", 30, 30, GenerationAlgorithm::RandomRooms, 15, seed)
    }

    /// 50x50 random rooms, 30 rooms
    pub fn large(seed: Option<u64>) -> Self {
        Self::preset("large", 50, 50, GenerationAlgorithm::RandomRooms, 30, seed)
    }

    /// 40x40 cellular-automata caves
    pub fn cave(seed: Option<u64>) -> Self {
        Self::preset(
            "cave",
            40,
            40,
            GenerationAlgorithm::CellularAutomata,
            DUNGEON_DEFAULT_ROOM_COUNT,
            seed,
        )
    }

    /// 40x40 BSP halls
    pub fn castle(seed: Option<u64>) -> Self {
        Self::preset(
            "castle",
            40,
            40,
            GenerationAlgorithm::BinarySpacePartition,
            DUNGEON_DEFAULT_ROOM_COUNT,
            seed,
        )
    }

    fn preset(
        name: &str,
        width: i32,
        height: i32,
        algorithm: GenerationAlgorithm,
        target_room_count: u32,
        seed: Option<u64>,
    ) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
            algorithm,
            target_room_count,
            seed,
            ..Self::default()
        }
    }

    // -- Validation ---------------------------------------------------------

    /// How many minimum-size rooms the grid interior could hold at most.
    pub fn room_capacity(&self) -> u32 {
        let interior_w = i64::from(self.width - 2 * DUNGEON_BORDER).max(0);
        let interior_h = i64::from(self.height - 2 * DUNGEON_BORDER).max(0);
        let room_area = i64::from(self.min_room_size.max(1)).pow(2);
        u32::try_from(interior_w * interior_h / room_area).unwrap_or(u32::MAX)
    }

    /// Check every field. Runs before any grid is allocated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.target_room_count == 0 {
            return Err(ConfigError::ZeroTargetRoomCount);
        }
        if self.min_room_size < 1 || self.max_room_size < self.min_room_size {
            return Err(ConfigError::InvalidRoomSize {
                min: self.min_room_size,
                max: self.max_room_size,
            });
        }
        if !(0.0..=1.0).contains(&self.wall_fill_probability) {
            return Err(ConfigError::InvalidWallProbability(self.wall_fill_probability));
        }
        if self.algorithm == GenerationAlgorithm::BinarySpacePartition {
            if self.min_partition_size < self.min_room_size.saturating_add(2 * DUNGEON_ROOM_MARGIN) {
                return Err(ConfigError::PartitionTooSmall {
                    partition: self.min_partition_size,
                    room_size: self.min_room_size,
                });
            }
            // The root partition is the grid minus its border
            if self.min_partition_size > self.width.max(self.height) - 2 {
                return Err(ConfigError::PartitionTooLarge {
                    partition: self.min_partition_size,
                    width: self.width,
                    height: self.height,
                });
            }
        }

        let capacity = self.room_capacity();
        if self.target_room_count > capacity {
            return Err(ConfigError::TargetRoomCountTooLarge {
                requested: self.target_room_count,
                capacity,
            });
        }
        Ok(())
    }
}

impl fmt::Display for DungeonConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' {}x{} algo={}",
            self.name, self.width, self.height, self.algorithm
        )
    }
}
