//! Cellular automata constants.

/// Default chance for a cell to start as wall
pub const CAVE_WALL_FILL_PROBABILITY: f64 = 0.45;
/// Default smoothing passes
pub const CAVE_SMOOTHING_ITERATIONS: u32 = 5;
/// A cell becomes wall when more than this many of its 8 neighbors are walls
pub const CAVE_WALL_NEIGHBOR_THRESHOLD: usize = 4;
/// Caves with fewer tiles are left as unnamed terrain
pub const CAVE_MIN_TILES: usize = 5;
