//! Room placement strategies.
//!
//! Each strategy carves its rooms into a grid that starts out solid wall and
//! reports the room rectangles in placement order. All randomness comes from the
//! caller's RNG so a seeded run always lays out the same rooms.

mod bsp;
mod cellular;
mod random_rooms;

pub use bsp::BinarySpacePartition;
pub use cellular::CellularAutomata;
pub use random_rooms::RandomRooms;

use rand::Rng;

use crate::config::{DungeonConfig, GenerationAlgorithm};
use crate::error::DungeonError;
use crate::grid::TileGrid;
use crate::room::Rect;

pub trait RoomPlacer {
    /// Tag given to every room this strategy produces
    const ROOM_TYPE: &'static str;

    /// Carve rooms into `grid` and return their rectangles in placement order.
    /// Returning fewer rooms than requested is not an error.
    fn place_rooms<R: Rng>(&self, grid: &mut TileGrid, rng: &mut R) -> Result<Vec<Rect>, DungeonError>;
}

/// Room tag used by the strategy behind `algorithm`
pub fn room_type(algorithm: GenerationAlgorithm) -> &'static str {
    match algorithm {
        GenerationAlgorithm::RandomRooms => RandomRooms::ROOM_TYPE,
        GenerationAlgorithm::CellularAutomata => CellularAutomata::ROOM_TYPE,
        GenerationAlgorithm::BinarySpacePartition => BinarySpacePartition::ROOM_TYPE,
    }
}

/// Run the strategy selected by `config`.
///
/// A strategy that ends with no rooms at all is reported as a placement failure,
/// since nothing downstream can work on an empty dungeon.
pub fn place_rooms<R: Rng>(
    config: &DungeonConfig,
    grid: &mut TileGrid,
    rng: &mut R,
) -> Result<Vec<Rect>, DungeonError> {
    let rooms = match config.algorithm {
        GenerationAlgorithm::RandomRooms => RandomRooms::from_config(config).place_rooms(grid, rng)?,
        GenerationAlgorithm::CellularAutomata => {
            CellularAutomata::from_config(config).place_rooms(grid, rng)?
        }
        GenerationAlgorithm::BinarySpacePartition => {
            BinarySpacePartition::from_config(config).place_rooms(grid, rng)?
        }
    };

    if rooms.is_empty() {
        return Err(DungeonError::PlacementFailure {
            target: format!("any {} room", config.algorithm),
            attempts: 0,
        });
    }
    if (rooms.len() as u32) < config.target_room_count {
        tracing::warn!(
            placed = rooms.len(),
            target = config.target_room_count,
            "fewer rooms than targeted"
        );
    } else {
        tracing::debug!(placed = rooms.len(), "room placement finished");
    }
    Ok(rooms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::room::{ROOM_TYPE_CAVE, ROOM_TYPE_NORMAL};
    use crate::tile::Tile;

    #[test]
    fn test_room_types() {
        assert_eq!(room_type(GenerationAlgorithm::RandomRooms), ROOM_TYPE_NORMAL);
        assert_eq!(room_type(GenerationAlgorithm::BinarySpacePartition), ROOM_TYPE_NORMAL);
        assert_eq!(room_type(GenerationAlgorithm::CellularAutomata), ROOM_TYPE_CAVE);
    }

    #[test]
    fn test_every_strategy_places_rooms_in_bounds() {
        for algorithm in GenerationAlgorithm::ALL {
            let config = DungeonConfig::new(40, 40, algorithm).with_seed(11);
            let mut grid = TileGrid::new(40, 40, Tile::wall()).unwrap();
            let mut rng = ChaCha8Rng::seed_from_u64(11);
            let rooms = place_rooms(&config, &mut grid, &mut rng).unwrap();
            assert!(!rooms.is_empty(), "{algorithm} placed nothing");
            assert!(rooms.len() <= config.target_room_count as usize);
            for room in &rooms {
                assert!(room.fits_within(40, 40), "{algorithm} room {room:?} out of bounds");
            }
        }
    }

    #[test]
    fn test_empty_result_is_placement_failure() {
        // A fully walled cave: nothing to extract
        let config = DungeonConfig::new(12, 12, GenerationAlgorithm::CellularAutomata)
            .with_target_room_count(1)
            .with_cave_params(1.0, 0);
        let mut grid = TileGrid::new(12, 12, Tile::wall()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let err = place_rooms(&config, &mut grid, &mut rng).unwrap_err();
        assert!(matches!(err, DungeonError::PlacementFailure { .. }));
    }
}
