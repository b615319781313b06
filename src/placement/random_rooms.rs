use rand::Rng;

use super::RoomPlacer;
use crate::config::DungeonConfig;
use crate::constants::*;
use crate::error::DungeonError;
use crate::grid::TileGrid;
use crate::room::{Rect, ROOM_TYPE_NORMAL};
use crate::tile::Tile;

/// Rejection sampling: draw a rectangle, keep it if it clears every accepted room.
#[derive(Debug, Clone)]
pub struct RandomRooms {
    pub target_room_count: u32,
    pub min_room_size: i32,
    pub max_room_size: i32,
}

impl RandomRooms {
    pub fn from_config(config: &DungeonConfig) -> Self {
        Self {
            target_room_count: config.target_room_count,
            min_room_size: config.min_room_size,
            max_room_size: config.max_room_size,
        }
    }
}

impl RoomPlacer for RandomRooms {
    const ROOM_TYPE: &'static str = ROOM_TYPE_NORMAL;

    fn place_rooms<R: Rng>(&self, grid: &mut TileGrid, rng: &mut R) -> Result<Vec<Rect>, DungeonError> {
        puffin::profile_function!();

        // Rooms never touch the outer ring
        let max_width = self.max_room_size.min(grid.width() - 2 * DUNGEON_BORDER);
        let max_height = self.max_room_size.min(grid.height() - 2 * DUNGEON_BORDER);
        if max_width < self.min_room_size || max_height < self.min_room_size {
            return Ok(Vec::new());
        }

        let target = self.target_room_count as usize;
        let mut rooms: Vec<Rect> = Vec::with_capacity(target);
        let mut attempts = 0;
        let mut rejected_in_a_row = 0;

        while rooms.len() < target
            && attempts < RANDOM_ROOMS_ATTEMPT_BUDGET
            && rejected_in_a_row < RANDOM_ROOMS_ATTEMPTS_PER_ROOM
        {
            attempts += 1;

            let width = rng.gen_range(self.min_room_size..=max_width);
            let height = rng.gen_range(self.min_room_size..=max_height);
            let x = rng.gen_range(DUNGEON_BORDER..=grid.width() - width - DUNGEON_BORDER);
            let y = rng.gen_range(DUNGEON_BORDER..=grid.height() - height - DUNGEON_BORDER);
            let candidate = Rect::new(x, y, width, height);

            if rooms
                .iter()
                .any(|room| candidate.intersects(room, DUNGEON_ROOM_MARGIN))
            {
                rejected_in_a_row += 1;
                continue;
            }

            grid.fill_rect(&candidate, Tile::floor())?;
            rooms.push(candidate);
            rejected_in_a_row = 0;
        }

        tracing::debug!(placed = rooms.len(), attempts, "random rooms sampled");
        Ok(rooms)
    }
}
