//! Placement of caller-supplied fixed-shape rooms after the main layout is carved.

use rand::Rng;

use crate::constants::*;
use crate::corridors::carve_between;
use crate::error::DungeonError;
use crate::grid::TileGrid;
use crate::pathfinding::manhattan;
use crate::room::{Room, RoomTemplate};
use crate::tile::Tile;

pub struct QuestRoomPlacer;

impl QuestRoomPlacer {
    /// Place one template clear of every room in `existing_rooms` and make sure it
    /// joins the main dungeon.
    ///
    /// Positions are sampled up to `QUEST_ROOM_MAX_ATTEMPTS` times. The placed area
    /// may cover corridors or bare rock, but never another room or its margin.
    pub fn place<T: Clone, R: Rng>(
        grid: &mut TileGrid,
        existing_rooms: &[Room<T>],
        template: &RoomTemplate<T>,
        rng: &mut R,
    ) -> Result<Room<T>, DungeonError> {
        puffin::profile_function!();

        let no_fit = || DungeonError::PlacementFailure {
            target: template.room_id.clone(),
            attempts: 0,
        };
        if template.width <= 0 || template.height <= 0 {
            return Err(no_fit());
        }
        let max_x = grid.width() - template.width - QUEST_ROOM_MARGIN;
        let max_y = grid.height() - template.height - QUEST_ROOM_MARGIN;
        if max_x < QUEST_ROOM_MARGIN || max_y < QUEST_ROOM_MARGIN {
            return Err(no_fit());
        }

        for attempt in 1..=QUEST_ROOM_MAX_ATTEMPTS {
            let x = rng.gen_range(QUEST_ROOM_MARGIN..=max_x);
            let y = rng.gen_range(QUEST_ROOM_MARGIN..=max_y);
            let rect = template.rect_at(x, y);

            if existing_rooms
                .iter()
                .any(|room| room.overlaps(&rect, DUNGEON_ROOM_MARGIN))
            {
                continue;
            }

            let floor = TileGrid::new(template.width, template.height, Tile::floor())?;
            grid.stamp(&floor, x, y)?;
            if !grid.is_region_walkable(x, y, template.width, template.height) {
                return Err(DungeonError::Generation(format!(
                    "quest room '{}' at ({x}, {y}) is not walkable after stamping",
                    template.room_id
                )));
            }

            let mut room = template.place_at(x, y);
            if existing_rooms.iter().any(|other| other.room_id == room.room_id) {
                // Rooms never share a corner, so the position is unique
                room.room_id = format!("room_{x}_{y}");
            }
            Self::ensure_connected(grid, existing_rooms, &room, rng)?;
            tracing::debug!(room_id = %room.room_id, x, y, attempt, "quest room placed");
            return Ok(room);
        }

        Err(DungeonError::PlacementFailure {
            target: template.room_id.clone(),
            attempts: QUEST_ROOM_MAX_ATTEMPTS,
        })
    }

    /// Join `room` to the component holding the first existing room, tunneling to the
    /// nearest room (earliest on ties) if the stamp did not already touch a corridor.
    fn ensure_connected<T, R: Rng>(
        grid: &mut TileGrid,
        existing_rooms: &[Room<T>],
        room: &Room<T>,
        rng: &mut R,
    ) -> Result<(), DungeonError> {
        let Some(anchor) = existing_rooms.first().map(Room::center) else {
            return Ok(());
        };
        let center = room.center();
        if grid.flood_fill(center, None).contains(&anchor) {
            return Ok(());
        }

        let nearest = existing_rooms
            .iter()
            .enumerate()
            .min_by_key(|(idx, other)| (manhattan(center, other.center()), *idx))
            .map(|(_, other)| other);
        if let Some(nearest) = nearest {
            tracing::warn!(
                room_id = %room.room_id,
                target = %nearest.room_id,
                "quest room isolated, carving corridor"
            );
            carve_between(grid, center, nearest.center(), rng)?;
        }

        if !grid.flood_fill(center, None).contains(&anchor) {
            return Err(DungeonError::Generation(format!(
                "quest room '{}' could not be connected",
                room.room_id
            )));
        }
        Ok(())
    }
}
