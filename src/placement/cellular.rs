use std::collections::HashSet;

use rand::Rng;

use super::RoomPlacer;
use crate::config::DungeonConfig;
use crate::constants::*;
use crate::corridors::carve_corridor;
use crate::error::DungeonError;
use crate::grid::TileGrid;
use crate::pathfinding::manhattan;
use crate::room::{Rect, ROOM_TYPE_CAVE};
use crate::tile::{Tile, TileType};

/// Cave generation: random noise smoothed by a neighbor-majority rule.
///
/// Connected floor regions become rooms whose rectangle is the region's
/// bounding box. The region itself is usually not rectangular, so the room
/// center may start out as rock; it gets tunneled back into its cave.
#[derive(Debug, Clone)]
pub struct CellularAutomata {
    pub wall_fill_probability: f64,
    pub iterations: u32,
    pub target_room_count: u32,
}

/// One connected floor region found after smoothing
struct Cave {
    tiles: HashSet<(i32, i32)>,
    bounds: Rect,
}

impl CellularAutomata {
    pub fn from_config(config: &DungeonConfig) -> Self {
        Self {
            wall_fill_probability: config.wall_fill_probability,
            iterations: config.iterations,
            target_room_count: config.target_room_count,
        }
    }

    /// Independent draw per interior cell; the outer ring is always wall.
    fn seed_noise<R: Rng>(&self, grid: &mut TileGrid, rng: &mut R) -> Result<(), DungeonError> {
        for y in 1..grid.height() - 1 {
            for x in 1..grid.width() - 1 {
                let tile = if rng.gen_bool(self.wall_fill_probability) {
                    Tile::wall()
                } else {
                    Tile::floor()
                };
                grid.set(x, y, tile)?;
            }
        }
        grid.fill_borders(Tile::wall());
        Ok(())
    }
}

/// Walls among the 8 neighbors. Anything off the map counts as wall.
fn wall_neighbors(grid: &TileGrid, x: i32, y: i32) -> usize {
    let mut count = 0;
    for dy in -1..=1 {
        for dx in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let is_wall = grid
                .get(x + dx, y + dy)
                .map(|tile| tile.is(TileType::Wall))
                .unwrap_or(true);
            if is_wall {
                count += 1;
            }
        }
    }
    count
}

/// One smoothing pass. Reads from `grid`, writes a fresh copy so updates
/// within a pass never see each other.
fn smooth(grid: &TileGrid) -> Result<TileGrid, DungeonError> {
    let mut next = grid.clone();
    for y in 1..grid.height() - 1 {
        for x in 1..grid.width() - 1 {
            let tile = if wall_neighbors(grid, x, y) > CAVE_WALL_NEIGHBOR_THRESHOLD {
                Tile::wall()
            } else {
                Tile::floor()
            };
            next.set(x, y, tile)?;
        }
    }
    Ok(next)
}

fn bounding_box(tiles: &HashSet<(i32, i32)>) -> Rect {
    let min_x = tiles.iter().map(|p| p.0).min().unwrap_or(0);
    let max_x = tiles.iter().map(|p| p.0).max().unwrap_or(0);
    let min_y = tiles.iter().map(|p| p.1).min().unwrap_or(0);
    let max_y = tiles.iter().map(|p| p.1).max().unwrap_or(0);
    Rect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)
}

/// Connected walkable regions of at least `CAVE_MIN_TILES`, in row-major discovery order
fn find_caves(grid: &TileGrid) -> Vec<Cave> {
    puffin::profile_function!();

    let mut seen: HashSet<(i32, i32)> = HashSet::new();
    let mut caves = Vec::new();

    for start in grid.find_tiles(|t| t.is_walkable()) {
        if seen.contains(&start) {
            continue;
        }
        let tiles = grid.flood_fill(start, None);
        seen.extend(tiles.iter().copied());
        if tiles.len() < CAVE_MIN_TILES {
            continue;
        }
        let bounds = bounding_box(&tiles);
        caves.push(Cave { tiles, bounds });
    }

    caves
}

/// Make sure the cave's bounding-box center is floor joined to the cave.
fn anchor_center(grid: &mut TileGrid, cave: &Cave) -> Result<(), DungeonError> {
    let center = cave.bounds.center();
    if cave.tiles.contains(&center) {
        return Ok(());
    }
    // Nearest cave tile, ties broken row-major so the choice never depends on set order
    let nearest = cave
        .tiles
        .iter()
        .copied()
        .min_by_key(|&(x, y)| (manhattan(center, (x, y)), y, x))
        .unwrap_or(center);
    carve_corridor(grid, center, nearest, true)?;
    Ok(())
}

impl RoomPlacer for CellularAutomata {
    const ROOM_TYPE: &'static str = ROOM_TYPE_CAVE;

    fn place_rooms<R: Rng>(&self, grid: &mut TileGrid, rng: &mut R) -> Result<Vec<Rect>, DungeonError> {
        puffin::profile_function!();

        self.seed_noise(grid, rng)?;
        for _ in 0..self.iterations {
            *grid = smooth(grid)?;
        }

        let caves = find_caves(grid);

        // Biggest caves first; stable sort keeps discovery order among equals
        let mut by_size: Vec<usize> = (0..caves.len()).collect();
        by_size.sort_by(|&a, &b| caves[b].tiles.len().cmp(&caves[a].tiles.len()));

        let mut accepted: Vec<usize> = Vec::new();
        for idx in by_size {
            if accepted.len() >= self.target_room_count as usize {
                break;
            }
            let bounds = caves[idx].bounds;
            if accepted.iter().any(|&other| caves[other].bounds.intersects(&bounds, 0)) {
                continue;
            }
            accepted.push(idx);
        }
        accepted.sort_unstable();

        let mut rooms = Vec::with_capacity(accepted.len());
        for idx in accepted {
            anchor_center(grid, &caves[idx])?;
            rooms.push(caves[idx].bounds);
        }

        tracing::debug!(
            caves = caves.len(),
            rooms = rooms.len(),
            iterations = self.iterations,
            "caves extracted"
        );
        Ok(rooms)
    }
}
