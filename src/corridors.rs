//! Corridor carving between placed rooms.
//!
//! Rooms are joined along a minimum spanning tree over their centers, so every
//! room is reachable with as little digging as possible.

use std::collections::HashSet;

use rand::Rng;

use crate::error::{DungeonError, OutOfBounds};
use crate::grid::TileGrid;
use crate::pathfinding::manhattan;
use crate::room::{Rect, Room};
use crate::tile::{Tile, TileType};

/// Connects rooms with L-shaped corridors and marks doorways.
pub struct CorridorConnector;

impl CorridorConnector {
    /// Carve one corridor per spanning-tree edge. Returns the edges in carve order.
    pub fn connect<R: Rng>(
        grid: &mut TileGrid,
        rooms: &[Rect],
        rng: &mut R,
    ) -> Result<Vec<(usize, usize)>, OutOfBounds> {
        puffin::profile_function!();

        let centers: Vec<(i32, i32)> = rooms.iter().map(Rect::center).collect();
        let edges = minimum_spanning_edges(&centers);
        for &(i, j) in &edges {
            carve_between(grid, centers[i], centers[j], rng)?;
        }

        tracing::debug!(rooms = rooms.len(), corridors = edges.len(), "rooms connected");
        Ok(edges)
    }

    /// Turn chokepoint corridor tiles just outside each room into doors.
    pub fn place_doors(grid: &mut TileGrid, rooms: &[Rect]) -> Result<Vec<(i32, i32)>, OutOfBounds> {
        let doors = find_door_positions(grid, rooms);
        for &(x, y) in &doors {
            grid.set(x, y, Tile::door())?;
        }
        Ok(doors)
    }

    /// Check that every room center can be reached from the first one.
    pub fn verify_connectivity<T>(grid: &TileGrid, rooms: &[Room<T>]) -> Result<(), DungeonError> {
        let Some(first) = rooms.first() else {
            return Ok(());
        };

        let reachable = grid.flood_fill(first.center(), None);
        match rooms.iter().find(|room| !reachable.contains(&room.center())) {
            Some(room) => Err(DungeonError::Generation(format!(
                "room '{}' at {:?} is not reachable from '{}'",
                room.room_id,
                room.center(),
                first.room_id
            ))),
            None => Ok(()),
        }
    }
}

/// Connect two points with an L-shaped corridor, picking the bend at random.
pub fn carve_between<R: Rng>(
    grid: &mut TileGrid,
    from: (i32, i32),
    to: (i32, i32),
    rng: &mut R,
) -> Result<(), OutOfBounds> {
    // Randomly choose to go horizontal-then-vertical or vertical-then-horizontal
    carve_corridor(grid, from, to, rng.gen_bool(0.5))
}

/// Carve an L-shaped corridor. Tiles that are already walkable are left as they are,
/// so doors and existing floor survive.
pub fn carve_corridor(
    grid: &mut TileGrid,
    from: (i32, i32),
    to: (i32, i32),
    horizontal_first: bool,
) -> Result<(), OutOfBounds> {
    let ((x1, y1), (x2, y2)) = (from, to);
    if horizontal_first {
        carve_h_corridor(grid, x1, x2, y1)?;
        carve_v_corridor(grid, y1, y2, x2)
    } else {
        carve_v_corridor(grid, y1, y2, x1)?;
        carve_h_corridor(grid, x1, x2, y2)
    }
}

fn carve_h_corridor(grid: &mut TileGrid, x1: i32, x2: i32, y: i32) -> Result<(), OutOfBounds> {
    for x in x1.min(x2)..=x1.max(x2) {
        carve_tile(grid, x, y)?;
    }
    Ok(())
}

fn carve_v_corridor(grid: &mut TileGrid, y1: i32, y2: i32, x: i32) -> Result<(), OutOfBounds> {
    for y in y1.min(y2)..=y1.max(y2) {
        carve_tile(grid, x, y)?;
    }
    Ok(())
}

fn carve_tile(grid: &mut TileGrid, x: i32, y: i32) -> Result<(), OutOfBounds> {
    if !grid.get(x, y)?.is_walkable() {
        grid.set(x, y, Tile::floor())?;
    }
    Ok(())
}

/// Kruskal over the complete graph of `points`, weighted by Manhattan distance.
///
/// Edges are considered in (weight, i, j) order so equal-length candidates
/// always resolve the same way.
pub fn minimum_spanning_edges(points: &[(i32, i32)]) -> Vec<(usize, usize)> {
    let mut candidates = Vec::with_capacity(points.len() * points.len().saturating_sub(1) / 2);
    for i in 0..points.len() {
        for j in i + 1..points.len() {
            candidates.push((manhattan(points[i], points[j]), i, j));
        }
    }
    candidates.sort_unstable();

    let mut sets = UnionFind::new(points.len());
    let mut edges = Vec::with_capacity(points.len().saturating_sub(1));
    for (_, i, j) in candidates {
        if sets.union(i, j) {
            edges.push((i, j));
            if edges.len() + 1 == points.len() {
                break;
            }
        }
    }
    edges
}

struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, mut node: usize) -> usize {
        while self.parent[node] != node {
            self.parent[node] = self.parent[self.parent[node]];
            node = self.parent[node];
        }
        node
    }

    /// Merge the sets holding `a` and `b`. False if they were already one set.
    fn union(&mut self, a: usize, b: usize) -> bool {
        let (root_a, root_b) = (self.find(a), self.find(b));
        if root_a == root_b {
            return false;
        }
        match self.rank[root_a].cmp(&self.rank[root_b]) {
            std::cmp::Ordering::Less => self.parent[root_a] = root_b,
            std::cmp::Ordering::Greater => self.parent[root_b] = root_a,
            std::cmp::Ordering::Equal => {
                self.parent[root_b] = root_a;
                self.rank[root_a] += 1;
            }
        }
        true
    }
}

/// Find positions where doors should be placed.
/// Scans the ring just outside every room edge; order is per room, then
/// top, bottom, left, right. Each position is reported once.
fn find_door_positions(grid: &TileGrid, rooms: &[Rect]) -> Vec<(i32, i32)> {
    let mut seen = HashSet::new();
    let mut door_positions = Vec::new();
    let mut consider = |pos: (i32, i32)| {
        if is_door_candidate(grid, pos.0, pos.1) && seen.insert(pos) {
            door_positions.push(pos);
        }
    };

    for room in rooms {
        for x in room.x..room.x + room.width {
            consider((x, room.y - 1));
        }
        for x in room.x..room.x + room.width {
            consider((x, room.y + room.height));
        }
        for y in room.y..room.y + room.height {
            consider((room.x - 1, y));
        }
        for y in room.y..room.y + room.height {
            consider((room.x + room.width, y));
        }
    }

    door_positions
}

/// Check if a tile is a good door candidate:
/// - Must be a floor tile
/// - Must have walls on two opposite sides and openings on the other two
fn is_door_candidate(grid: &TileGrid, x: i32, y: i32) -> bool {
    let tile_at = |x: i32, y: i32| grid.get(x, y).map(|t| t.tile_type).unwrap_or(TileType::Wall);

    if grid.get(x, y).map(|t| !t.is(TileType::Floor)).unwrap_or(true) {
        return false;
    }

    let is_wall = |t: TileType| t == TileType::Wall;
    let (north, south) = (tile_at(x, y - 1), tile_at(x, y + 1));
    let (east, west) = (tile_at(x + 1, y), tile_at(x - 1, y));

    // Horizontal doorway: walls north and south, open east and west
    let h_doorway = is_wall(north) && is_wall(south) && !is_wall(east) && !is_wall(west);
    // Vertical doorway: walls east and west, open north and south
    let v_doorway = is_wall(east) && is_wall(west) && !is_wall(north) && !is_wall(south);

    h_doorway || v_doorway
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::room::ROOM_TYPE_NORMAL;

    fn with_rooms(width: i32, height: i32, rooms: &[Rect]) -> TileGrid {
        let mut grid = TileGrid::new(width, height, Tile::wall()).unwrap();
        for room in rooms {
            grid.fill_rect(room, Tile::floor()).unwrap();
        }
        grid
    }

    #[test]
    fn test_carve_corridor_horizontal_first() {
        let mut grid = TileGrid::new(6, 6, Tile::wall()).unwrap();
        carve_corridor(&mut grid, (1, 1), (4, 4), true).unwrap();
        assert!(grid.is_walkable(4, 1));
        assert!(!grid.is_walkable(1, 4));
        assert_eq!(grid.count_matching(|t| t.is_walkable()), 7);
    }

    #[test]
    fn test_carve_corridor_vertical_first() {
        let mut grid = TileGrid::new(6, 6, Tile::wall()).unwrap();
        carve_corridor(&mut grid, (1, 1), (4, 4), false).unwrap();
        assert!(grid.is_walkable(1, 4));
        assert!(!grid.is_walkable(4, 1));
    }

    #[test]
    fn test_carve_keeps_doors() {
        let mut grid = TileGrid::new(6, 3, Tile::wall()).unwrap();
        grid.set(3, 1, Tile::door()).unwrap();
        carve_corridor(&mut grid, (1, 1), (4, 1), true).unwrap();
        assert_eq!(grid.get(3, 1).unwrap(), Tile::door());
        assert!(grid.is_walkable(2, 1));
    }

    #[test]
    fn test_carve_out_of_bounds_errors() {
        let mut grid = TileGrid::new(4, 4, Tile::wall()).unwrap();
        assert!(carve_corridor(&mut grid, (1, 1), (6, 1), true).is_err());
    }

    #[test]
    fn test_mst_on_a_line() {
        let edges = minimum_spanning_edges(&[(0, 0), (10, 0), (4, 0)]);
        assert_eq!(edges, vec![(0, 2), (1, 2)]);
    }

    #[test]
    fn test_mst_ties_break_by_index() {
        // Unit square: four edges of length 2, two diagonals of length 4
        let edges = minimum_spanning_edges(&[(0, 0), (2, 0), (0, 2), (2, 2)]);
        assert_eq!(edges, vec![(0, 1), (0, 2), (1, 3)]);
    }

    #[test]
    fn test_mst_trivial_inputs() {
        assert!(minimum_spanning_edges(&[]).is_empty());
        assert!(minimum_spanning_edges(&[(3, 3)]).is_empty());
    }

    #[test]
    fn test_connect_reaches_every_room() {
        let rooms = [
            Rect::new(1, 1, 4, 4),
            Rect::new(20, 2, 5, 4),
            Rect::new(3, 14, 6, 4),
            Rect::new(18, 15, 4, 4),
        ];
        let mut grid = with_rooms(30, 22, &rooms);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let edges = CorridorConnector::connect(&mut grid, &rooms, &mut rng).unwrap();
        assert_eq!(edges.len(), 3);

        let reach = grid.flood_fill(rooms[0].center(), None);
        for room in &rooms {
            assert!(reach.contains(&room.center()));
        }
    }

    #[test]
    fn test_doors_mark_corridor_mouths() {
        let rooms = [Rect::new(1, 1, 5, 5), Rect::new(12, 1, 5, 5)];
        let mut grid = with_rooms(20, 9, &rooms);
        carve_corridor(&mut grid, rooms[0].center(), rooms[1].center(), true).unwrap();

        let doors = CorridorConnector::place_doors(&mut grid, &rooms).unwrap();
        assert_eq!(doors, vec![(6, 3), (11, 3)]);
        assert_eq!(grid.get(6, 3).unwrap(), Tile::door());
        // Doors stay walkable
        assert!(grid.find_path(rooms[0].center(), rooms[1].center()).is_some());
    }

    #[test]
    fn test_open_edges_are_not_doors() {
        // A room opening onto a wide floor area has no chokepoint
        let rooms = [Rect::new(1, 1, 4, 4)];
        let mut grid = with_rooms(10, 6, &rooms);
        grid.fill_rect(&Rect::new(5, 1, 3, 4), Tile::floor()).unwrap();
        assert!(CorridorConnector::place_doors(&mut grid, &rooms).unwrap().is_empty());
    }

    #[test]
    fn test_verify_connectivity_names_unreachable_room() {
        let rects = [Rect::new(1, 1, 3, 3), Rect::new(6, 1, 3, 3)];
        let grid = with_rooms(10, 5, &rects);
        let rooms: Vec<Room> = rects.iter().map(|r| Room::new(*r, ROOM_TYPE_NORMAL)).collect();

        let err = CorridorConnector::verify_connectivity(&grid, &rooms).unwrap_err();
        assert!(err.to_string().contains("room_6_1"), "{err}");
    }

    #[test]
    fn test_verify_connectivity_accepts_connected() {
        let rects = [Rect::new(1, 1, 3, 3), Rect::new(6, 1, 3, 3)];
        let mut grid = with_rooms(10, 5, &rects);
        carve_corridor(&mut grid, (2, 2), (7, 2), true).unwrap();
        let rooms: Vec<Room> = rects.iter().map(|r| Room::new(*r, ROOM_TYPE_NORMAL)).collect();
        assert!(CorridorConnector::verify_connectivity(&grid, &rooms).is_ok());
        assert!(CorridorConnector::verify_connectivity::<()>(&grid, &[]).is_ok());
    }
}
